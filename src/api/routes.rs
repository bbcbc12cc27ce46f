use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    response::Html,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::analytics::price_series;
use crate::api::health::HealthState;
use crate::error::AppError;
use crate::store::{latest_report, load_samples, LatestReport};
use crate::types::PricePoint;

const DASHBOARD_HTML: &str = include_str!("../../static/dashboard.html");

#[derive(Clone)]
pub struct ApiState {
    pub price_store: PathBuf,
    pub report_store: PathBuf,
    pub volatility_window: usize,
    pub refresh_interval_secs: u64,
    pub health: Arc<HealthState>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(get_index))
        .route("/api/prices", get(get_prices))
        .route("/api/report", get(get_report))
        .route("/health", get(get_health))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Price chart payload. A missing or malformed price store is reported inline
/// so the page can show it in place of the charts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PricesResponse {
    Ok {
        /// Server wall-clock time of this read, HH:MM:SS.
        updated_at: String,
        points: Vec<PricePoint>,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub polls_served: u64,
    pub poll_errors: u64,
    pub last_poll_at_ms: Option<u64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_index(State(state): State<ApiState>) -> Html<String> {
    let refresh_ms = state.refresh_interval_secs.saturating_mul(1000);
    Html(DASHBOARD_HTML.replace("{{REFRESH_MS}}", &refresh_ms.to_string()))
}

async fn get_prices(State(state): State<ApiState>) -> Result<Json<PricesResponse>, AppError> {
    let path = state.price_store.clone();
    let window = state.volatility_window;
    let loaded = tokio::task::spawn_blocking(move || {
        load_samples(&path).map(|samples| price_series(&samples, window))
    })
    .await?;

    state.health.record_poll(loaded.is_ok(), now_ms());
    let response = match loaded {
        Ok(points) => PricesResponse::Ok {
            updated_at: chrono::Local::now().format("%H:%M:%S").to_string(),
            points,
        },
        Err(e) => PricesResponse::Error {
            message: e.to_string(),
        },
    };
    Ok(Json(response))
}

async fn get_report(State(state): State<ApiState>) -> Result<Json<LatestReport>, AppError> {
    let path = state.report_store.clone();
    let report = tokio::task::spawn_blocking(move || latest_report(&path)).await?;

    state
        .health
        .record_poll(!matches!(report, LatestReport::Error { .. }), now_ms());
    Ok(Json(report))
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let last = state.health.last_poll_at_ms();
    Json(HealthResponse {
        status: "ok".to_string(),
        polls_served: state.health.polls_served(),
        poll_errors: state.health.poll_errors(),
        last_poll_at_ms: (last > 0).then_some(last),
    })
}

fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}
