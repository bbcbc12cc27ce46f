use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use btc_dashboard::api::{router, ApiState, HealthState};
use btc_dashboard::config::Config;
use btc_dashboard::error::Result;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    if !cfg.price_store.exists() {
        warn!(
            "Price store {} does not exist yet; charts will show an error until the collector writes it",
            cfg.price_store.display()
        );
    }
    info!(
        "Serving price store {} and report store {} (refresh every {}s, volatility window {})",
        cfg.price_store.display(),
        cfg.report_store.display(),
        cfg.refresh_interval_secs,
        cfg.volatility_window,
    );

    let api_state = ApiState {
        price_store: cfg.price_store.clone(),
        report_store: cfg.report_store.clone(),
        volatility_window: cfg.volatility_window,
        refresh_interval_secs: cfg.refresh_interval_secs,
        health: Arc::new(HealthState::new()),
    };
    let app = router(api_state);
    let bind_addr = format!("0.0.0.0:{}", cfg.dashboard_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Dashboard listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
