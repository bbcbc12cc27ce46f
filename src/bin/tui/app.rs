use btc_dashboard::api::routes::PricesResponse;
use btc_dashboard::store::LatestReport;
use btc_dashboard::types::PricePoint;

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connected,
    Error(String),
    Connecting,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub status: ConnectionStatus,
    pub report: LatestReport,
    pub points: Vec<PricePoint>,
    /// Inline error from the price endpoint (store missing or malformed).
    pub prices_error: Option<String>,
    /// Server time of the last successful price read.
    pub updated_at: Option<String>,
    pub last_refresh: std::time::Instant,
    pub base_url: String,
}

impl AppState {
    pub fn new(base_url: String) -> Self {
        Self {
            status: ConnectionStatus::Connecting,
            report: LatestReport::NoData,
            points: Vec::new(),
            prices_error: None,
            updated_at: None,
            last_refresh: std::time::Instant::now(),
            base_url,
        }
    }

    pub fn latest_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }

    pub async fn refresh(&mut self, client: &reqwest::Client) {
        let report_url = format!("{}/api/report", self.base_url);
        let prices_url = format!("{}/api/prices", self.base_url);

        let (report_res, prices_res) = tokio::join!(
            client.get(&report_url).send(),
            client.get(&prices_url).send(),
        );

        let (report_resp, prices_resp) = match (report_res, prices_res) {
            (Ok(r), Ok(p)) => (r, p),
            (Err(e), _) | (_, Err(e)) => {
                self.status = ConnectionStatus::Error(format!("{e}"));
                return;
            }
        };

        let (report, prices) = tokio::join!(
            report_resp.json::<LatestReport>(),
            prices_resp.json::<PricesResponse>(),
        );

        match (report, prices) {
            (Ok(report), Ok(prices)) => {
                self.apply(report, prices);
                self.status = ConnectionStatus::Connected;
                self.last_refresh = std::time::Instant::now();
            }
            (Err(e), _) | (_, Err(e)) => {
                self.status = ConnectionStatus::Error(format!("parse error: {e}"));
            }
        }
    }

    pub fn apply(&mut self, report: LatestReport, prices: PricesResponse) {
        self.report = report;
        match prices {
            PricesResponse::Ok { updated_at, points } => {
                self.points = points;
                self.updated_at = Some(updated_at);
                self.prices_error = None;
            }
            PricesResponse::Error { message } => {
                self.prices_error = Some(message);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

pub fn format_price(v: f64) -> String {
    format!("{v:.2} €")
}

pub fn format_opt(v: Option<f64>, digits: usize) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v:.digits$}"),
        _ => "—".to_string(),
    }
}

pub fn format_signed(v: Option<f64>, digits: usize) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v:+.digits$}"),
        _ => "—".to_string(),
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
