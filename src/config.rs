use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::{AppError, Result};

pub const PRICE_STORE_PATH: &str = "data.csv";
pub const REPORT_STORE_PATH: &str = "daily_report.csv";
/// Default dashboard base URL for the terminal client (API_URL).
pub const API_URL: &str = "http://localhost:8050";

/// A single sample cannot define both open and close.
pub const MIN_DAILY_SAMPLES: usize = 2;

/// Number of percentage changes in the dashboard's rolling volatility window.
pub const VOLATILITY_WINDOW: usize = 5;

/// Browser poll interval (seconds).
pub const REFRESH_INTERVAL_SECS: u64 = 10;

pub const DASHBOARD_PORT: u16 = 8050;

/// Date format used for the report store's key column.
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Paths the aggregator reads and writes. Passed explicitly so tests can point
/// a run at scratch files.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub price_store: PathBuf,
    pub report_store: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub price_store: PathBuf,
    pub report_store: PathBuf,
    /// Overrides "today" for the aggregator (REPORT_DATE, YYYY-MM-DD).
    pub report_date: Option<NaiveDate>,
    pub log_level: String,
    pub dashboard_port: u16,
    pub refresh_interval_secs: u64,
    /// Rolling window for the volatility chart (VOLATILITY_WINDOW, >= 2)
    pub volatility_window: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Unset keys take their defaults;
    /// set but invalid values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let volatility_window = lookup("VOLATILITY_WINDOW")
            .unwrap_or_else(|| VOLATILITY_WINDOW.to_string())
            .parse::<usize>()
            .map_err(|_| AppError::Config("VOLATILITY_WINDOW must be a positive integer".to_string()))?;
        if volatility_window < 2 {
            return Err(AppError::Config("VOLATILITY_WINDOW must be at least 2".to_string()));
        }

        let refresh_interval_secs = lookup("REFRESH_INTERVAL_SECS")
            .unwrap_or_else(|| REFRESH_INTERVAL_SECS.to_string())
            .parse::<u64>()
            .ok()
            .filter(|s| *s > 0)
            .ok_or_else(|| {
                AppError::Config("REFRESH_INTERVAL_SECS must be a positive integer".to_string())
            })?;

        let report_date = match lookup("REPORT_DATE") {
            Some(s) if !s.trim().is_empty() => Some(
                NaiveDate::parse_from_str(s.trim(), REPORT_DATE_FORMAT)
                    .map_err(|_| AppError::Config(format!("REPORT_DATE must be YYYY-MM-DD, got {s:?}")))?,
            ),
            _ => None,
        };

        Ok(Self {
            price_store: lookup("PRICE_STORE_PATH")
                .unwrap_or_else(|| PRICE_STORE_PATH.to_string())
                .into(),
            report_store: lookup("REPORT_STORE_PATH")
                .unwrap_or_else(|| REPORT_STORE_PATH.to_string())
                .into(),
            report_date,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            dashboard_port: lookup("DASHBOARD_PORT")
                .unwrap_or_else(|| DASHBOARD_PORT.to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("DASHBOARD_PORT must be a valid port number".to_string()))?,
            refresh_interval_secs,
            volatility_window,
        })
    }

    pub fn report(&self) -> ReportConfig {
        ReportConfig {
            price_store: self.price_store.clone(),
            report_store: self.report_store.clone(),
        }
    }

    /// The date the aggregator reports on: the override if set, else the local wall-clock date.
    pub fn today(&self) -> NaiveDate {
        self.report_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    fn config_error(vars: &[(&str, &str)]) -> String {
        match config(vars) {
            Err(AppError::Config(msg)) => msg,
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.price_store, PathBuf::from(PRICE_STORE_PATH));
        assert_eq!(cfg.report_store, PathBuf::from(REPORT_STORE_PATH));
        assert_eq!(cfg.report_date, None);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.dashboard_port, DASHBOARD_PORT);
        assert_eq!(cfg.refresh_interval_secs, REFRESH_INTERVAL_SECS);
        assert_eq!(cfg.volatility_window, VOLATILITY_WINDOW);
    }

    #[test]
    fn report_date_overrides_today() {
        let cfg = config(&[("REPORT_DATE", "2024-01-01"), ("PRICE_STORE_PATH", "/tmp/p.csv")]).unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(cfg.today(), expected);
        assert_eq!(cfg.report().price_store, PathBuf::from("/tmp/p.csv"));
    }

    #[test]
    fn blank_report_date_means_wall_clock() {
        assert_eq!(config(&[("REPORT_DATE", "  ")]).unwrap().report_date, None);
    }

    #[test]
    fn invalid_report_date_is_rejected() {
        let msg = config_error(&[("REPORT_DATE", "01/02/2024")]);
        assert!(msg.contains("REPORT_DATE"), "{msg}");
    }

    #[test]
    fn volatility_window_below_two_is_rejected() {
        let msg = config_error(&[("VOLATILITY_WINDOW", "1")]);
        assert!(msg.contains("at least 2"), "{msg}");
        assert!(config(&[("VOLATILITY_WINDOW", "2")]).is_ok());
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        for (key, value) in [
            ("VOLATILITY_WINDOW", "abc"),
            ("REFRESH_INTERVAL_SECS", "abc"),
            ("REFRESH_INTERVAL_SECS", "0"),
            ("REFRESH_INTERVAL_SECS", "-5"),
            ("DASHBOARD_PORT", "70000"),
        ] {
            let msg = config_error(&[(key, value)]);
            assert!(msg.contains(key), "{key}={value}: {msg}");
        }
    }
}
