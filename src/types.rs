use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Price store
// ---------------------------------------------------------------------------

/// One observation from the price store. Store order is chronological order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub price: f64,
}

// ---------------------------------------------------------------------------
// Report store
// ---------------------------------------------------------------------------

/// One day's rollup. Field order is the report store's column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReportRow {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub volatility: f64,
    /// Empty when the day opened at zero.
    pub evolution_percent: Option<f64>,
}

// ---------------------------------------------------------------------------
// Aggregator outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Price or report store missing, unreadable or malformed.
    DataUnavailable,
    /// Another run holds the report store lock.
    ReportLocked,
    /// The new report store could not be written.
    WriteFailed,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureKind::DataUnavailable => "data_unavailable",
            FailureKind::ReportLocked => "report_locked",
            FailureKind::WriteFailed => "write_failed",
        };
        write!(f, "{s}")
    }
}

/// Result of one aggregator run. Never an `Err`: callers pick exit codes from the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Success(DailyReportRow),
    /// Fewer than two samples on `date`; the report store was not touched.
    InsufficientData { date: NaiveDate, samples: usize },
    Failure { kind: FailureKind, message: String },
}

impl RunOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, RunOutcome::Failure { .. })
    }
}

// ---------------------------------------------------------------------------
// Dashboard series
// ---------------------------------------------------------------------------

/// A price sample with the dashboard's derived series attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub price: f64,
    /// Change from the previous sample. None for the first point.
    pub price_diff: Option<f64>,
    /// Rolling std of percentage changes, in percent. None until the window fills.
    pub volatility_pct: Option<f64>,
}
