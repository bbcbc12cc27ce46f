use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::config::{ReportConfig, MIN_DAILY_SAMPLES};
use crate::error::AppError;
use crate::report::rollup::{compute_row, samples_on};
use crate::store::{load_reports, load_samples, reports::upsert, write_reports, ReportLock};
use crate::types::{FailureKind, RunOutcome};

/// One daily rollup for `today`: read the price store, compute the day's row,
/// and upsert it into the report store.
///
/// Never returns an error. Every failure becomes `RunOutcome::Failure`, and in
/// that case the report store is left exactly as it was.
pub fn run(cfg: &ReportConfig, today: NaiveDate) -> RunOutcome {
    let outcome = run_inner(cfg, today);
    match &outcome {
        RunOutcome::Success(row) => info!(
            event = "REPORT_WRITTEN",
            date = %row.date,
            open = row.open,
            close = row.close,
            evolution_percent = ?row.evolution_percent,
            "Daily report updated for {} in {}",
            row.date,
            cfg.report_store.display(),
        ),
        RunOutcome::InsufficientData { date, samples } => warn!(
            event = "REPORT_SKIPPED",
            date = %date,
            samples,
            "Not enough data to build the report for {date}: {samples} sample(s), need {MIN_DAILY_SAMPLES}",
        ),
        RunOutcome::Failure { kind, message } => error!(
            event = "REPORT_FAILED",
            kind = %kind,
            "Daily report failed: {message}",
        ),
    }
    outcome
}

fn run_inner(cfg: &ReportConfig, today: NaiveDate) -> RunOutcome {
    let samples = match load_samples(&cfg.price_store) {
        Ok(s) => s,
        Err(e) => return failure(FailureKind::DataUnavailable, e),
    };

    let day = samples_on(&samples, today);
    let Some(row) = compute_row(today, &day) else {
        return RunOutcome::InsufficientData {
            date: today,
            samples: day.len(),
        };
    };

    let _lock = match ReportLock::acquire(&cfg.report_store) {
        Ok(lock) => lock,
        Err(e @ AppError::Locked(_)) => return failure(FailureKind::ReportLocked, e),
        Err(e) => return failure(FailureKind::WriteFailed, e),
    };

    let existing = match load_reports(&cfg.report_store) {
        Ok(rows) => rows.unwrap_or_default(),
        Err(e) => return failure(FailureKind::DataUnavailable, e),
    };

    let rows = upsert(existing, row.clone());
    if let Err(e) = write_reports(&cfg.report_store, &rows) {
        return failure(FailureKind::WriteFailed, e);
    }

    RunOutcome::Success(row)
}

fn failure(kind: FailureKind, err: AppError) -> RunOutcome {
    RunOutcome::Failure {
        kind,
        message: err.to_string(),
    }
}
