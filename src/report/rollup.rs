use chrono::NaiveDate;

use crate::analytics::stats::{mean, min_max, sample_std_dev};
use crate::config::MIN_DAILY_SAMPLES;
use crate::types::{DailyReportRow, Sample};

/// Samples whose calendar date is `date`, in store order.
pub fn samples_on(samples: &[Sample], date: NaiveDate) -> Vec<Sample> {
    samples
        .iter()
        .filter(|s| s.timestamp.date() == date)
        .copied()
        .collect()
}

/// Build the report row for `date` from that day's samples, taken positionally:
/// open is the first sample and close the last, whatever their values.
/// None below `MIN_DAILY_SAMPLES`.
pub fn compute_row(date: NaiveDate, day: &[Sample]) -> Option<DailyReportRow> {
    if day.len() < MIN_DAILY_SAMPLES {
        return None;
    }
    let prices: Vec<f64> = day.iter().map(|s| s.price).collect();
    let open = *prices.first()?;
    let close = *prices.last()?;
    let (min, max) = min_max(&prices)?;

    Some(DailyReportRow {
        date,
        open,
        close,
        min,
        max,
        mean: mean(&prices)?,
        volatility: sample_std_dev(&prices)?,
        evolution_percent: evolution_percent(open, close),
    })
}

/// `(close - open) / open * 100`. None when the day opened at zero.
pub fn evolution_percent(open: f64, close: f64) -> Option<f64> {
    if open == 0.0 {
        return None;
    }
    Some((close - open) / open * 100.0)
}
