//! Derived series for the dashboard charts, recomputed from scratch on every poll.

use crate::analytics::stats::{pct_change, sample_std_dev};
use crate::types::{PricePoint, Sample};

/// Attach price deltas and rolling volatility to each sample.
///
/// `volatility_pct[i]` is the sample std of the `window` percentage changes
/// ending at `i`, times 100. The first change is at index 1, so the first
/// defined value is at index `window`. A window containing an undefined change
/// (previous price zero) is undefined.
pub fn price_series(samples: &[Sample], window: usize) -> Vec<PricePoint> {
    let changes: Vec<Option<f64>> = samples
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if i == 0 {
                None
            } else {
                pct_change(samples[i - 1].price, s.price)
            }
        })
        .collect();

    samples
        .iter()
        .enumerate()
        .map(|(i, s)| PricePoint {
            timestamp: s.timestamp,
            price: s.price,
            price_diff: (i > 0).then(|| s.price - samples[i - 1].price),
            volatility_pct: rolling_volatility(&changes, i, window),
        })
        .collect()
}

fn rolling_volatility(changes: &[Option<f64>], end: usize, window: usize) -> Option<f64> {
    if window < 2 || end + 1 < window {
        return None;
    }
    let slice = &changes[end + 1 - window..=end];
    let values: Option<Vec<f64>> = slice.iter().copied().collect();
    sample_std_dev(&values?).map(|sd| sd * 100.0)
}
