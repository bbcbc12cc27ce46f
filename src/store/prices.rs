//! Read side of the price store: a CSV of `timestamp,price` rows appended by the
//! upstream collector. Rows are returned in file order.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::store::open_store;
use crate::types::Sample;

/// Layouts accepted for naive timestamps, tried in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Deserialize)]
struct PriceRecord {
    timestamp: String,
    #[serde(alias = "price_eur")]
    price: f64,
}

/// Load every sample from the price store at `path`.
pub fn load_samples(path: &Path) -> Result<Vec<Sample>> {
    let file = open_store(path)?;
    read_samples(file, path)
}

/// Parse price store CSV from any reader. `path` is only used in error messages.
pub fn read_samples<R: Read>(reader: R, path: &Path) -> Result<Vec<Sample>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: StringRecord = rdr
        .headers()
        .map_err(|e| AppError::csv(path, e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}'))
        .collect();
    if headers.is_empty() {
        return Err(AppError::EmptyStore {
            path: path.to_path_buf(),
        });
    }

    let mut samples = Vec::new();
    for raw in rdr.records() {
        let raw = raw.map_err(|e| AppError::csv(path, e))?;
        let line = raw.position().map_or(0, |p| p.line());
        let record: PriceRecord = raw
            .deserialize(Some(&headers))
            .map_err(|e| AppError::csv(path, e))?;

        let timestamp = parse_timestamp(&record.timestamp).ok_or_else(|| AppError::Timestamp {
            path: path.to_path_buf(),
            line,
            value: record.timestamp.clone(),
        })?;
        // f64 parsing accepts NaN and inf, which are not prices
        if !record.price.is_finite() {
            return Err(AppError::Price {
                path: path.to_path_buf(),
                line,
                value: record.price,
            });
        }
        samples.push(Sample {
            timestamp,
            price: record.price,
        });
    }
    Ok(samples)
}

/// Parse an ISO-8601 style timestamp. Offset-bearing values keep their own
/// wall-clock time, so the calendar date is the one written in the string.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.naive_local());
    }
    if let Ok(ts) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(ts.naive_local());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
