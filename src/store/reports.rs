//! The report store: one CSV row per calendar date, rewritten in full on every
//! aggregator run.

use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{AppError, Result};
use crate::store::open_store;
use crate::types::DailyReportRow;

/// Load the report store. `Ok(None)` when the file does not exist yet.
pub fn load_reports(path: &Path) -> Result<Option<Vec<DailyReportRow>>> {
    match open_store(path) {
        Ok(file) => read_reports(file, path).map(Some),
        Err(AppError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn read_reports<R: Read>(reader: R, path: &Path) -> Result<Vec<DailyReportRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    if rdr.headers().map_err(|e| AppError::csv(path, e))?.is_empty() {
        return Err(AppError::EmptyStore {
            path: path.to_path_buf(),
        });
    }

    rdr.deserialize::<DailyReportRow>()
        .map(|row| row.map_err(|e| AppError::csv(path, e)))
        .collect()
}

/// Replace any row for `row.date` with `row`, appending it last.
/// Rows for other dates keep their order and values.
pub fn upsert(mut rows: Vec<DailyReportRow>, row: DailyReportRow) -> Vec<DailyReportRow> {
    rows.retain(|r| r.date != row.date);
    rows.push(row);
    rows
}

/// Write `rows` to `path` through a temp file in the same directory, then
/// rename it over the target. Readers see either the old file or the new one.
pub fn write_reports(path: &Path, rows: &[DailyReportRow]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut wtr = csv::Writer::from_writer(tmp.as_file_mut());
        for row in rows {
            wtr.serialize(row).map_err(|e| AppError::csv(path, e))?;
        }
        wtr.flush()?;
    }
    tmp.as_file_mut().flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| AppError::Io(e.error))?;
    Ok(())
}

/// What the dashboard shows for the report panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LatestReport {
    Ok { report: DailyReportRow },
    NoData,
    Error { message: String },
}

/// The last row of the report store. The last row is the latest date because
/// runs append in date order.
pub fn latest_report(path: &Path) -> LatestReport {
    match load_reports(path) {
        Ok(Some(rows)) => match rows.into_iter().last() {
            Some(report) => LatestReport::Ok { report },
            None => LatestReport::NoData,
        },
        Ok(None) => LatestReport::NoData,
        Err(e) => LatestReport::Error {
            message: e.to_string(),
        },
    }
}

/// Row for `date`, if the store has one.
pub fn find_report(rows: &[DailyReportRow], date: NaiveDate) -> Option<&DailyReportRow> {
    rows.iter().find(|r| r.date == date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, open: f64) -> DailyReportRow {
        DailyReportRow {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open,
            close: open + 1.0,
            min: open,
            max: open + 1.0,
            mean: open + 0.5,
            volatility: 0.7071,
            evolution_percent: Some(1.0),
        }
    }

    #[test]
    fn upsert_replaces_same_date_and_keeps_others() {
        let rows = vec![row("2024-01-01", 10.0), row("2024-01-02", 20.0)];
        let rows = upsert(rows, row("2024-01-01", 99.0));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], row("2024-01-02", 20.0));
        assert_eq!(rows[1], row("2024-01-01", 99.0));
    }

    #[test]
    fn write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daily_report.csv");
        let mut zero_open = row("2024-01-02", 0.0);
        zero_open.evolution_percent = None;
        let rows = vec![row("2024-01-01", 10.0), zero_open];

        write_reports(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("date,open,close,min,max,mean,volatility,evolution_percent\n"));
        assert!(text.lines().nth(2).unwrap().ends_with(','), "None is an empty field");
        assert_eq!(load_reports(&path).unwrap(), Some(rows));
    }

    #[test]
    fn write_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daily_report.csv");
        write_reports(&path, &[row("2024-01-01", 10.0)]).unwrap();
        write_reports(&path, &[row("2024-01-02", 10.0)]).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("daily_report.csv")]);
    }

    #[test]
    fn missing_store_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_reports(&dir.path().join("nope.csv")).unwrap(), None);
    }

    #[test]
    fn latest_report_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daily_report.csv");

        assert_eq!(latest_report(&path), LatestReport::NoData);

        std::fs::write(&path, "date,open,close,min,max,mean,volatility,evolution_percent\n").unwrap();
        assert_eq!(latest_report(&path), LatestReport::NoData);

        std::fs::write(&path, "date,open\n2024-01-01,abc\n").unwrap();
        assert!(matches!(latest_report(&path), LatestReport::Error { .. }));

        std::fs::write(&path, "").unwrap();
        assert!(matches!(latest_report(&path), LatestReport::Error { .. }));

        write_reports(&path, &[row("2024-01-01", 10.0), row("2024-01-02", 20.0)]).unwrap();
        assert_eq!(
            latest_report(&path),
            LatestReport::Ok {
                report: row("2024-01-02", 20.0)
            }
        );
    }

    #[test]
    fn latest_report_serializes_with_status_tag() {
        let json = serde_json::to_value(LatestReport::NoData).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "no_data" }));

        let json = serde_json::to_value(LatestReport::Ok {
            report: row("2024-01-01", 10.0),
        })
        .unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["report"]["date"], "2024-01-01");
    }
}
