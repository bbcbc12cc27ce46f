//! End-to-end runs of the daily aggregator against real files.

use std::path::Path;

use chrono::NaiveDate;

use btc_dashboard::config::ReportConfig;
use btc_dashboard::report;
use btc_dashboard::store::{latest_report, load_reports, LatestReport};
use btc_dashboard::types::{FailureKind, RunOutcome};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn setup(dir: &Path, prices: &str) -> ReportConfig {
    let cfg = ReportConfig {
        price_store: dir.join("data.csv"),
        report_store: dir.join("daily_report.csv"),
    };
    std::fs::write(&cfg.price_store, prices).unwrap();
    cfg
}

const PRICES: &str = "timestamp,price\n\
    2024-01-01 08:00:00,100\n\
    2024-01-01 12:00:00,110\n\
    2024-01-01 20:00:00,90\n\
    2024-01-02 08:00:00,90\n\
    2024-01-02 20:00:00,99\n";

#[test]
fn consecutive_days_accumulate_in_run_order() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = setup(dir.path(), PRICES);

    assert!(matches!(report::run(&cfg, date("2024-01-01")), RunOutcome::Success(_)));
    let after_first = load_reports(&cfg.report_store).unwrap().unwrap();
    assert!(matches!(report::run(&cfg, date("2024-01-02")), RunOutcome::Success(_)));

    let rows = load_reports(&cfg.report_store).unwrap().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], after_first[0], "other dates are never altered");
    assert_eq!(rows[1].date, date("2024-01-02"));

    let first = &rows[0];
    assert_eq!(
        (first.open, first.close, first.min, first.max, first.mean),
        (100.0, 90.0, 90.0, 110.0, 100.0)
    );
    assert_eq!(first.evolution_percent, Some(-10.0));

    match latest_report(&cfg.report_store) {
        LatestReport::Ok { report } => assert_eq!(report.date, date("2024-01-02")),
        other => panic!("unexpected latest report {other:?}"),
    }
}

#[test]
fn rerunning_an_old_date_keeps_one_row_and_moves_it_last() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = setup(dir.path(), PRICES);

    report::run(&cfg, date("2024-01-01"));
    report::run(&cfg, date("2024-01-02"));
    report::run(&cfg, date("2024-01-01"));

    let rows = load_reports(&cfg.report_store).unwrap().unwrap();
    let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![date("2024-01-02"), date("2024-01-01")]);
}

#[test]
fn idempotent_for_same_input() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = setup(dir.path(), PRICES);

    report::run(&cfg, date("2024-01-01"));
    let once = std::fs::read(&cfg.report_store).unwrap();
    report::run(&cfg, date("2024-01-01"));
    let twice = std::fs::read(&cfg.report_store).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn stale_row_is_fully_replaced_not_merged() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = setup(dir.path(), PRICES);
    std::fs::write(
        &cfg.report_store,
        "date,open,close,min,max,mean,volatility,evolution_percent\n\
         2023-12-31,1.0,2.0,1.0,2.0,1.5,0.7,100.0\n\
         2024-01-01,5.0,5.0,5.0,5.0,5.0,0.0,\n",
    )
    .unwrap();

    let RunOutcome::Success(row) = report::run(&cfg, date("2024-01-01")) else {
        panic!("run failed");
    };

    let rows = load_reports(&cfg.report_store).unwrap().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, date("2023-12-31"));
    assert_eq!(rows[1], row);
    assert_eq!(row.open, 100.0);
}

#[test]
fn empty_price_store_signals_data_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = setup(dir.path(), "");

    let outcome = report::run(&cfg, date("2024-01-01"));
    assert!(matches!(
        outcome,
        RunOutcome::Failure {
            kind: FailureKind::DataUnavailable,
            ..
        }
    ));
    assert!(!cfg.report_store.exists());
}

#[test]
fn day_without_samples_is_not_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = setup(dir.path(), PRICES);

    let outcome = report::run(&cfg, date("2024-03-01"));
    assert_eq!(
        outcome,
        RunOutcome::InsufficientData {
            date: date("2024-03-01"),
            samples: 0
        }
    );
    assert!(!outcome.is_failure());
    assert!(!cfg.report_store.exists());
}
