//! One-shot daily rollup, meant to be run once a day by an external scheduler.
//! Exits 0 when the report was written or there was nothing to report, 1 on failure.

use tracing_subscriber::EnvFilter;

use btc_dashboard::config::Config;
use btc_dashboard::report;

fn main() {
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

    let outcome = report::run(&cfg.report(), cfg.today());
    if outcome.is_failure() {
        std::process::exit(1);
    }
}
