pub mod lock;
pub mod prices;
pub mod reports;

pub use lock::ReportLock;
pub use prices::load_samples;
pub use reports::{latest_report, load_reports, write_reports, LatestReport};

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{AppError, Result};

/// Open a store file, mapping a missing file to `AppError::NotFound`.
pub(crate) fn open_store(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::NotFound {
            path: path.to_path_buf(),
        },
        _ => AppError::Io(e),
    })
}
