use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{AppError, Result};

/// Exclusive guard over a report store, held as `<store>.lock` for the
/// duration of a read-modify-write. Released on drop.
///
/// A process killed while holding the guard leaves the lock file behind;
/// it must be removed by hand before the next run.
#[derive(Debug)]
pub struct ReportLock {
    path: PathBuf,
}

impl ReportLock {
    pub fn acquire(store: &Path) -> Result<Self> {
        let path = lock_path(store);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => AppError::Locked(path.clone()),
                _ => AppError::Io(e),
            })?;
        let lock = Self { path };
        // Owner pid, for whoever has to clean up a stale lock.
        writeln!(file, "{}", std::process::id())?;
        Ok(lock)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ReportLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("Failed to release report lock {}: {e}", self.path.display());
        }
    }
}

fn lock_path(store: &Path) -> PathBuf {
    let mut p = OsString::from(store.as_os_str());
    p.push(".lock");
    PathBuf::from(p)
}
