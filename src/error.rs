use std::path::PathBuf;

use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{path}: file not found")]
    NotFound { path: PathBuf },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} line {line}: invalid timestamp {value:?}")]
    Timestamp {
        path: PathBuf,
        line: u64,
        value: String,
    },

    #[error("{path} line {line}: price must be a finite number, got {value}")]
    Price {
        path: PathBuf,
        line: u64,
        value: f64,
    },

    #[error("{path}: file is empty (no header row)")]
    EmptyStore { path: PathBuf },

    #[error("report store is locked by another run ({0})")]
    Locked(PathBuf),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        AppError::Csv {
            path: path.into(),
            source,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
