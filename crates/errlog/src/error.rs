use std::path::PathBuf;
use thiserror::Error;

use crate::filter::engine::FilterError;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("No error log was defined or could be determined from the configuration")]
    MissingLogPath,

    #[error("The file '{}' cannot be opened for reading: {source}", path.display())]
    LogUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid sort key: {0}")]
    InvalidSortKey(String),

    #[error("Invalid filter: {0}")]
    Filter(#[from] FilterError),

    #[error("Failed to render report: {0}")]
    Render(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the incremental cache.
///
/// None of these are fatal to a run: a failed restore falls back to a full
/// rescan and a failed persist is reported alongside the results.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt cache snapshot: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("failed to lock cache '{}': {source}", path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
