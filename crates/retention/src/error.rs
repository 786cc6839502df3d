//! Error types for the retention engine

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for retention operations
pub type Result<T> = std::result::Result<T, RetentionError>;

/// Errors raised while discovering, selecting or removing snapshots
#[derive(Debug, Error)]
pub enum RetentionError {
    /// Folder name does not follow the `daily-<timestamp>Z` encoding
    #[error("invalid snapshot name '{name}': {reason}")]
    Parse { name: String, reason: String },

    /// Backup root does not exist or is not a directory
    #[error("backup root not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Removing a single snapshot failed
    #[error("failed to remove {}: {reason}", path.display())]
    Deletion {
        path: PathBuf,
        reason: String,
        #[source]
        source: Option<io::Error>,
    },

    /// Negative count, negative duration or unparseable duration string
    #[error("invalid retention policy: {0}")]
    InvalidPolicy(String),

    /// Listing a backup root failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RetentionError {
    pub(crate) fn parse(name: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn deletion(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Self::Deletion {
            path: path.to_path_buf(),
            reason: reason.into(),
            source: None,
        }
    }
}
