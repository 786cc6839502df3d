//! Snapshot removal

use crate::error::{Result, RetentionError};
use crate::snapshot::Snapshot;
use std::fs;
use std::io;
use tracing::info;

/// Removes snapshot directories, or only reports them in dry-run mode
#[derive(Debug, Clone, Copy, Default)]
pub struct Executor {
    dry_run: bool,
}

impl Executor {
    /// Create an executor; `dry_run` disables every filesystem call
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Recursively remove a snapshot directory
    ///
    /// Fails if the target is missing, is not a directory, or cannot be
    /// removed.
    pub fn remove(&self, snapshot: &Snapshot) -> Result<()> {
        let path = &snapshot.path;

        if self.dry_run {
            info!("Would remove {}", path.display());
            return Ok(());
        }

        info!("Removing {}...", path.display());

        let metadata = fs::symlink_metadata(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => RetentionError::deletion(path, "snapshot no longer exists"),
            _ => RetentionError::Deletion {
                path: path.clone(),
                reason: "cannot inspect snapshot".to_string(),
                source: Some(e),
            },
        })?;

        if !metadata.is_dir() {
            return Err(RetentionError::deletion(path, "not a directory"));
        }

        fs::remove_dir_all(path).map_err(|e| RetentionError::Deletion {
            path: path.clone(),
            reason: e.to_string(),
            source: Some(e),
        })
    }
}
