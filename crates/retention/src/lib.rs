//! Snapshot retention engine
//!
//! This crate provides:
//! - Folder-name parsing for `daily-<ISO8601>Z` snapshot directories
//! - Snapshot discovery under a backup root
//! - Pure retention-set computation (keep latest, monthly anchors, max age)
//! - A deletion executor with dry-run support
//! - Prune drivers tying the three together per root

pub mod error;
pub mod executor;
pub mod policy;
pub mod prune;
pub mod snapshot;

// Re-exports
pub use error::{Result, RetentionError};
pub use executor::Executor;
pub use policy::{
    keep_latest, oldest_per_month, retain_monthlies_set, retain_young_set, RetentionPolicy,
    DEFAULT_KEEP_LATEST, DEFAULT_MIN_KEEP,
};
pub use prune::{delete_old, delete_old_at, prune, retain_monthlies, PruneReport};
pub use snapshot::{discover, folder_to_datetime, parse_folder_name, Snapshot, SnapshotSet};
