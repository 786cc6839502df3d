//! Retain-and-prune drivers
//!
//! Each driver runs discovery, computes the retained set with a
//! [`RetentionPolicy`] and hands every other snapshot to the [`Executor`],
//! oldest first. A failed removal is recorded and the batch continues.

use crate::error::{Result, RetentionError};
use crate::executor::Executor;
use crate::policy::RetentionPolicy;
use crate::snapshot::{discover, snapshot_set, Snapshot};
use chrono::{DateTime, Duration, Utc};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Outcome of pruning one backup root
#[derive(Debug)]
pub struct PruneReport {
    /// Backup root that was processed
    pub root: PathBuf,
    /// Whether removals were only reported
    pub dry_run: bool,
    /// Snapshots kept by the policy, oldest first
    pub retained: Vec<Snapshot>,
    /// Snapshots removed (or that would be removed in dry-run), oldest first
    pub removed: Vec<Snapshot>,
    /// Snapshots whose removal failed
    pub failed: Vec<(Snapshot, RetentionError)>,
}

impl PruneReport {
    fn new(root: &Path, dry_run: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            dry_run,
            retained: Vec::new(),
            removed: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Apply `policy` to the snapshots under `root` as of `now`
pub fn prune(
    root: &Path,
    executor: &Executor,
    policy: &RetentionPolicy,
    now: DateTime<Utc>,
) -> Result<PruneReport> {
    let snapshots = discover(root)?;
    let retained = policy.retained(&snapshot_set(&snapshots), now);

    let mut report = PruneReport::new(root, executor.is_dry_run());

    // discover() returns snapshots oldest first
    for snapshot in snapshots {
        if retained.contains(&snapshot.path) {
            report.retained.push(snapshot);
            continue;
        }

        match executor.remove(&snapshot) {
            Ok(()) => report.removed.push(snapshot),
            Err(e) => {
                error!("{}", e);
                report.failed.push((snapshot, e));
            }
        }
    }

    info!(
        "Pruned {}: {} retained, {} removed, {} failed",
        root.display(),
        report.retained.len(),
        report.removed.len(),
        report.failed.len()
    );

    Ok(report)
}

/// Keep the newest `keep_latest` snapshots and the oldest one of each month
pub fn retain_monthlies(root: &Path, dry_run: bool, keep_latest: usize) -> Result<PruneReport> {
    let policy = RetentionPolicy::Monthlies { keep_latest };
    prune(root, &Executor::new(dry_run), &policy, Utc::now())
}

/// Remove snapshots older than `max_age`, keeping at least `min_keep`
///
/// The clock is read once so every snapshot is judged against the same
/// instant.
pub fn delete_old(
    root: &Path,
    dry_run: bool,
    max_age: Duration,
    min_keep: usize,
) -> Result<PruneReport> {
    delete_old_at(root, dry_run, max_age, min_keep, Utc::now())
}

/// [`delete_old`] against an explicit `now`
pub fn delete_old_at(
    root: &Path,
    dry_run: bool,
    max_age: Duration,
    min_keep: usize,
    now: DateTime<Utc>,
) -> Result<PruneReport> {
    let policy = RetentionPolicy::MaxAge { max_age, min_keep };
    prune(root, &Executor::new(dry_run), &policy, now)
}
