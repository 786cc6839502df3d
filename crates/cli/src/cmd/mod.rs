//! CLI command implementations

pub mod delete_old;
pub mod retain_monthlies;

use crate::locks::RootLock;
use crate::util;
use anyhow::Result;
use chrono::{DateTime, Utc};
use retention::{Executor, PruneReport, RetentionError, RetentionPolicy};
use std::path::{Path, PathBuf};
use tracing::error;

/// Apply `policy` to every root in turn
///
/// Roots are isolated: a root that is missing or locked is reported and
/// the remaining roots still run. Any such failure makes the command fail
/// once all roots have been processed.
pub(crate) fn run_roots(roots: &[PathBuf], dry_run: bool, policy: &RetentionPolicy) -> Result<()> {
    let executor = Executor::new(dry_run);
    let now = Utc::now();
    let mut failed_roots = 0;

    for root in roots {
        match prune_root(root, &executor, policy, now) {
            Ok(report) => util::print_summary(&report),
            Err(e) => {
                error!("Skipping {}: {:#}", root.display(), e);
                failed_roots += 1;
            }
        }
    }

    if failed_roots > 0 {
        anyhow::bail!("{} of {} backup roots failed", failed_roots, roots.len());
    }

    Ok(())
}

fn prune_root(
    root: &Path,
    executor: &Executor,
    policy: &RetentionPolicy,
    now: DateTime<Utc>,
) -> Result<PruneReport> {
    if !root.is_dir() {
        return Err(RetentionError::NotFound {
            path: root.to_path_buf(),
        }
        .into());
    }

    // Dry runs must not create the lock file
    let _lock = if executor.is_dry_run() {
        None
    } else {
        Some(RootLock::acquire(root)?)
    };

    Ok(retention::prune(root, executor, policy, now)?)
}
