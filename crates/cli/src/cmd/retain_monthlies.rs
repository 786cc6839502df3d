//! Keep the latest snapshots plus one anchor per calendar month

use crate::config::Config;
use crate::util;
use anyhow::Result;
use retention::RetentionPolicy;
use std::path::PathBuf;

pub fn run(
    config: &Config,
    roots: Vec<PathBuf>,
    dry_run: bool,
    keep_latest: Option<i64>,
) -> Result<()> {
    let keep_latest = keep_latest.unwrap_or(config.retain_monthlies.keep_latest);
    let policy = RetentionPolicy::monthlies(keep_latest)?;

    let roots = util::resolve_roots(roots, config)?;
    super::run_roots(&roots, dry_run, &policy)
}
