//! Remove snapshots older than a maximum age

use crate::config::Config;
use crate::util;
use anyhow::Result;
use retention::{RetentionError, RetentionPolicy};
use std::path::PathBuf;

pub fn run(
    config: &Config,
    roots: Vec<PathBuf>,
    dry_run: bool,
    max_age: Option<&str>,
    min_keep: Option<i64>,
) -> Result<()> {
    let raw_max_age = max_age
        .or(config.delete_old.max_age.as_deref())
        .ok_or_else(|| RetentionError::InvalidPolicy("--max-age is required".to_string()))?;
    let min_keep = min_keep.unwrap_or(config.delete_old.min_keep);
    let policy = RetentionPolicy::max_age_std(parse_max_age(raw_max_age)?, min_keep)?;

    let roots = util::resolve_roots(roots, config)?;
    super::run_roots(&roots, dry_run, &policy)
}

/// Parse a human-readable duration such as "3 days" or "36h"
fn parse_max_age(raw: &str) -> Result<std::time::Duration, RetentionError> {
    humantime::parse_duration(raw.trim()).map_err(|e| {
        RetentionError::InvalidPolicy(format!("invalid max-age '{}': {}", raw, e))
    })
}
