//! Snapshot folders and their discovery under a backup root

use crate::error::{Result, RetentionError};
use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Prefix of every daily snapshot folder
pub const SNAPSHOT_PREFIX: &str = "daily-";

/// Shape of the whole-seconds part of a snapshot timestamp (`d` = digit)
const TIMESTAMP_SHAPE: &[u8] = b"dddd-dd-ddTdd:dd:dd";

/// Resolution kept from the fractional seconds
const MICROS_DIGITS: usize = 6;

/// A discovered snapshot folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Snapshot directory, also used as its identifier
    pub path: PathBuf,
    /// Time the snapshot was taken, parsed from the folder name
    pub taken_at: DateTime<Utc>,
}

impl Snapshot {
    /// Build a snapshot from its directory path
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let taken_at = folder_to_datetime(&path)?;
        Ok(Self { path, taken_at })
    }
}

/// Identifier to timestamp mapping consumed by the retention policies
pub type SnapshotSet<I> = BTreeMap<I, DateTime<Utc>>;

/// Index snapshots by path
pub fn snapshot_set(snapshots: &[Snapshot]) -> SnapshotSet<PathBuf> {
    snapshots
        .iter()
        .map(|snapshot| (snapshot.path.clone(), snapshot.taken_at))
        .collect()
}

/// Parse a `daily-<YYYY-MM-DDTHH:MM:SS[.fraction]>Z` folder name
///
/// The fraction may carry any number of digits; it is truncated to
/// microseconds. The result is always UTC.
pub fn parse_folder_name(name: &str) -> Result<DateTime<Utc>> {
    let body = name
        .strip_prefix(SNAPSHOT_PREFIX)
        .ok_or_else(|| RetentionError::parse(name, "missing 'daily-' prefix"))?;
    let body = body
        .strip_suffix('Z')
        .ok_or_else(|| RetentionError::parse(name, "missing 'Z' suffix"))?;

    let (whole, fraction) = match body.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (body, None),
    };

    let shape_ok = whole.len() == TIMESTAMP_SHAPE.len()
        && whole
            .bytes()
            .zip(TIMESTAMP_SHAPE)
            .all(|(byte, &expected)| match expected {
                b'd' => byte.is_ascii_digit(),
                _ => byte == expected,
            });
    if !shape_ok {
        return Err(RetentionError::parse(name, "expected YYYY-MM-DDTHH:MM:SS"));
    }

    let micros = match fraction {
        None => 0,
        Some(digits) => fraction_to_micros(digits)
            .ok_or_else(|| RetentionError::parse(name, "malformed fractional seconds"))?,
    };

    let naive = NaiveDateTime::parse_from_str(whole, "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| RetentionError::parse(name, e.to_string()))?;
    // chrono encodes second 60 in the nanosecond field
    if naive.nanosecond() >= 1_000_000_000 {
        return Err(RetentionError::parse(name, "leap seconds not supported"));
    }
    let naive = naive
        .with_nanosecond(micros * 1_000)
        .ok_or_else(|| RetentionError::parse(name, "fractional seconds out of range"))?;

    Ok(Utc.from_utc_datetime(&naive))
}

/// Truncate a run of fraction digits to microseconds
fn fraction_to_micros(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let kept = &digits[..digits.len().min(MICROS_DIGITS)];
    let value: u32 = kept.parse().ok()?;
    Some(value * 10u32.pow((MICROS_DIGITS - kept.len()) as u32))
}

/// Parse the timestamp encoded in the final segment of a snapshot path
pub fn folder_to_datetime(path: &Path) -> Result<DateTime<Utc>> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| RetentionError::parse(&path.display().to_string(), "no folder name"))?;
    parse_folder_name(name)
}

/// Cheap filter matching the `daily-*Z` glob
fn looks_like_snapshot(name: &str) -> bool {
    name.starts_with(SNAPSHOT_PREFIX) && name.ends_with('Z')
}

/// List snapshot directories directly under `root`
///
/// Files and names outside the `daily-*Z` pattern are ignored. Names that
/// match the pattern but carry a malformed timestamp are skipped with a
/// warning. Result is sorted oldest first.
pub fn discover(root: &Path) -> Result<Vec<Snapshot>> {
    if !root.is_dir() {
        return Err(RetentionError::NotFound {
            path: root.to_path_buf(),
        });
    }

    let mut candidates = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(root).to_path_buf();
            RetentionError::Io {
                path,
                source: err.into(),
            }
        })?;

        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if looks_like_snapshot(name) && entry.path().is_dir() {
            candidates.push(entry.into_path());
        }
    }

    let mut snapshots: Vec<Snapshot> = candidates
        .into_par_iter()
        .filter_map(|path| match Snapshot::from_path(path.clone()) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                None
            }
        })
        .collect();

    snapshots.sort_by(|a, b| a.taken_at.cmp(&b.taken_at).then_with(|| a.path.cmp(&b.path)));
    debug!("Discovered {} snapshots under {}", snapshots.len(), root.display());

    Ok(snapshots)
}
