//! Retention policies
//!
//! Pure selection functions: given a snapshot set they compute which
//! identifiers survive. Nothing here touches the filesystem or reads the
//! clock; callers pass `now` explicitly.

use crate::error::{Result, RetentionError};
use crate::snapshot::SnapshotSet;
use chrono::{DateTime, Datelike, Duration, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// Default number of newest snapshots kept by the monthlies policy
pub const DEFAULT_KEEP_LATEST: usize = 30;

/// Default floor on retained snapshots for the max-age policy
pub const DEFAULT_MIN_KEEP: usize = 5;

/// Retention policy configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Keep the newest `keep_latest` snapshots plus the oldest one of every
    /// calendar month
    Monthlies { keep_latest: usize },
    /// Keep everything at most `max_age` old, and never fewer than
    /// `min_keep` snapshots
    MaxAge { max_age: Duration, min_keep: usize },
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::Monthlies {
            keep_latest: DEFAULT_KEEP_LATEST,
        }
    }
}

impl RetentionPolicy {
    /// Monthlies policy from a user-supplied count
    pub fn monthlies(keep_latest: i64) -> Result<Self> {
        Ok(Self::Monthlies {
            keep_latest: non_negative("keep-latest", keep_latest)?,
        })
    }

    /// Max-age policy from a user-supplied age and count
    pub fn max_age(max_age: Duration, min_keep: i64) -> Result<Self> {
        if max_age < Duration::zero() {
            return Err(RetentionError::InvalidPolicy(format!(
                "max-age must not be negative, got {}",
                max_age
            )));
        }

        Ok(Self::MaxAge {
            max_age,
            min_keep: non_negative("min-keep", min_keep)?,
        })
    }

    /// Max-age policy from a `std` duration (as produced by duration parsers)
    pub fn max_age_std(max_age: std::time::Duration, min_keep: i64) -> Result<Self> {
        let max_age = Duration::from_std(max_age).map_err(|_| {
            RetentionError::InvalidPolicy(format!("max-age {:?} is out of range", max_age))
        })?;
        Self::max_age(max_age, min_keep)
    }

    /// Identifiers retained by this policy as of `now`
    pub fn retained<I: Ord + Clone>(
        &self,
        snapshots: &SnapshotSet<I>,
        now: DateTime<Utc>,
    ) -> BTreeSet<I> {
        match *self {
            Self::Monthlies { keep_latest } => retain_monthlies_set(snapshots, keep_latest),
            Self::MaxAge { max_age, min_keep } => {
                retain_young_set(snapshots, now, max_age, min_keep)
            }
        }
    }
}

fn non_negative(name: &str, value: i64) -> Result<usize> {
    usize::try_from(value).map_err(|_| {
        RetentionError::InvalidPolicy(format!("{} must be non-negative, got {}", name, value))
    })
}

/// The `n` newest snapshots
///
/// Ties on timestamp are broken by identifier so the selection is stable.
pub fn keep_latest<I: Ord + Clone>(snapshots: &SnapshotSet<I>, n: usize) -> BTreeSet<I> {
    if n == 0 {
        return BTreeSet::new();
    }

    let mut ordered: Vec<(&I, &DateTime<Utc>)> = snapshots.iter().collect();
    ordered.sort_by(|(a_id, a_ts), (b_id, b_ts)| b_ts.cmp(a_ts).then_with(|| a_id.cmp(b_id)));

    ordered
        .into_iter()
        .take(n)
        .map(|(id, _)| id.clone())
        .collect()
}

/// The earliest snapshot of every `(year, month)` bucket
///
/// The oldest snapshot is the stable anchor: later runs never shift which
/// snapshot of a past month survives.
pub fn oldest_per_month<I: Ord + Clone>(snapshots: &SnapshotSet<I>) -> BTreeSet<I> {
    let mut buckets: BTreeMap<(i32, u32), (&DateTime<Utc>, &I)> = BTreeMap::new();

    for (id, taken_at) in snapshots {
        let month = (taken_at.year(), taken_at.month());
        let candidate = (taken_at, id);
        buckets
            .entry(month)
            .and_modify(|oldest| {
                if candidate < *oldest {
                    *oldest = candidate;
                }
            })
            .or_insert(candidate);
    }

    buckets.into_values().map(|(_, id)| id.clone()).collect()
}

/// Newest `keep_latest` snapshots plus every monthly anchor
pub fn retain_monthlies_set<I: Ord + Clone>(
    snapshots: &SnapshotSet<I>,
    keep_latest_count: usize,
) -> BTreeSet<I> {
    let mut retained = keep_latest(snapshots, keep_latest_count);
    retained.extend(oldest_per_month(snapshots));
    retained
}

/// Snapshots no older than `max_age` at `now`, plus the newest `min_keep`
///
/// A snapshot whose age equals `max_age` is retained. Snapshots dated in
/// the future count as young.
pub fn retain_young_set<I: Ord + Clone>(
    snapshots: &SnapshotSet<I>,
    now: DateTime<Utc>,
    max_age: Duration,
    min_keep: usize,
) -> BTreeSet<I> {
    let mut retained = keep_latest(snapshots, min_keep);
    retained.extend(
        snapshots
            .iter()
            .filter(|(_, taken_at)| now.signed_duration_since(**taken_at) <= max_age)
            .map(|(id, _)| id.clone()),
    );
    retained
}
