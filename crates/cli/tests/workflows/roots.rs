//! Multi-root handling and config-supplied roots

use crate::common::{daily_on, existing, mkdirs};
use crate::urbackup;
use anyhow::Result;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_missing_root_does_not_block_others() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let missing = temp_dir.path().join("missing");
    let root = temp_dir.path().join("bak2");
    let dirs = mkdirs(
        &root,
        &[daily_on(2022, 11, 1), daily_on(2022, 11, 2), daily_on(2022, 11, 3)],
    );

    let result = urbackup!(temp_dir.path(), "retain-monthlies", "--keep-latest=1")
        .arg_path(&missing)
        .arg_path(&root)
        .assert_failure()?;

    assert_eq!(existing(&dirs), vec![true, false, true]);
    assert!(result.contains_stderr("backup root not found"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_locked_root_does_not_block_others() -> Result<()> {
    use nix::fcntl::{flock, FlockArg};
    use std::os::unix::io::AsRawFd;

    let temp_dir = TempDir::new()?;
    let locked = temp_dir.path().join("bak1");
    let root = temp_dir.path().join("bak2");
    let locked_dirs = mkdirs(
        &locked,
        &[daily_on(2022, 11, 1), daily_on(2022, 11, 2), daily_on(2022, 11, 3)],
    );
    let dirs = mkdirs(
        &root,
        &[daily_on(2022, 12, 1), daily_on(2022, 12, 5), daily_on(2022, 12, 9)],
    );

    // Stand in for a concurrent prune holding the first root
    let held = fs::File::create(locked.join(".urbackup.lock"))?;
    flock(held.as_raw_fd(), FlockArg::LockExclusiveNonblock)?;

    let result = urbackup!(temp_dir.path(), "retain-monthlies", "--keep-latest=1")
        .arg_path(&locked)
        .arg_path(&root)
        .assert_failure()?;

    assert_eq!(existing(&locked_dirs), vec![true, true, true]);
    assert_eq!(existing(&dirs), vec![true, false, true]);
    assert!(result.contains_stderr("locked by another prune"));
    assert!(result.contains_stderr("1 of 2 backup roots failed"));
    Ok(())
}

#[test]
fn test_roots_processed_independently() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let bak1 = temp_dir.path().join("bak1");
    let bak2 = temp_dir.path().join("bak2");
    let dirs1 = mkdirs(&bak1, &[daily_on(2022, 11, 1), daily_on(2022, 11, 2)]);
    let dirs2 = mkdirs(&bak2, &[daily_on(2022, 12, 1), daily_on(2022, 12, 5), daily_on(2022, 12, 9)]);

    urbackup!(temp_dir.path(), "retain-monthlies", "--keep-latest=1")
        .arg_path(&bak1)
        .arg_path(&bak2)
        .assert_success()?;

    assert_eq!(existing(&dirs1), vec![true, true]);
    assert_eq!(existing(&dirs2), vec![true, false, true]);
    Ok(())
}

#[test]
fn test_unrelated_entries_survive() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path().join("bak1");
    let dirs = mkdirs(&root, &[daily_on(2022, 11, 1), daily_on(2022, 11, 2)]);
    fs::create_dir_all(root.join("daily-not-a-timestampZ"))?;
    fs::create_dir_all(root.join("weekly-2022-11-03T01:23:45Z"))?;
    fs::write(root.join("README"), b"mirror")?;

    urbackup!(temp_dir.path(), "retain-monthlies", "--keep-latest=0")
        .arg_path(&root)
        .assert_success()?;

    assert_eq!(existing(&dirs), vec![true, false]);
    assert!(root.join("daily-not-a-timestampZ").is_dir());
    assert!(root.join("weekly-2022-11-03T01:23:45Z").is_dir());
    assert!(root.join("README").is_file());
    Ok(())
}

#[test]
fn test_roots_and_policy_from_config() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path().join("bak1");
    let dirs = mkdirs(
        &root,
        &[daily_on(2022, 11, 1), daily_on(2022, 11, 2), daily_on(2022, 11, 3)],
    );

    let config_path = temp_dir.path().join("urbackup.toml");
    fs::write(
        &config_path,
        format!(
            "roots = [{:?}]\n\n[retain_monthlies]\nkeep_latest = 0\n",
            root.display().to_string()
        ),
    )?;

    urbackup!(temp_dir.path(), "retain-monthlies", "--config")
        .arg_path(&config_path)
        .assert_success()?;

    assert_eq!(existing(&dirs), vec![true, false, false]);
    Ok(())
}

#[test]
fn test_no_roots_is_an_error() -> Result<()> {
    let temp_dir = TempDir::new()?;

    urbackup!(temp_dir.path(), "retain-monthlies").assert_failure()?;
    Ok(())
}
