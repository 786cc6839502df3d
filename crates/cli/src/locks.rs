//! Per-root lock file so only one prune touches a backup root at a time

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Lock file name inside each backup root (never matches `daily-*Z`)
pub const LOCK_FILE_NAME: &str = ".urbackup.lock";

/// Exclusive lock on a backup root, released on drop
pub struct RootLock {
    path: PathBuf,
    #[allow(dead_code)]
    file: File,
}

/// Lock file content
#[derive(Debug, Serialize, Deserialize)]
struct LockContent {
    pid: u32,
    started_at: String,
}

impl RootLock {
    /// Acquire the lock for `root` without blocking
    ///
    /// Returns error if another process holds the lock or the lock file
    /// cannot be created.
    pub fn acquire(root: &Path) -> Result<Self> {
        let lock_path = root.join(LOCK_FILE_NAME);

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {}", lock_path.display()))?;

        if !try_flock_exclusive(&file)? {
            let holder = Self::read_lock_content(&mut file)
                .map(|content| format!("pid {} since {}", content.pid, content.started_at))
                .unwrap_or_else(|_| "unknown process".to_string());
            anyhow::bail!("{} is locked by another prune ({})", root.display(), holder);
        }

        Self::write_lock_content(&mut file)?;

        let lock = Self {
            path: lock_path,
            file,
        };
        tracing::debug!("Acquired {}", lock.path().display());

        Ok(lock)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write lock content (PID + start time)
    fn write_lock_content(file: &mut File) -> Result<()> {
        let content = LockContent {
            pid: std::process::id(),
            started_at: chrono::Utc::now().to_rfc3339(),
        };

        let serialized =
            serde_json::to_string(&content).context("Failed to serialize lock content")?;

        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(serialized.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }

    /// Read lock content from file
    fn read_lock_content(file: &mut File) -> Result<LockContent> {
        file.seek(SeekFrom::Start(0))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let content: LockContent =
            serde_json::from_str(&contents).context("Failed to deserialize lock content")?;
        Ok(content)
    }
}

impl Drop for RootLock {
    fn drop(&mut self) {
        // The root must hold nothing but snapshots once the run is over
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Try to acquire exclusive file lock (non-blocking)
#[cfg(unix)]
fn try_flock_exclusive(file: &File) -> Result<bool> {
    use nix::fcntl::{flock, FlockArg};
    use std::os::unix::io::AsRawFd;

    match flock(file.as_raw_fd(), FlockArg::LockExclusiveNonblock) {
        Ok(_) => Ok(true),
        Err(nix::errno::Errno::EWOULDBLOCK) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(not(unix))]
fn try_flock_exclusive(_file: &File) -> Result<bool> {
    Ok(true)
}
