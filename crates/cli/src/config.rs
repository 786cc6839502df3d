//! Configuration file
//!
//! Optional TOML file supplying default backup roots and policy values.
//! Command-line flags take precedence over everything here.

use anyhow::{Context, Result};
use retention::{DEFAULT_KEEP_LATEST, DEFAULT_MIN_KEEP};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Backup roots used when none are given on the command line
    pub roots: Vec<PathBuf>,
    pub retain_monthlies: RetainMonthliesConfig,
    pub delete_old: DeleteOldConfig,
}

/// `[retain_monthlies]` section
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetainMonthliesConfig {
    pub keep_latest: i64,
}

impl Default for RetainMonthliesConfig {
    fn default() -> Self {
        Self {
            keep_latest: DEFAULT_KEEP_LATEST as i64,
        }
    }
}

/// `[delete_old]` section
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeleteOldConfig {
    /// Human-readable duration, e.g. "30 days"
    pub max_age: Option<String>,
    pub min_keep: i64,
}

impl Default for DeleteOldConfig {
    fn default() -> Self {
        Self {
            max_age: None,
            min_keep: DEFAULT_MIN_KEEP as i64,
        }
    }
}

impl Config {
    /// Load from `explicit`, else from the default location if present,
    /// else fall back to defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match config_file_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

/// Default config location: `<config dir>/urbackup/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("urbackup").join("config.toml"))
}
