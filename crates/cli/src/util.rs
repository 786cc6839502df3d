//! Shared utilities for CLI commands

use crate::config::Config;
use anyhow::Result;
use owo_colors::OwoColorize;
use retention::PruneReport;
use std::path::PathBuf;

/// Roots from the command line, falling back to the config file
pub fn resolve_roots(cli_roots: Vec<PathBuf>, config: &Config) -> Result<Vec<PathBuf>> {
    let roots = if cli_roots.is_empty() {
        config.roots.clone()
    } else {
        cli_roots
    };

    if roots.is_empty() {
        anyhow::bail!("No backup roots given (pass them as arguments or set `roots` in the config file)");
    }

    Ok(roots)
}

/// Print the outcome of one root
pub fn print_summary(report: &PruneReport) {
    println!("{} {}", "Backup root".bold(), report.root.display());

    println!("  Retained:     {}", report.retained.len().to_string().green());

    if report.dry_run {
        println!("  Would remove: {}", report.removed.len().to_string().yellow());
    } else {
        println!("  Removed:      {}", report.removed.len().to_string().yellow());
    }
    for snapshot in &report.removed {
        println!("    {}", snapshot.path.display().dimmed());
    }

    if report.has_failures() {
        println!("  Failed:       {}", report.failed.len().to_string().red());
        for (snapshot, err) in &report.failed {
            println!("    {} {}", snapshot.path.display(), err.dimmed());
        }
    }
}
