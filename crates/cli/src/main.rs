//! urbackup CLI - snapshot retention for daily backup mirrors

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

mod cmd;
mod config;
mod locks;
mod logging;
mod util;

use config::Config;

/// urbackup - Prune daily backup snapshots
#[derive(Parser)]
#[command(name = "urbackup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Decrease log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    quiet: u8,

    /// Config file (default: <config dir>/urbackup/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Keep the latest snapshots plus the oldest snapshot of every month
    RetainMonthlies {
        /// Backup roots containing daily-<timestamp>Z folders
        roots: Vec<PathBuf>,

        /// Only report what would be removed
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Number of latest snapshots to keep (default: 30)
        #[arg(long, allow_negative_numbers = true)]
        keep_latest: Option<i64>,
    },
    /// Remove snapshots older than a maximum age
    DeleteOld {
        /// Backup roots containing daily-<timestamp>Z folders
        roots: Vec<PathBuf>,

        /// Only report what would be removed
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Maximum snapshot age, e.g. "3 days" or "36h"
        #[arg(long)]
        max_age: Option<String>,

        /// Minimum number of snapshots to keep regardless of age (default: 5)
        #[arg(long, allow_negative_numbers = true)]
        min_keep: Option<i64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(logging::level_filter(cli.verbose, cli.quiet));

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::RetainMonthlies { roots, dry_run, keep_latest } => {
            cmd::retain_monthlies::run(&config, roots, dry_run, keep_latest)
        }
        Commands::DeleteOld { roots, dry_run, max_age, min_keep } => {
            cmd::delete_old::run(&config, roots, dry_run, max_age.as_deref(), min_keep)
        }
    }
}
