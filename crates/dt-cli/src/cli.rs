//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::archive::ArchiveArgs;
use crate::commands::import::ImportArgs;
use crate::commands::list::ListArgs;
use crate::commands::remove::RemoveArgs;
use crate::commands::replay::ReplayArgs;
use crate::commands::reset::ResetArgs;
use crate::commands::show::ShowArgs;
use crate::commands::stats::StatsArgs;

/// Duty session tracker.
///
/// Records which duties were run, through which roulette, with which party
/// and for how long, from a stream of game lifecycle events.
#[derive(Debug, Parser)]
#[command(name = "dtrack", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show store and recovery status.
    Status,

    /// Feed a recorded host script (JSON lines) through the tracker.
    Replay(ReplayArgs),

    /// List recorded sessions.
    List(ListArgs),

    /// Show one session in detail.
    Show(ShowArgs),

    /// Clear counts and durations per roulette.
    Stats(StatsArgs),

    /// Export all sessions to a timestamped CSV in the data directory.
    Export,

    /// Import sessions from a CSV file.
    Import(ImportArgs),

    /// Remove duplicate sessions.
    Dedup,

    /// Delete one session.
    Remove(RemoveArgs),

    /// Delete every session.
    Reset(ResetArgs),

    /// Move old sessions into an archive CSV.
    Archive(ArchiveArgs),
}
