//! Deterministic, offline CLI argument surface.
//!
//! No networked paths: every input is a local snapshot/params file. The
//! reference instant for freshness (`--as-of`) is taken at this boundary
//! only; the engine itself never reads a clock.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "cv",
    disable_help_subcommand = true,
    about = "Offline, deterministic CLI for the canvass analytics engine"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Compute the dashboard report from a snapshot file and print it as JSON.
    Report {
        /// Snapshot JSON path (the four collections).
        #[arg(long)]
        snapshot: PathBuf,
        /// Params JSON path; defaults apply when omitted.
        #[arg(long)]
        params: Option<PathBuf>,
        /// Reference instant (epoch seconds) for survey freshness;
        /// defaults to the system clock.
        #[arg(long)]
        as_of: Option<u64>,
        /// Length of the ranked top-N views.
        #[arg(long, default_value_t = 5)]
        top: usize,
        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
    /// Seed demo data into a snapshot file (refuses over existing demo data).
    Seed {
        /// Snapshot JSON path; created when absent.
        #[arg(long)]
        snapshot: PathBuf,
        /// Params JSON path; defaults apply when omitted.
        #[arg(long)]
        params: Option<PathBuf>,
    },
    /// Delete demo-prefixed records from a snapshot file.
    Clear {
        /// Snapshot JSON path.
        #[arg(long)]
        snapshot: PathBuf,
        /// Params JSON path; defaults apply when omitted.
        #[arg(long)]
        params: Option<PathBuf>,
    },
}
