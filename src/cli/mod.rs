//! Command-line interface for graft.
//!
//! This module handles argument parsing and JSON payload shapes only.
//! NO edit logic is implemented here.

use crate::report::ChangeStat;
use clap::Parser;
use serde::Serialize;

/// Graft: snippet-anchored patch engine for AI-proposed code edits.
#[derive(Parser, Debug)]
#[command(name = "graft")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_required = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available graft commands.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Resolve a snippet to its unique span in a file.
    Locate {
        /// Path to the file to search.
        #[arg(short, long)]
        file: std::path::PathBuf,

        /// Snippet to locate, inline.
        #[arg(short, long, required_unless_present = "snippet_file")]
        snippet: Option<String>,

        /// File containing the snippet to locate.
        #[arg(long, value_name = "FILE", conflicts_with = "snippet")]
        snippet_file: Option<std::path::PathBuf>,
    },

    /// Apply a proposal set to a file.
    Apply {
        /// Path to the file to edit.
        #[arg(short, long)]
        file: std::path::PathBuf,

        /// JSON file containing the ordered proposal set.
        #[arg(short, long, value_name = "FILE")]
        proposals: std::path::PathBuf,

        /// Plan and report without writing anything.
        #[arg(long)]
        dry_run: bool,

        /// Write the result even when some proposals failed.
        #[arg(long)]
        allow_partial: bool,

        /// Snapshot the file into a checkpoint before writing.
        #[arg(long)]
        checkpoint: bool,

        /// Emit a JSON payload instead of the text summary.
        #[arg(long)]
        json: bool,
    },

    /// Restore files from a checkpoint manifest.
    Restore {
        /// Path to the checkpoint manifest file.
        #[arg(short, long)]
        manifest: std::path::PathBuf,

        /// Workspace root to restore into (defaults to the current
        /// directory).
        #[arg(short, long, default_value = ".")]
        root: std::path::PathBuf,
    },
}

/// Parse command-line arguments.
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// JSON payload describing one apply run.
#[derive(Serialize)]
pub struct ApplyPayload {
    /// "ok" when every proposal applied, "partial" or "failed" otherwise.
    pub status: &'static str,
    /// Number of proposals applied.
    pub applied: usize,
    /// Number of proposals rejected.
    pub failed: usize,
    /// Whether the result was written to disk.
    pub written: bool,
    /// Per-edit change accounting.
    pub changes: Vec<ChangeStat>,
    /// Human-readable failure descriptions.
    pub failures: Vec<String>,
    /// SHA-256 of the written content, when a write happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    /// Checkpoint manifest path, when a checkpoint was taken.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint_manifest: Option<String>,
}
