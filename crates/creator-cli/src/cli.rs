//! CLI argument parsing for the creator index.
//!
//! CLI flags override every other configuration source.

use clap::{Parser, Subcommand};

/// Creator Index
///
/// Embeds creator profiles and keeps a vector index of them up to date.
#[derive(Parser, Debug)]
#[command(name = "creator-index")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/creator-index/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Pipeline commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Embed every eligible record and upsert it into the vector store
    Embed {
        /// Override input JSON path
        #[arg(short, long)]
        input: Option<String>,

        /// Embed into an in-memory store instead of the configured index
        #[arg(long)]
        dry_run: bool,

        /// Verify the store after upserting
        #[arg(long)]
        verify: bool,
    },

    /// Check store count and sampled metadata against the input file
    Verify {
        /// Override input JSON path
        #[arg(short, long)]
        input: Option<String>,

        /// Expected record count (default: eligible records in the input)
        #[arg(long)]
        expected: Option<u64>,

        /// Number of ids to sample
        #[arg(long)]
        sample: Option<usize>,
    },

    /// Show vector store statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print stored metadata for specific ids
    Fetch {
        /// Record ids
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Delete every record in the configured namespace
    Purge {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}
