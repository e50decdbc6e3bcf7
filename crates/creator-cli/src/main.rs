//! Creator Index
//!
//! Embeds creator profiles from a JSON export and upserts them into a
//! vector index.
//!
//! # Usage
//!
//! ```bash
//! creator-index embed [--input PATH] [--dry-run] [--verify]
//! creator-index verify [--expected N] [--sample N]
//! creator-index stats [--json]
//! creator-index fetch <ID>...
//! creator-index purge --yes
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/creator-index/config.toml)
//! 3. Environment variables (CREATOR_*, then GEMINI_API_KEY / PINECONE_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use creator_cli::{
    fetch_records, init_logging, load_settings, purge, run_embed, run_verify, show_stats, Cli,
    Commands,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref(), cli.log_level.as_deref())?;
    init_logging(&settings)?;

    match cli.command {
        Commands::Embed {
            input,
            dry_run,
            verify,
        } => {
            run_embed(&settings, input.as_deref(), dry_run, verify).await?;
        }
        Commands::Verify {
            input,
            expected,
            sample,
        } => {
            run_verify(&settings, input.as_deref(), expected, sample).await?;
        }
        Commands::Stats { json } => {
            show_stats(&settings, json).await?;
        }
        Commands::Fetch { ids } => {
            fetch_records(&settings, &ids).await?;
        }
        Commands::Purge { yes } => {
            purge(&settings, yes).await?;
        }
    }

    Ok(())
}
