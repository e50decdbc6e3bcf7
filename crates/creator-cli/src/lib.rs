//! Creator index CLI library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (embed, verify, stats, fetch, purge)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{
    build_embedder, connect_store, fetch_records, init_logging, load_settings, purge, run_embed,
    run_verify, show_stats, verify_store,
};
