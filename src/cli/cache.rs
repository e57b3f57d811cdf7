// src/cli/cache.rs
//! Package cache commands

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show cache statistics
    Stats {
        /// Package cache directory
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Remove every cached package
    Clear {
        /// Package cache directory
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
}
