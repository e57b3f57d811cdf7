// src/cli/mod.rs
//! CLI definitions for terminus-recipe
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! Every command works on one recipe: the shipped terminus_image recipe
//! unless `--recipe` names another file.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod cache;

pub use cache::CacheCommands;

#[derive(Parser)]
#[command(name = "terminus-recipe")]
#[command(version)]
#[command(about = "Package recipe runner for native CMake projects", long_about = None)]
pub struct Cli {
    /// Recipe file (default: the embedded terminus_image recipe)
    #[arg(long, global = true)]
    pub recipe: Option<PathBuf>,

    /// Option override, e.g. `-o with_tests=false` (repeatable)
    #[arg(short = 'o', long = "option", global = true, value_name = "NAME=VALUE")]
    pub options: Vec<String>,

    /// Setting override, e.g. `-s build_type=Debug` (repeatable)
    #[arg(short = 's', long = "setting", global = true, value_name = "NAME=VALUE")]
    pub settings: Vec<String>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show identity, options, requirements and package id
    Inspect,

    /// Check the recipe and print warnings
    Validate,

    /// Copy the export allowlist into a staging folder
    Export {
        /// Destination folder (must be absent or empty)
        dest: PathBuf,

        /// Folder the allowlist is matched against (default: the recipe's folder)
        #[arg(long)]
        from: Option<PathBuf>,
    },

    /// Resolve requirements and write the toolchain descriptors
    Generate {
        #[command(flatten)]
        kitchen: KitchenArgs,
    },

    /// Resolve, generate, build, package and publish
    Cook {
        #[command(flatten)]
        kitchen: KitchenArgs,

        /// Reuse a cached package with the same package id
        #[arg(long)]
        cached: bool,

        /// Package cache directory
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Print the package id for the given settings and options
    PackageId,

    /// Package cache management
    #[command(subcommand)]
    Cache(CacheCommands),
}

/// Kitchen folders and native build parameters
#[derive(Args, Debug, Clone)]
pub struct KitchenArgs {
    /// Folder holding the top-level CMakeLists.txt
    #[arg(long, default_value = ".")]
    pub source: PathBuf,

    /// Build folder (generators land in <build>/generators)
    #[arg(long, default_value = "build")]
    pub build_folder: PathBuf,

    /// Package (install prefix) folder
    #[arg(long, default_value = "package")]
    pub package_folder: PathBuf,

    /// Root of the local dependency cache (<root>/<name>/<version>)
    #[arg(long)]
    pub deps_root: Option<PathBuf>,

    /// CMake executable
    #[arg(long, default_value = "cmake")]
    pub cmake: String,

    /// CMake generator, e.g. Ninja
    #[arg(short = 'G', long)]
    pub generator: Option<String>,

    /// Number of parallel build jobs (default: available cores)
    #[arg(short, long)]
    pub jobs: Option<u32>,
}
