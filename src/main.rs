// src/main.rs

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{CacheCommands, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let recipe = cli.recipe.as_deref();

    match cli.command {
        Commands::Inspect => commands::cmd_inspect(recipe, &cli.settings, &cli.options),
        Commands::Validate => commands::cmd_validate(recipe),
        Commands::Export { dest, from } => commands::cmd_export(recipe, &dest, from.as_deref()),
        Commands::Generate { kitchen } => {
            commands::cmd_generate(recipe, &cli.settings, &cli.options, &kitchen)
        }
        Commands::Cook {
            kitchen,
            cached,
            cache_dir,
        } => commands::cmd_cook(
            recipe,
            &cli.settings,
            &cli.options,
            &kitchen,
            cached,
            cache_dir,
        ),
        Commands::PackageId => commands::cmd_package_id(recipe, &cli.settings, &cli.options),
        Commands::Cache(cmd) => match cmd {
            CacheCommands::Stats { cache_dir } => commands::cmd_cache_stats(cache_dir),
            CacheCommands::Clear { cache_dir } => commands::cmd_cache_clear(cache_dir),
        },
    }
}
