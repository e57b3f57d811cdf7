// src/commands/cache.rs

//! Package cache commands

use anyhow::{Context, Result};
use std::path::PathBuf;
use terminus_recipe::recipe::{CacheConfig, PackageCache};

fn open_cache(cache_dir: Option<PathBuf>) -> Result<PackageCache> {
    let mut config = CacheConfig::default();
    if let Some(dir) = cache_dir {
        config.cache_dir = dir;
    }
    let dir = config.cache_dir.clone();
    PackageCache::new(config)
        .with_context(|| format!("Failed to open package cache at {}", dir.display()))
}

pub fn cmd_cache_stats(cache_dir: Option<PathBuf>) -> Result<()> {
    let cache = open_cache(cache_dir)?;
    let stats = cache.stats().with_context(|| "Failed to read cache statistics")?;

    println!("Package cache: {}", cache.cache_dir().display());
    println!("  Entries: {}", stats.entry_count);
    println!("  Size: {} bytes", stats.total_size);
    if let Some(oldest) = stats.oldest {
        println!("  Oldest: {}", oldest.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if let Some(newest) = stats.newest {
        println!("  Newest: {}", newest.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    Ok(())
}

pub fn cmd_cache_clear(cache_dir: Option<PathBuf>) -> Result<()> {
    let cache = open_cache(cache_dir)?;
    let removed = cache.clear().with_context(|| "Failed to clear package cache")?;
    println!("Removed {} cached package(s)", removed);
    Ok(())
}
