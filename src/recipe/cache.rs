// src/recipe/cache.rs

//! Package caching for the Kitchen
//!
//! Packaged output is stored under its package id:
//!
//! ```text
//! <cache_dir>/<name>/<version>/<package_id>/package/...
//! <cache_dir>/<name>/<version>/<package_id>/metadata.json
//! ```
//!
//! With a collapsing package id policy every settings/options variant of a
//! name/version shares one slot, so whichever variant is cooked first is
//! what later cached cooks receive.

use crate::error::{Error, Result};
use crate::hash::{hash_file, HashAlgorithm};
use crate::recipe::format::Recipe;
use crate::recipe::kitchen::copy_tree;
use crate::recipe::package_id::{PackageId, PackageIdPolicy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const METADATA_FILE: &str = "metadata.json";
const PACKAGE_DIR: &str = "package";

/// Configuration for the package cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Root directory for cached packages
    pub cache_dir: PathBuf,
    /// Maximum age for cache entries (0 = no expiry)
    pub max_age: Duration,
    /// Whether to re-hash cached files before use
    pub verify_integrity: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .map(|d| d.join("terminus-recipe").join("packages"))
            .unwrap_or_else(|| PathBuf::from(".terminus/cache"));

        Self {
            cache_dir,
            max_age: Duration::from_secs(30 * 24 * 60 * 60), // 30 days
            verify_integrity: true,
        }
    }
}

/// Stored alongside each cached package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub name: String,
    pub version: String,
    pub package_id: PackageId,
    pub policy: PackageIdPolicy,
    pub created: DateTime<Utc>,
    /// Relative path -> xxh128 of every packaged file
    pub files: BTreeMap<String, String>,
}

/// A cache entry for a packaged recipe
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Cached copy of the package folder
    pub package_folder: PathBuf,
    pub metadata: CacheMetadata,
}

/// Package cache
#[derive(Debug)]
pub struct PackageCache {
    config: CacheConfig,
}

impl PackageCache {
    /// Create a new package cache with the given configuration
    pub fn new(config: CacheConfig) -> Result<Self> {
        fs::create_dir_all(&config.cache_dir)?;
        Ok(Self { config })
    }

    /// Create a package cache with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(CacheConfig::default())
    }

    pub fn cache_dir(&self) -> &Path {
        &self.config.cache_dir
    }

    fn slot_path(&self, recipe: &Recipe, package_id: &PackageId) -> PathBuf {
        self.config
            .cache_dir
            .join(&recipe.package.name)
            .join(&recipe.package.version)
            .join(package_id.as_str())
    }

    /// Look up the cached package for a recipe and package id
    pub fn get(&self, recipe: &Recipe, package_id: &PackageId) -> Result<Option<CacheEntry>> {
        let slot = self.slot_path(recipe, package_id);
        let metadata_path = slot.join(METADATA_FILE);

        if !metadata_path.exists() {
            debug!("Cache miss: {}", package_id.short());
            return Ok(None);
        }

        let metadata: CacheMetadata = match fs::read_to_string(&metadata_path)
            .map_err(Error::from)
            .and_then(|s| serde_json::from_str(&s).map_err(Error::from))
        {
            Ok(m) => m,
            Err(e) => {
                warn!("Unreadable cache metadata for {}: {}", package_id.short(), e);
                let _ = fs::remove_dir_all(&slot);
                return Ok(None);
            }
        };

        if !self.config.max_age.is_zero() {
            let age = Utc::now().signed_duration_since(metadata.created);
            if age.to_std().is_ok_and(|a| a > self.config.max_age) {
                debug!("Cache expired: {} (age: {})", package_id.short(), age);
                let _ = fs::remove_dir_all(&slot);
                return Ok(None);
            }
        }

        let package_folder = slot.join(PACKAGE_DIR);
        if self.config.verify_integrity && !verify_files(&package_folder, &metadata.files)? {
            warn!("Cache corruption detected: {}", package_id.short());
            let _ = fs::remove_dir_all(&slot);
            return Ok(None);
        }

        info!(
            "Cache hit: {}/{} ({})",
            metadata.name,
            metadata.version,
            package_id.short()
        );

        Ok(Some(CacheEntry {
            package_folder,
            metadata,
        }))
    }

    /// Store a package folder in the cache, replacing any previous entry
    pub fn put(
        &self,
        recipe: &Recipe,
        package_id: &PackageId,
        package_folder: &Path,
    ) -> Result<CacheEntry> {
        let slot = self.slot_path(recipe, package_id);
        if slot.exists() {
            fs::remove_dir_all(&slot)?;
        }

        let cached_folder = slot.join(PACKAGE_DIR);
        let copied = copy_tree(package_folder, &cached_folder)?;

        let mut files = BTreeMap::new();
        for rel in copied {
            let hash = hash_file(HashAlgorithm::Xxh128, &cached_folder.join(&rel))?;
            files.insert(rel.to_string_lossy().replace('\\', "/"), hash.as_str().to_string());
        }

        let metadata = CacheMetadata {
            name: recipe.package.name.clone(),
            version: recipe.package.version.clone(),
            package_id: package_id.clone(),
            policy: recipe.package_id.policy,
            created: Utc::now(),
            files,
        };
        fs::write(
            slot.join(METADATA_FILE),
            serde_json::to_string_pretty(&metadata)?,
        )?;

        info!(
            "Cached: {}/{} as {} ({} files)",
            recipe.package.name,
            recipe.package.version,
            package_id.short(),
            metadata.files.len()
        );

        Ok(CacheEntry {
            package_folder: cached_folder,
            metadata,
        })
    }

    /// Replace the contents of `dest` with a cached package
    pub fn copy_to(&self, entry: &CacheEntry, dest: &Path) -> Result<PathBuf> {
        if dest.exists() {
            fs::remove_dir_all(dest)?;
        }
        copy_tree(&entry.package_folder, dest)?;
        Ok(dest.to_path_buf())
    }

    /// Clear all cached packages, returning the number of entries removed
    pub fn clear(&self) -> Result<u64> {
        let removed = self.metadata_files().len() as u64;

        for entry in fs::read_dir(&self.config.cache_dir)? {
            let path = entry?.path();
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
        }

        info!("Cleared {} cache entries", removed);
        Ok(removed)
    }

    /// Get cache statistics
    pub fn stats(&self) -> Result<CacheStats> {
        let mut stats = CacheStats::default();

        for metadata_path in self.metadata_files() {
            let metadata: CacheMetadata =
                match serde_json::from_str(&fs::read_to_string(&metadata_path)?) {
                    Ok(m) => m,
                    Err(e) => {
                        debug!("Skipping {}: {}", metadata_path.display(), e);
                        continue;
                    }
                };

            let package_folder = metadata_path.with_file_name(PACKAGE_DIR);
            stats.total_size += WalkDir::new(&package_folder)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter_map(|e| e.metadata().ok())
                .map(|m| m.len())
                .sum::<u64>();
            stats.entry_count += 1;
            stats.oldest = Some(stats.oldest.map_or(metadata.created, |o| o.min(metadata.created)));
            stats.newest = Some(stats.newest.map_or(metadata.created, |n| n.max(metadata.created)));
        }

        Ok(stats)
    }

    /// `<name>/<version>/<id>/metadata.json` under the cache root
    fn metadata_files(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.config.cache_dir)
            .min_depth(4)
            .max_depth(4)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && e.file_name() == METADATA_FILE)
            .map(|e| e.into_path())
            .collect()
    }
}

fn verify_files(folder: &Path, files: &BTreeMap<String, String>) -> Result<bool> {
    for (rel, expected) in files {
        let path = folder.join(rel);
        if !path.is_file() {
            return Ok(false);
        }
        if hash_file(HashAlgorithm::Xxh128, &path)?.as_str() != expected {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Cache statistics
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Total size of cached files in bytes
    pub total_size: u64,
    /// Number of cached packages
    pub entry_count: u64,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}
