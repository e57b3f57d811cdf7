// src/recipe/kitchen/config.rs

//! Configuration types for the Kitchen

use crate::error::Result;
use crate::recipe::format::Recipe;
use crate::recipe::info::PackageInfo;
use crate::recipe::options::OptionSet;
use crate::recipe::package_id::{compute_package_id, PackageId};
use crate::recipe::settings::Settings;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::resolver::ResolvedDependency;
use super::stage::CookStage;
use super::toolchain::GeneratedFiles;

/// Name of the generators folder inside the build folder
pub const GENERATORS_FOLDER: &str = "generators";

/// Configuration for the Kitchen
///
/// Relative folders are anchored at the current directory when the
/// Kitchen is created.
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Folder holding the top-level CMakeLists.txt
    pub source_folder: PathBuf,
    /// Folder for native build output and generated descriptors
    pub build_folder: PathBuf,
    /// Install prefix for the packaged result
    pub package_folder: PathBuf,
    /// Root of the local dependency cache (`<root>/<name>/<version>`)
    pub deps_root: PathBuf,
    /// CMake executable, looked up on PATH when not absolute
    pub cmake_program: String,
    /// CMake generator (e.g. "Ninja"); CMake's default when unset
    pub generator: Option<String>,
    /// Number of parallel jobs handed to the native build
    pub jobs: u32,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        let deps_root = dirs::data_local_dir()
            .map(|d| d.join("terminus").join("packages"))
            .unwrap_or_else(|| PathBuf::from(".terminus/packages"));

        Self {
            source_folder: PathBuf::from("."),
            build_folder: PathBuf::from("build"),
            package_folder: PathBuf::from("package"),
            deps_root,
            cmake_program: "cmake".to_string(),
            generator: None,
            jobs,
        }
    }
}

impl KitchenConfig {
    /// Folder receiving the toolchain and dependency descriptors
    pub fn generators_folder(&self) -> PathBuf {
        self.build_folder.join(GENERATORS_FOLDER)
    }

    /// Anchor every folder at the current directory
    ///
    /// CMake resolves a relative toolchain file against its own build and
    /// source trees, and generated descriptors outlive the invocation, so
    /// folders handed to either must be absolute.
    pub fn with_absolute_paths(mut self) -> Self {
        for folder in [
            &mut self.source_folder,
            &mut self.build_folder,
            &mut self.package_folder,
            &mut self.deps_root,
        ] {
            *folder = absolute_or_keep(folder);
        }
        self
    }
}

fn absolute_or_keep(path: &Path) -> PathBuf {
    match std::path::absolute(path) {
        Ok(absolute) => absolute,
        Err(e) => {
            warn!("Keeping {} relative: {}", path.display(), e);
            path.to_path_buf()
        }
    }
}

/// Settings, options and package id frozen for one invocation
///
/// Every stage reads from the same context, so the option values seen by
/// configuration are exactly those rendered into toolchain variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookContext {
    pub settings: Settings,
    pub options: OptionSet,
    pub package_id: PackageId,
}

impl CookContext {
    pub fn new(recipe: &Recipe, settings: Settings, options: OptionSet) -> Self {
        let package_id = compute_package_id(recipe, &settings, &options);
        Self {
            settings,
            options,
            package_id,
        }
    }

    /// Build a context from host settings, recipe option defaults and
    /// `name=value` overrides
    pub fn from_overrides<S: AsRef<str>>(
        recipe: &Recipe,
        setting_overrides: &[S],
        option_overrides: &[S],
    ) -> Result<Self> {
        let settings = Settings::host().with_overrides(setting_overrides)?;
        let options = recipe.options.with_overrides(option_overrides)?;
        Ok(Self::new(recipe, settings, options))
    }
}

/// Result of cooking a recipe
#[derive(Debug)]
pub struct CookResult {
    /// Folder holding the installed package
    pub package_folder: PathBuf,
    /// Published package metadata
    pub package_info: PackageInfo,
    /// Dependencies resolved for the build (empty on a cache hit)
    pub dependencies: Vec<ResolvedDependency>,
    /// Descriptors written before the build (absent on a cache hit)
    pub generated: Option<GeneratedFiles>,
    /// Last stage reached
    pub stage: CookStage,
    /// Native build log
    pub log: String,
    /// Whether this result came from cache
    pub from_cache: bool,
}
