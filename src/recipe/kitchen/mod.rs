// src/recipe/kitchen/mod.rs

//! Kitchen: where recipes are cooked
//!
//! The Kitchen drives one recipe through its stages:
//! - Resolve pinned requirements to folders on disk
//! - Freeze settings and options into a [`CookContext`]
//! - Generate the toolchain file and dependency descriptor
//! - Configure and build with the native build system
//! - Install into the package folder and publish package info
//!
//! Every failure is returned to the caller as is. Nothing is retried.

mod cmake;
mod config;
mod cook;
mod export;
pub mod resolver;
mod stage;
pub mod toolchain;

pub use cmake::{BuildLayout, CMake, ConfiguredBuild, NativeBuildSystem, Phase};
pub use config::{CookContext, CookResult, KitchenConfig, GENERATORS_FOLDER};
pub use cook::Cook;
pub use export::export_sources;
pub(crate) use export::copy_tree;
pub use resolver::{DependencyResolver, LocalResolver, ResolvedDependency, StaticResolver};
pub use stage::CookStage;
pub use toolchain::{DependencyDescriptor, GeneratedFiles, Toolchain};

use crate::error::Result;
use crate::recipe::cache::PackageCache;
use crate::recipe::format::Recipe;
use crate::recipe::info::PackageInfo;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The Kitchen: where recipes are cooked
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
    resolver: Arc<dyn DependencyResolver>,
    build_system: Arc<dyn NativeBuildSystem>,
}

impl Kitchen {
    /// Create a Kitchen that resolves from `deps_root` and builds with CMake
    pub fn new(config: KitchenConfig) -> Self {
        let config = config.with_absolute_paths();
        let resolver = Arc::new(LocalResolver::new(config.deps_root.clone()));
        let build_system = Arc::new(CMake::new(config.cmake_program.clone()));
        Self {
            config,
            resolver,
            build_system,
        }
    }

    /// Create a Kitchen with default configuration
    pub fn with_defaults() -> Self {
        Self::new(KitchenConfig::default())
    }

    /// Replace the dependency resolver
    pub fn with_resolver(mut self, resolver: Arc<dyn DependencyResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the native build system
    pub fn with_build_system(mut self, build_system: Arc<dyn NativeBuildSystem>) -> Self {
        self.build_system = build_system;
        self
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// Resolve every enabled requirement without building
    pub fn resolve(&self, recipe: &Recipe) -> Result<Vec<ResolvedDependency>> {
        resolver::resolve_all(self.resolver.as_ref(), recipe)
    }

    /// Resolve dependencies and write the toolchain descriptors
    ///
    /// Runs the cook up to the generate stage; nothing native is invoked.
    pub fn generate(&self, recipe: &Recipe, ctx: &CookContext) -> Result<GeneratedFiles> {
        let mut cook = Cook::new(self, recipe, ctx);
        cook.resolve()?;
        cook.configure()?;
        cook.generate()?;
        match cook.generated {
            Some(generated) => Ok(generated),
            None => Err(crate::error::Error::StageOrder {
                stage: CookStage::ToolchainGenerated.to_string(),
                current: cook.stage.to_string(),
            }),
        }
    }

    /// Cook a recipe into the configured package folder
    ///
    /// ## Cooking Process
    /// 1. **Resolve**: locate every enabled pinned requirement
    /// 2. **Configure**: freeze settings and options for the invocation
    /// 3. **Generate**: write toolchain and dependency descriptors
    /// 4. **Build**: native configure (once) and build
    /// 5. **Package**: native install into the package folder
    /// 6. **Publish**: write `package_info.json`
    pub fn cook(&self, recipe: &Recipe, ctx: &CookContext) -> Result<CookResult> {
        info!(
            "Cooking {} version {} [{}]",
            recipe.package.name, recipe.package.version, ctx.options
        );

        let mut cook = Cook::new(self, recipe, ctx);

        let result = (|| {
            info!("Resolving requirements...");
            cook.resolve()?;
            cook.configure()?;

            info!("Generating toolchain...");
            cook.generate()?;

            info!("Building...");
            cook.build()?;

            info!("Packaging...");
            cook.package()?;
            cook.publish()
        })();

        let package_info = match result {
            Ok(info) => info,
            Err(e) => {
                warn!(
                    "Cook of {} stopped after stage {}: {}",
                    recipe.package.name, cook.stage, e
                );
                return Err(e);
            }
        };

        Ok(CookResult {
            package_folder: self.config.package_folder.clone(),
            package_info,
            dependencies: cook.dependencies,
            generated: cook.generated,
            stage: cook.stage,
            log: cook.log,
            from_cache: false,
        })
    }

    /// Cook a recipe, consulting the package cache first
    ///
    /// The cache is keyed by package id. On a hit the cached package is
    /// copied into the package folder and no stage runs.
    pub fn cook_cached(
        &self,
        recipe: &Recipe,
        ctx: &CookContext,
        cache: &PackageCache,
    ) -> Result<CookResult> {
        if let Some(entry) = cache.get(recipe, &ctx.package_id)? {
            info!(
                "Using cached package for {}-{} (id: {})",
                recipe.package.name,
                recipe.package.version,
                ctx.package_id.short()
            );

            let package_folder = cache.copy_to(&entry, &self.config.package_folder)?;
            let package_info = PackageInfo::read(&package_folder)?;

            return Ok(CookResult {
                package_folder,
                package_info,
                dependencies: Vec::new(),
                generated: None,
                stage: CookStage::InfoPublished,
                log: format!("Cache hit: {}", ctx.package_id),
                from_cache: true,
            });
        }

        debug!(
            "Cache miss for {}-{}, cooking",
            recipe.package.name, recipe.package.version
        );

        let result = self.cook(recipe, ctx)?;

        if let Err(e) = cache.put(recipe, &ctx.package_id, &result.package_folder) {
            warn!("Failed to cache package: {}", e);
        }

        Ok(result)
    }

    /// Stage the recipe's export allowlist from `recipe_folder` into `dest`
    pub fn export(&self, recipe: &Recipe, recipe_folder: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
        info!(
            "Exporting sources for {} version {}",
            recipe.package.name, recipe.package.version
        );
        export_sources(recipe_folder, &recipe.exports.sources, dest)
    }
}
