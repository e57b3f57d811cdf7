// src/recipe/kitchen/cook.rs

//! Cook: the staged build of a single recipe
//!
//! Each phase method checks that the cook is at the stage immediately
//! before it and advances on success. A failure leaves the stage where it
//! was, and the caller gets the error unchanged.

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::recipe::info::PackageInfo;
use std::fs;
use tracing::{debug, info};

use super::cmake::{BuildLayout, ConfiguredBuild};
use super::config::{CookContext, KitchenConfig};
use super::resolver::{resolve_all, ResolvedDependency};
use super::stage::CookStage;
use super::toolchain::{generate_descriptors, GeneratedFiles};
use super::Kitchen;

/// A single cook operation
pub struct Cook<'a> {
    pub(super) kitchen: &'a Kitchen,
    pub(super) recipe: &'a Recipe,
    pub(super) ctx: &'a CookContext,
    pub(super) stage: CookStage,
    pub(super) dependencies: Vec<ResolvedDependency>,
    pub(super) generated: Option<GeneratedFiles>,
    pub(super) configured: Option<ConfiguredBuild<'a>>,
    /// Build log accumulator
    pub(super) log: String,
}

impl<'a> Cook<'a> {
    pub fn new(kitchen: &'a Kitchen, recipe: &'a Recipe, ctx: &'a CookContext) -> Self {
        Self {
            kitchen,
            recipe,
            ctx,
            stage: CookStage::Declared,
            dependencies: Vec::new(),
            generated: None,
            configured: None,
            log: String::new(),
        }
    }

    pub fn stage(&self) -> CookStage {
        self.stage
    }

    pub fn dependencies(&self) -> &[ResolvedDependency] {
        &self.dependencies
    }

    pub fn generated(&self) -> Option<&GeneratedFiles> {
        self.generated.as_ref()
    }

    pub fn log(&self) -> &str {
        &self.log
    }

    /// Locate every enabled requirement
    pub fn resolve(&mut self) -> Result<()> {
        self.expect(CookStage::DependenciesResolved)?;
        self.dependencies = resolve_all(self.kitchen.resolver.as_ref(), self.recipe)?;
        for dep in &self.dependencies {
            self.log.push_str(&format!(
                "Resolved {} -> {}\n",
                dep.requirement,
                dep.package_folder.display()
            ));
        }
        self.advance(CookStage::DependenciesResolved);
        Ok(())
    }

    /// Fix the settings and options for the rest of the cook
    pub fn configure(&mut self) -> Result<()> {
        self.expect(CookStage::Configured)?;
        let config = &self.kitchen.config;
        fs::create_dir_all(&config.build_folder)?;
        self.log_line(&format!("Settings: {}", self.ctx.settings));
        self.log_line(&format!("Options: {}", self.ctx.options));
        self.log_line(&format!("Package id: {}", self.ctx.package_id));
        self.advance(CookStage::Configured);
        Ok(())
    }

    /// Write the toolchain and dependency descriptors
    pub fn generate(&mut self) -> Result<()> {
        self.expect(CookStage::ToolchainGenerated)?;
        let folder = self.kitchen.config.generators_folder();
        let generated = generate_descriptors(self.recipe, self.ctx, &self.dependencies, &folder)?;
        self.log_line(&format!("Generated {}", generated.toolchain_file.display()));
        self.generated = Some(generated);
        self.advance(CookStage::ToolchainGenerated);
        Ok(())
    }

    /// Configure the native tree once, then build it
    pub fn build(&mut self) -> Result<()> {
        self.expect(CookStage::Built)?;
        let toolchain_file = self
            .generated
            .as_ref()
            .map(|g| g.toolchain_file.clone())
            .ok_or_else(|| self.out_of_order(CookStage::Built))?;

        let kitchen: &'a Kitchen = self.kitchen;
        let config = &kitchen.config;
        let layout = BuildLayout {
            source_folder: config.source_folder.clone(),
            build_folder: config.build_folder.clone(),
            package_folder: config.package_folder.clone(),
            toolchain_file,
            build_type: self.ctx.settings.build_type,
            generator: config.generator.clone(),
            jobs: config.jobs,
        };

        let (configured, output) =
            ConfiguredBuild::configure(kitchen.build_system.as_ref(), layout)?;
        self.log_build_output("configure", &output);

        let output = configured.build()?;
        self.log_build_output("build", &output);

        self.configured = Some(configured);
        self.advance(CookStage::Built);
        Ok(())
    }

    /// Install into the package folder
    pub fn package(&mut self) -> Result<()> {
        self.expect(CookStage::Packaged)?;
        let configured = self
            .configured
            .as_ref()
            .ok_or_else(|| self.out_of_order(CookStage::Packaged))?;
        clear_package_folder(&self.kitchen.config)?;
        let output = configured.install()?;
        self.log_build_output("install", &output);
        self.advance(CookStage::Packaged);
        Ok(())
    }

    /// Write `package_info.json` and return what was published
    pub fn publish(&mut self) -> Result<PackageInfo> {
        self.expect(CookStage::InfoPublished)?;
        let info = PackageInfo::from_recipe(self.recipe, &self.ctx.package_id);
        let path = info.write(&self.kitchen.config.package_folder)?;
        self.log_line(&format!("Published {}", path.display()));
        self.advance(CookStage::InfoPublished);
        Ok(info)
    }

    fn expect(&self, target: CookStage) -> Result<()> {
        if self.stage.next() == Some(target) {
            Ok(())
        } else {
            Err(self.out_of_order(target))
        }
    }

    fn out_of_order(&self, target: CookStage) -> Error {
        Error::StageOrder {
            stage: target.to_string(),
            current: self.stage.to_string(),
        }
    }

    fn advance(&mut self, stage: CookStage) {
        debug!("{}: {} -> {}", self.recipe.package.name, self.stage, stage);
        self.stage = stage;
        if stage == CookStage::InfoPublished {
            info!("Cooked {} ({})", self.recipe.package.name, self.ctx.package_id.short());
        }
    }

    fn log_line(&mut self, line: &str) {
        self.log.push_str(line);
        self.log.push('\n');
    }

    /// Log native step output with a phase header
    fn log_build_output(&mut self, phase: &str, output: &str) {
        self.log_line(&format!("=== {} ===", phase));
        if !output.is_empty() {
            self.log.push_str(output);
            if !output.ends_with('\n') {
                self.log.push('\n');
            }
        }
    }
}

/// Empty the package folder so only this install's files get published
fn clear_package_folder(config: &KitchenConfig) -> Result<()> {
    let package = &config.package_folder;
    if config.source_folder.starts_with(package) || config.build_folder.starts_with(package) {
        return Err(Error::InstallFailed(format!(
            "package folder {} contains the source or build folder",
            package.display()
        )));
    }
    if package.exists() {
        debug!("Clearing package folder {}", package.display());
        fs::remove_dir_all(package)?;
    }
    fs::create_dir_all(package)?;
    Ok(())
}
