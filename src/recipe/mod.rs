// src/recipe/mod.rs

//! Recipe system for packaging native CMake projects
//!
//! A recipe declares everything a native package needs from its orchestrator:
//! - Package identity and metadata
//! - Boolean build options and their defaults
//! - Exactly pinned requirements (test, tool and library kinds)
//! - Toolchain variables handed to CMake
//! - The export allowlist and published libraries
//!
//! # Culinary Terminology
//!
//! - **Recipe**: The build specification (like a recipe card)
//! - **Kitchen**: Where recipes are turned into packages
//! - **Cook**: One staged run of a recipe through the Kitchen
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "terminus_image"
//! version = "0.0.6"
//!
//! [options]
//! with_tests = true
//!
//! [[requires]]
//! reference = "gtest/1.17.0"
//! kind = "test"
//!
//! [[requires]]
//! reference = "boost/1.89.0"
//!
//! [toolchain.variables]
//! CONAN_PKG_NAME = "%(name)s"
//! TERMINUS_IMAGE_ENABLE_TESTS = "%(options.with_tests)s"
//!
//! [package_id]
//! policy = "collapse"
//! ```

pub mod cache;
mod format;
pub mod info;
pub mod kitchen;
pub mod options;
pub mod package_id;
pub mod parser;
pub mod requirement;
pub mod settings;

pub use cache::{CacheConfig, CacheStats, PackageCache};
pub use format::{
    ExportsSection, PackageIdSection, PackageInfoSection, PackageSection, Recipe, ToolchainSection,
};
pub use info::PackageInfo;
pub use kitchen::{Cook, CookContext, CookResult, CookStage, Kitchen, KitchenConfig};
pub use options::{OptionName, OptionSet};
pub use package_id::{compute_package_id, PackageId, PackageIdPolicy};
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe};
pub use requirement::{Requirement, RequirementKind};
pub use settings::{BuildType, Settings};

use crate::error::Result;

/// The terminus_image recipe shipped with this crate
pub const TERMINUS_IMAGE_RECIPE: &str = include_str!("../../recipes/terminus_image.toml");

/// Parse the shipped terminus_image recipe
pub fn terminus_image() -> Result<Recipe> {
    parse_recipe(TERMINUS_IMAGE_RECIPE)
}
