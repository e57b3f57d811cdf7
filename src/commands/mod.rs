// src/commands/mod.rs
//! Command handlers for the terminus-recipe CLI

mod cache;
mod cook;
mod export;
mod inspect;

pub use cache::{cmd_cache_clear, cmd_cache_stats};
pub use cook::{cmd_cook, cmd_generate};
pub use export::cmd_export;
pub use inspect::{cmd_inspect, cmd_package_id, cmd_validate};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use terminus_recipe::recipe::{parse_recipe_file, terminus_image, CookContext, Recipe};

/// A recipe together with the folder it was read from
pub struct LoadedRecipe {
    pub recipe: Recipe,
    /// `None` for the embedded recipe
    pub folder: Option<PathBuf>,
}

/// Load the recipe named on the command line, or the embedded one
pub fn load_recipe(path: Option<&Path>) -> Result<LoadedRecipe> {
    match path {
        Some(path) => {
            let recipe = parse_recipe_file(path)
                .with_context(|| format!("Failed to parse recipe: {}", path.display()))?;
            let folder = path
                .parent()
                .map(|p| if p.as_os_str().is_empty() { PathBuf::from(".") } else { p.to_path_buf() });
            Ok(LoadedRecipe { recipe, folder })
        }
        None => {
            let recipe = terminus_image().context("Embedded terminus_image recipe is invalid")?;
            Ok(LoadedRecipe {
                recipe,
                folder: None,
            })
        }
    }
}

/// Freeze settings and options from `name=value` overrides
pub fn cook_context(recipe: &Recipe, settings: &[String], options: &[String]) -> Result<CookContext> {
    CookContext::from_overrides(recipe, settings, options)
        .with_context(|| format!("Invalid settings or options for {}", recipe.package.name))
}
