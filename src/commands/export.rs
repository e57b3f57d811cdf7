// src/commands/export.rs

//! Export command - stage allowlisted sources

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use terminus_recipe::recipe::Kitchen;

use super::load_recipe;

/// Copy a recipe's export allowlist into `dest`
///
/// Sources are matched against `from`, falling back to the folder the
/// recipe file lives in (or the working directory for the embedded recipe).
pub fn cmd_export(recipe_path: Option<&Path>, dest: &Path, from: Option<&Path>) -> Result<()> {
    let loaded = load_recipe(recipe_path)?;
    let recipe = &loaded.recipe;

    let recipe_folder = from
        .map(Path::to_path_buf)
        .or(loaded.folder)
        .unwrap_or_else(|| PathBuf::from("."));

    println!(
        "Exporting {} {} from {}",
        recipe.package.name,
        recipe.package.version,
        recipe_folder.display()
    );

    let kitchen = Kitchen::with_defaults();
    let files = kitchen
        .export(recipe, &recipe_folder, dest)
        .with_context(|| format!("Failed to export sources to {}", dest.display()))?;

    println!("\n[COMPLETE] Exported {} file(s) to {}", files.len(), dest.display());
    for file in &files {
        println!("  - {}", file.display());
    }

    Ok(())
}
