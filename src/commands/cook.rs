// src/commands/cook.rs

//! Cook and generate commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use terminus_recipe::recipe::{
    validate_recipe, CacheConfig, Kitchen, KitchenConfig, PackageCache,
};
use tracing::info;

use super::{cook_context, load_recipe};
use crate::cli::KitchenArgs;

fn kitchen_config(args: &KitchenArgs) -> KitchenConfig {
    let mut config = KitchenConfig {
        source_folder: args.source.clone(),
        build_folder: args.build_folder.clone(),
        package_folder: args.package_folder.clone(),
        cmake_program: args.cmake.clone(),
        generator: args.generator.clone(),
        ..Default::default()
    };

    if let Some(root) = &args.deps_root {
        config.deps_root = root.clone();
    }
    if let Some(j) = args.jobs {
        config.jobs = j;
    }

    config
}

/// Resolve requirements and write the toolchain descriptors
pub fn cmd_generate(
    recipe_path: Option<&Path>,
    settings: &[String],
    options: &[String],
    args: &KitchenArgs,
) -> Result<()> {
    let loaded = load_recipe(recipe_path)?;
    let recipe = &loaded.recipe;
    let ctx = cook_context(recipe, settings, options)?;

    let kitchen = Kitchen::new(kitchen_config(args));
    println!(
        "Generating toolchain for {} {} [{}]",
        recipe.package.name, recipe.package.version, ctx.options
    );

    let generated = kitchen
        .generate(recipe, &ctx)
        .with_context(|| format!("Failed to generate toolchain for {}", recipe.package.name))?;

    println!("\n[COMPLETE] Generated:");
    println!("  - {}", generated.toolchain_file.display());
    println!("  - {}", generated.deps_file.display());
    println!("  - {}", generated.deps_json.display());

    Ok(())
}

/// Cook a package from a recipe
pub fn cmd_cook(
    recipe_path: Option<&Path>,
    settings: &[String],
    options: &[String],
    args: &KitchenArgs,
    cached: bool,
    cache_dir: Option<PathBuf>,
) -> Result<()> {
    let loaded = load_recipe(recipe_path)?;
    let recipe = &loaded.recipe;

    println!("Recipe: {} version {}", recipe.package.name, recipe.package.version);

    let warnings = validate_recipe(recipe).with_context(|| "Recipe validation failed")?;
    for warning in &warnings {
        println!("Warning: {}", warning);
    }

    let ctx = cook_context(recipe, settings, options)?;
    let config = kitchen_config(args);
    let jobs = config.jobs;
    let kitchen = Kitchen::new(config);

    println!("Settings: {}", ctx.settings);
    println!("Options: {}", ctx.options);
    println!("Cooking with {} parallel jobs...", jobs);

    let result = if cached {
        let mut cache_config = CacheConfig::default();
        if let Some(dir) = cache_dir {
            cache_config.cache_dir = dir;
        }
        let cache = PackageCache::new(cache_config).with_context(|| "Failed to open package cache")?;
        kitchen.cook_cached(recipe, &ctx, &cache)
    } else {
        kitchen.cook(recipe, &ctx)
    }
    .with_context(|| format!("Failed to cook {}", recipe.package.name))?;

    if result.from_cache {
        println!("  - Restored from package cache");
    }
    println!("\n[COMPLETE] Cooked: {}", result.package_folder.display());
    println!("  Package id: {}", result.package_info.package_id);
    println!("  Libs: {}", result.package_info.libs.join(", "));

    info!(
        "Successfully cooked {} to {}",
        recipe.package.name,
        result.package_folder.display()
    );

    Ok(())
}
