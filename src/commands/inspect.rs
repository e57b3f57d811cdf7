// src/commands/inspect.rs

//! Inspect, validate and package-id commands

use anyhow::{Context, Result};
use std::path::Path;
use terminus_recipe::recipe::validate_recipe;

use super::{cook_context, load_recipe};

/// Print a recipe's identity, options, requirements and package id
pub fn cmd_inspect(recipe_path: Option<&Path>, settings: &[String], options: &[String]) -> Result<()> {
    let loaded = load_recipe(recipe_path)?;
    let recipe = &loaded.recipe;
    let ctx = cook_context(recipe, settings, options)?;
    let pkg = &recipe.package;

    println!("{} {}", pkg.name, pkg.version);
    if let Some(description) = &pkg.description {
        println!("  {}", description);
    }
    if let Some(license) = &pkg.license {
        println!("  License: {}", license);
    }
    if let Some(author) = &pkg.author {
        println!("  Author: {}", author);
    }
    if let Some(url) = &pkg.url {
        println!("  URL: {}", url);
    }
    if !pkg.topics.is_empty() {
        println!("  Topics: {}", pkg.topics.join(", "));
    }

    println!("\nSettings: {}", ctx.settings);
    println!("Options: {}", ctx.options);

    println!("\nRequirements:");
    for req in &recipe.requires {
        let state = if req.enabled { "" } else { " (disabled)" };
        println!("  {:<8} {}{}", req.kind.as_str(), req, state);
    }

    println!("\nToolchain variables:");
    for name in recipe.toolchain.variables.keys() {
        println!("  {}", name);
    }

    println!("\nLibs: {}", recipe.libs().join(", "));
    println!(
        "Package id: {} (policy: {})",
        ctx.package_id,
        recipe.package_id.policy.as_str()
    );

    Ok(())
}

/// Validate a recipe and print its warnings
pub fn cmd_validate(recipe_path: Option<&Path>) -> Result<()> {
    let loaded = load_recipe(recipe_path)?;
    let recipe = &loaded.recipe;

    println!("Recipe: {} version {}", recipe.package.name, recipe.package.version);

    let warnings = validate_recipe(recipe).with_context(|| "Recipe validation failed")?;
    for warning in &warnings {
        println!("Warning: {}", warning);
    }

    println!("Recipe validation passed");
    if warnings.is_empty() {
        println!("[OK] No issues found");
    } else {
        println!("[OK] {} warning(s)", warnings.len());
    }

    Ok(())
}

/// Print the package id for the given settings and options
pub fn cmd_package_id(recipe_path: Option<&Path>, settings: &[String], options: &[String]) -> Result<()> {
    let loaded = load_recipe(recipe_path)?;
    let ctx = cook_context(&loaded.recipe, settings, options)?;
    println!("{}", ctx.package_id);
    Ok(())
}
