// src/recipe/parser.rs

//! Recipe file parsing

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::recipe::options::OptionSet;
use crate::recipe::settings::Settings;
use std::collections::HashSet;
use std::path::{Component, Path};

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::NotFound(format!("Failed to read recipe file {}: {}", path.display(), e))
    })?;

    parse_recipe(&content)
}

/// Validate a recipe for completeness and correctness
///
/// Hard problems are returned as errors; soft ones come back as warnings.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if recipe.package.name.is_empty() {
        return Err(Error::ParseError("Recipe package name cannot be empty".to_string()));
    }
    if recipe.package.version.is_empty() {
        return Err(Error::ParseError("Recipe package version cannot be empty".to_string()));
    }

    // Requirements are pinned at deserialization time; names must be unique
    let mut seen = HashSet::new();
    for req in &recipe.requires {
        if !seen.insert(req.name.as_str()) {
            return Err(Error::ParseError(format!(
                "Requirement {} is declared more than once",
                req.name
            )));
        }
    }

    // Every toolchain template must render
    let settings = Settings::host();
    let options = OptionSet::default();
    for (name, template) in &recipe.toolchain.variables {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::ParseError(format!(
                "Invalid toolchain variable name '{}'",
                name
            )));
        }
        recipe
            .substitute(template, &settings, &options)
            .map_err(|e| Error::ParseError(format!("Toolchain variable {}: {}", name, e)))?;
    }

    for pattern in &recipe.exports.sources {
        validate_export_pattern(pattern)?;
    }

    if recipe.package.license.is_none() {
        warnings.push("Missing package license".to_string());
    }
    if recipe.package.description.is_none() {
        warnings.push("Missing package description".to_string());
    }
    for req in recipe.disabled_requirements() {
        warnings.push(format!(
            "Requirement {} is declared but disabled",
            req.reference()
        ));
    }
    if !recipe.exports.sources.is_empty()
        && !recipe.exports.sources.iter().any(|p| p == "CMakeLists.txt")
    {
        warnings.push("Exports do not include CMakeLists.txt".to_string());
    }
    if recipe.package_info.libs.is_empty() {
        warnings.push(format!(
            "No libs listed in [package_info], publishing '{}'",
            recipe.package.name
        ));
    }

    Ok(warnings)
}

/// Export patterns must be relative and stay inside the recipe folder
fn validate_export_pattern(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        return Err(Error::ParseError("Empty export pattern".to_string()));
    }

    let path = Path::new(pattern);
    if path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
    {
        return Err(Error::ParseError(format!(
            "Export pattern '{}' must stay inside the recipe folder",
            pattern
        )));
    }

    glob::Pattern::new(pattern)
        .map_err(|e| Error::ParseError(format!("Invalid export pattern '{}': {}", pattern, e)))?;

    Ok(())
}
