// src/recipe/package_id.rs

//! Package identity
//!
//! A package id is the cache key that tells build variants of one recipe
//! apart. The recipe chooses how much of the build configuration feeds it:
//!
//! - `full`: settings, options and enabled library requirements all count,
//!   so every variant gets its own slot.
//! - `collapse`: settings and options are cleared before hashing, so every
//!   variant of a given name/version maps to the same slot. Per-variant
//!   binary caching is given up in exchange.

use crate::hash::sha256;
use crate::recipe::format::Recipe;
use crate::recipe::options::OptionSet;
use crate::recipe::requirement::RequirementKind;
use crate::recipe::settings::Settings;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How much build configuration the package id reflects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PackageIdPolicy {
    #[default]
    Full,
    Collapse,
}

impl PackageIdPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageIdPolicy::Full => "full",
            PackageIdPolicy::Collapse => "collapse",
        }
    }

    /// Whether settings and options are ignored
    pub fn ignores_variants(&self) -> bool {
        matches!(self, PackageIdPolicy::Collapse)
    }
}

/// A computed package identity (lowercase SHA-256 hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 16 hex characters, for log lines
    pub fn short(&self) -> &str {
        &self.0[..16.min(self.0.len())]
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the package id for a recipe under the given settings and options
pub fn compute_package_id(recipe: &Recipe, settings: &Settings, options: &OptionSet) -> PackageId {
    let mut data = format!(
        "name:{}\nversion:{}\n",
        recipe.package.name, recipe.package.version
    );

    if !recipe.package_id.policy.ignores_variants() {
        data.push_str(&format!(
            "settings.os:{}\nsettings.compiler:{}\nsettings.build_type:{}\nsettings.arch:{}\n",
            settings.os, settings.compiler, settings.build_type, settings.arch
        ));

        for (name, value) in options.iter() {
            data.push_str(&format!("options.{}:{}\n", name, value));
        }

        let mut requires: Vec<String> = recipe
            .requires
            .iter()
            .filter(|r| r.enabled && r.kind == RequirementKind::Library)
            .map(|r| r.reference())
            .collect();
        requires.sort();
        for req in requires {
            data.push_str(&format!("requires:{}\n", req));
        }
    }

    PackageId(sha256(data.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::parser::parse_recipe;

    fn recipe_with_policy(policy: &str) -> Recipe {
        parse_recipe(&format!(
            r#"
[package]
name = "demo"
version = "1.0.0"

[[requires]]
reference = "zlib/1.3.1"

[package_id]
policy = "{}"
"#,
            policy
        ))
        .unwrap()
    }

    #[test]
    fn test_collapse_ignores_settings_and_options() {
        let recipe = recipe_with_policy("collapse");
        let debug = Settings::host().with_overrides(&["build_type=Debug"]).unwrap();
        let release = Settings::host().with_overrides(&["arch=armv8"]).unwrap();

        let ids: std::collections::HashSet<_> = OptionSet::all_combinations()
            .iter()
            .flat_map(|opts| {
                [
                    compute_package_id(&recipe, &debug, opts),
                    compute_package_id(&recipe, &release, opts),
                ]
            })
            .collect();
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn test_full_distinguishes_variants() {
        let recipe = recipe_with_policy("full");
        let settings = Settings::host();
        let a = compute_package_id(&recipe, &settings, &OptionSet::default());
        let b = compute_package_id(
            &recipe,
            &settings,
            &OptionSet::default().with(crate::recipe::options::OptionName::Shared, false),
        );
        let c = compute_package_id(
            &recipe,
            &settings.clone().with_overrides(&["build_type=Debug"]).unwrap(),
            &OptionSet::default(),
        );
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_version_always_counts() {
        let recipe = recipe_with_policy("collapse");
        let mut bumped = recipe.clone();
        bumped.package.version = "1.0.1".to_string();

        let settings = Settings::host();
        let options = OptionSet::default();
        assert_ne!(
            compute_package_id(&recipe, &settings, &options),
            compute_package_id(&bumped, &settings, &options)
        );
    }

    #[test]
    fn test_id_is_stable_hex() {
        let recipe = recipe_with_policy("full");
        let id = compute_package_id(&recipe, &Settings::host(), &OptionSet::default());
        assert_eq!(id.as_str().len(), 64);
        assert_eq!(id.short().len(), 16);
        assert_eq!(
            id,
            compute_package_id(&recipe, &Settings::host(), &OptionSet::default())
        );
    }
}
