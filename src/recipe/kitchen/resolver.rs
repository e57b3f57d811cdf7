// src/recipe/kitchen/resolver.rs

//! Dependency resolution for recipe builds

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::recipe::requirement::Requirement;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Trait for locating pinned requirements on disk
///
/// Keeps the Kitchen decoupled from wherever upstream packages live. A
/// resolver must return the folder for exactly the pinned version, or fail.
pub trait DependencyResolver: Send + Sync {
    /// Return the package folder for a requirement
    fn resolve(&self, requirement: &Requirement) -> Result<PathBuf>;
}

/// A requirement paired with its location on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependency {
    pub requirement: Requirement,
    pub package_folder: PathBuf,
}

/// Resolves `name/version` to `<root>/<name>/<version>`
#[derive(Debug, Clone)]
pub struct LocalResolver {
    root: PathBuf,
}

impl LocalResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DependencyResolver for LocalResolver {
    fn resolve(&self, requirement: &Requirement) -> Result<PathBuf> {
        let folder = self.root.join(&requirement.name).join(&requirement.version);
        if folder.is_dir() {
            Ok(folder)
        } else {
            Err(Error::ResolutionError(format!(
                "{} not found in {}",
                requirement.reference(),
                self.root.display()
            )))
        }
    }
}

/// Resolves from a fixed reference-to-folder table
///
/// Useful when an outer orchestrator has already placed every dependency.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    folders: HashMap<String, PathBuf>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the folder for a `name/version` reference
    pub fn insert(&mut self, reference: impl Into<String>, folder: impl Into<PathBuf>) {
        self.folders.insert(reference.into(), folder.into());
    }
}

impl DependencyResolver for StaticResolver {
    fn resolve(&self, requirement: &Requirement) -> Result<PathBuf> {
        self.folders
            .get(&requirement.reference())
            .cloned()
            .ok_or_else(|| {
                Error::ResolutionError(format!("{} is not registered", requirement.reference()))
            })
    }
}

/// Resolve every enabled requirement of a recipe, in declaration order
///
/// Fails on the first requirement that cannot be found. Disabled
/// requirements are skipped.
pub fn resolve_all(
    resolver: &dyn DependencyResolver,
    recipe: &Recipe,
) -> Result<Vec<ResolvedDependency>> {
    let mut resolved = Vec::new();

    for requirement in recipe.enabled_requirements() {
        let package_folder = resolver.resolve(requirement)?;
        debug!(
            "Resolved {} ({}) -> {}",
            requirement,
            requirement.kind,
            package_folder.display()
        );
        resolved.push(ResolvedDependency {
            requirement: requirement.clone(),
            package_folder,
        });
    }

    info!(
        "Resolved {} requirement(s) for {}",
        resolved.len(),
        recipe.package.name
    );

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::parser::parse_recipe;
    use crate::recipe::requirement::RequirementKind;
    use std::fs;
    use std::sync::Mutex;

    /// A resolver that records every lookup
    struct RecordingResolver {
        calls: Mutex<Vec<String>>,
    }

    impl DependencyResolver for RecordingResolver {
        fn resolve(&self, requirement: &Requirement) -> Result<PathBuf> {
            self.calls.lock().unwrap().push(requirement.reference());
            Ok(PathBuf::from("/deps").join(&requirement.name))
        }
    }

    const RECIPE: &str = r#"
[package]
name = "demo"
version = "1.0"

[[requires]]
reference = "gtest/1.17.0"
kind = "test"

[[requires]]
reference = "gdal/3.10.3"
enabled = false

[[requires]]
reference = "boost/1.89.0"
"#;

    #[test]
    fn test_local_resolver() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("boost/1.89.0")).unwrap();

        let resolver = LocalResolver::new(temp.path());
        let boost = Requirement::parse("boost/1.89.0", RequirementKind::Library).unwrap();
        assert_eq!(
            resolver.resolve(&boost).unwrap(),
            temp.path().join("boost/1.89.0")
        );

        // A different version of the same package does not satisfy the pin
        let other = Requirement::parse("boost/1.90.0", RequirementKind::Library).unwrap();
        assert!(matches!(
            resolver.resolve(&other),
            Err(Error::ResolutionError(_))
        ));
    }

    #[test]
    fn test_static_resolver() {
        let mut resolver = StaticResolver::new();
        resolver.insert("gtest/1.17.0", "/opt/gtest");

        let gtest = Requirement::parse("gtest/1.17.0", RequirementKind::Test).unwrap();
        assert_eq!(resolver.resolve(&gtest).unwrap(), PathBuf::from("/opt/gtest"));

        let boost = Requirement::parse("boost/1.89.0", RequirementKind::Library).unwrap();
        assert!(resolver.resolve(&boost).is_err());
    }

    #[test]
    fn test_resolve_all_skips_disabled_and_keeps_order() {
        let recipe = parse_recipe(RECIPE).unwrap();
        let resolver = RecordingResolver {
            calls: Mutex::new(Vec::new()),
        };

        let resolved = resolve_all(&resolver, &recipe).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(
            *resolver.calls.lock().unwrap(),
            vec!["gtest/1.17.0", "boost/1.89.0"]
        );
    }

    #[test]
    fn test_resolve_all_fails_fast() {
        let recipe = parse_recipe(RECIPE).unwrap();
        let mut resolver = StaticResolver::new();
        resolver.insert("boost/1.89.0", "/opt/boost");

        let err = resolve_all(&resolver, &recipe).unwrap_err();
        assert!(err.to_string().contains("gtest/1.17.0"));
    }
}
