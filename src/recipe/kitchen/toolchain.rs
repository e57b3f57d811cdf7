// src/recipe/kitchen/toolchain.rs

//! Toolchain descriptors for the native build system
//!
//! Two descriptors are written into the generators folder before CMake runs:
//!
//! - a toolchain file holding the recipe's variables plus a small core block
//!   (`BUILD_SHARED_LIBS`, `CMAKE_BUILD_TYPE`) and an include of the deps file
//! - a dependency descriptor mapping each enabled requirement to its folder,
//!   as CMake (`terminus_deps.cmake`) and as JSON (`dependencies.json`)
//!
//! Output depends only on the recipe, settings, options and resolved folders,
//! so regenerating with the same inputs produces byte-identical files.

use crate::error::Result;
use crate::recipe::format::Recipe;
use crate::recipe::kitchen::config::CookContext;
use crate::recipe::kitchen::resolver::ResolvedDependency;
use crate::recipe::requirement::RequirementKind;
use crate::recipe::settings::BuildType;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const TOOLCHAIN_FILE: &str = "terminus_toolchain.cmake";
pub const DEPS_FILE: &str = "terminus_deps.cmake";
pub const DEPS_JSON_FILE: &str = "dependencies.json";

/// Rendered toolchain variables for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Package reference the toolchain was rendered for
    pub reference: String,
    /// Recipe variables, sorted by name
    pub variables: BTreeMap<String, String>,
    /// `BUILD_SHARED_LIBS`, from the `shared` option
    pub shared: bool,
    /// `CMAKE_BUILD_TYPE`, from the `build_type` setting
    pub build_type: BuildType,
}

impl Toolchain {
    /// Render the recipe's variables against the cook context
    pub fn new(recipe: &Recipe, ctx: &CookContext) -> Result<Self> {
        let mut variables = BTreeMap::new();
        for (name, template) in &recipe.toolchain.variables {
            let value = recipe.substitute(template, &ctx.settings, &ctx.options)?;
            variables.insert(name.clone(), value);
        }

        Ok(Self {
            reference: format!("{}/{}", recipe.package.name, recipe.package.version),
            variables,
            shared: ctx.options.shared,
            build_type: ctx.settings.build_type,
        })
    }

    /// Render the toolchain file
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "# Generated by terminus-recipe for {}. Do not edit.\n",
            self.reference
        ));
        out.push_str("include_guard()\n\n");

        out.push_str("# Core\n");
        out.push_str(&format!(
            "set(BUILD_SHARED_LIBS {} CACHE BOOL \"Build shared libraries\" FORCE)\n",
            if self.shared { "ON" } else { "OFF" }
        ));
        out.push_str(&format!(
            "set(CMAKE_BUILD_TYPE \"{}\" CACHE STRING \"Build type\" FORCE)\n\n",
            self.build_type
        ));

        out.push_str("# Recipe variables\n");
        for (name, value) in &self.variables {
            out.push_str(&format!(
                "set({} \"{}\" CACHE STRING \"Recipe variable {}\" FORCE)\n",
                name,
                escape_cmake(value),
                name
            ));
        }
        out.push('\n');

        out.push_str("# Dependencies\n");
        out.push_str(&format!(
            "include(\"${{CMAKE_CURRENT_LIST_DIR}}/{}\")\n",
            DEPS_FILE
        ));
        out
    }

    /// Write the toolchain file into `folder`
    pub fn generate(&self, folder: &Path) -> Result<PathBuf> {
        let path = folder.join(TOOLCHAIN_FILE);
        write_if_changed(&path, &self.render())?;
        Ok(path)
    }
}

/// One entry of the dependency descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptorEntry {
    pub name: String,
    pub version: String,
    pub kind: RequirementKind,
    pub package_folder: String,
}

/// Requirement-to-folder mapping consumed by the native build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyDescriptor {
    pub dependencies: Vec<DescriptorEntry>,
}

impl DependencyDescriptor {
    pub fn new(resolved: &[ResolvedDependency]) -> Self {
        let dependencies = resolved
            .iter()
            .map(|dep| DescriptorEntry {
                name: dep.requirement.name.clone(),
                version: dep.requirement.version.clone(),
                kind: dep.requirement.kind,
                package_folder: cmake_path(&dep.package_folder),
            })
            .collect();
        Self { dependencies }
    }

    /// Render the CMake side of the descriptor
    pub fn render_cmake(&self) -> String {
        let mut out = String::from("# Generated by terminus-recipe. Do not edit.\ninclude_guard()\n");
        for dep in &self.dependencies {
            let folder = escape_cmake(&dep.package_folder);
            out.push_str(&format!("\n# {} {}/{}\n", dep.kind, dep.name, dep.version));
            out.push_str(&format!("set({}_ROOT \"{}\")\n", dep.name, folder));
            out.push_str(&format!("list(APPEND CMAKE_PREFIX_PATH \"{}\")\n", folder));
            if dep.kind == RequirementKind::Tool {
                out.push_str(&format!("list(APPEND CMAKE_MODULE_PATH \"{}/cmake\")\n", folder));
                out.push_str(&format!("list(APPEND CMAKE_PROGRAM_PATH \"{}/bin\")\n", folder));
            }
        }
        out
    }

    /// Render the JSON side of the descriptor
    pub fn render_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Write both descriptor files into `folder`
    pub fn generate(&self, folder: &Path) -> Result<(PathBuf, PathBuf)> {
        let cmake = folder.join(DEPS_FILE);
        let json = folder.join(DEPS_JSON_FILE);
        write_if_changed(&cmake, &self.render_cmake())?;
        write_if_changed(&json, &self.render_json()?)?;
        Ok((cmake, json))
    }
}

/// Files written by the generate stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub toolchain_file: PathBuf,
    pub deps_file: PathBuf,
    pub deps_json: PathBuf,
    pub toolchain: Toolchain,
}

/// Render and write every descriptor into `folder`
pub fn generate_descriptors(
    recipe: &Recipe,
    ctx: &CookContext,
    resolved: &[ResolvedDependency],
    folder: &Path,
) -> Result<GeneratedFiles> {
    fs::create_dir_all(folder)?;

    let toolchain = Toolchain::new(recipe, ctx)?;
    let toolchain_file = toolchain.generate(folder)?;
    let (deps_file, deps_json) = DependencyDescriptor::new(resolved).generate(folder)?;

    debug!(
        "Generated {} toolchain variable(s) in {}",
        toolchain.variables.len(),
        folder.display()
    );

    Ok(GeneratedFiles {
        toolchain_file,
        deps_file,
        deps_json,
        toolchain,
    })
}

/// Skip the write when content is unchanged so CMake does not re-run
fn write_if_changed(path: &Path, content: &str) -> Result<()> {
    if let Ok(existing) = fs::read_to_string(path)
        && existing == content
    {
        return Ok(());
    }
    fs::write(path, content)?;
    Ok(())
}

fn escape_cmake(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
}

fn cmake_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::options::OptionSet;
    use crate::recipe::parser::parse_recipe;
    use crate::recipe::requirement::Requirement;
    use crate::recipe::settings::Settings;

    const RECIPE: &str = r#"
[package]
name = "demo"
version = "2.0.0"
description = "Says \"hi\""

[toolchain.variables]
PKG_DESCRIPTION = "%(description)s"
ENABLE_TESTS = "%(options.with_tests)s"
"#;

    fn ctx(recipe: &Recipe, options: OptionSet) -> CookContext {
        CookContext::new(recipe, Settings::host(), options)
    }

    #[test]
    fn test_render_toolchain() {
        let recipe = parse_recipe(RECIPE).unwrap();
        let toolchain = Toolchain::new(&recipe, &ctx(&recipe, OptionSet::default())).unwrap();
        let text = toolchain.render();

        assert!(text.contains("set(BUILD_SHARED_LIBS ON"));
        assert!(text.contains("set(CMAKE_BUILD_TYPE \"Release\""));
        assert!(text.contains("set(ENABLE_TESTS \"true\""));
        assert!(text.contains("set(PKG_DESCRIPTION \"Says \\\"hi\\\"\""));
        assert!(text.contains("include(\"${CMAKE_CURRENT_LIST_DIR}/terminus_deps.cmake\")"));
    }

    #[test]
    fn test_static_build_turns_off_shared() {
        let recipe = parse_recipe(RECIPE).unwrap();
        let options = OptionSet::default().with_overrides(&["shared=false"]).unwrap();
        let toolchain = Toolchain::new(&recipe, &ctx(&recipe, options)).unwrap();
        assert!(!toolchain.shared);
        assert!(toolchain.render().contains("set(BUILD_SHARED_LIBS OFF"));
    }

    #[test]
    fn test_descriptor_render() {
        let resolved = vec![
            ResolvedDependency {
                requirement: Requirement::parse("boost/1.89.0", RequirementKind::Library).unwrap(),
                package_folder: PathBuf::from("/deps/boost/1.89.0"),
            },
            ResolvedDependency {
                requirement: Requirement::parse("terminus_cmake/1.0.8", RequirementKind::Tool)
                    .unwrap(),
                package_folder: PathBuf::from("/deps/terminus_cmake/1.0.8"),
            },
        ];
        let descriptor = DependencyDescriptor::new(&resolved);
        let cmake = descriptor.render_cmake();

        assert!(cmake.contains("set(boost_ROOT \"/deps/boost/1.89.0\")"));
        assert!(cmake.contains("list(APPEND CMAKE_MODULE_PATH \"/deps/terminus_cmake/1.0.8/cmake\")"));
        assert!(!cmake.contains("/deps/boost/1.89.0/cmake"));

        let json: serde_json::Value = serde_json::from_str(&descriptor.render_json().unwrap()).unwrap();
        assert_eq!(json["dependencies"][0]["name"], "boost");
        assert_eq!(json["dependencies"][1]["kind"], "tool");
    }

    #[test]
    fn test_generate_is_idempotent() {
        let recipe = parse_recipe(RECIPE).unwrap();
        let temp = tempfile::tempdir().unwrap();
        let context = ctx(&recipe, OptionSet::default());

        let first = generate_descriptors(&recipe, &context, &[], temp.path()).unwrap();
        let before = fs::read(&first.toolchain_file).unwrap();
        let second = generate_descriptors(&recipe, &context, &[], temp.path()).unwrap();
        let after = fs::read(&second.toolchain_file).unwrap();

        assert_eq!(first, second);
        assert_eq!(before, after);
    }

    #[test]
    fn test_escape_cmake() {
        assert_eq!(escape_cmake("a\"b"), "a\\\"b");
        assert_eq!(escape_cmake("${HOME}"), "\\${HOME}");
        assert_eq!(escape_cmake("C:\\x"), "C:\\\\x");
    }
}
