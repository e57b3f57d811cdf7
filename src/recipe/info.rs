// src/recipe/info.rs

//! Package info published to downstream consumers

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::recipe::package_id::PackageId;
use crate::recipe::requirement::RequirementKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const PACKAGE_INFO_FILE: &str = "package_info.json";

/// What a consumer needs to link against a packaged recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    pub package_id: PackageId,
    /// Library artifacts to link
    pub libs: Vec<String>,
    /// Link-time requirements consumers inherit, as `name/version`
    #[serde(default)]
    pub requires: Vec<String>,
}

impl PackageInfo {
    pub fn from_recipe(recipe: &Recipe, package_id: &PackageId) -> Self {
        Self {
            name: recipe.package.name.clone(),
            version: recipe.package.version.clone(),
            package_id: package_id.clone(),
            libs: recipe.libs(),
            requires: recipe
                .requirements_of(RequirementKind::Library)
                .map(|r| r.reference())
                .collect(),
        }
    }

    /// Write `package_info.json` into a package folder
    pub fn write(&self, package_folder: &Path) -> Result<PathBuf> {
        fs::create_dir_all(package_folder)?;
        let path = package_folder.join(PACKAGE_INFO_FILE);
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(&path, json)?;
        Ok(path)
    }

    /// Read `package_info.json` back from a package folder
    pub fn read(package_folder: &Path) -> Result<Self> {
        let path = package_folder.join(PACKAGE_INFO_FILE);
        let content = fs::read_to_string(&path).map_err(|e| {
            Error::NotFound(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}
