// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files that describe how a native package is configured,
//! built and packaged. Everything that varies per project (requirements,
//! toolchain variables, the export allowlist, published libraries) is data in
//! the recipe rather than code.

use crate::error::{Error, Result};
use crate::recipe::options::{OptionName, OptionSet};
use crate::recipe::package_id::PackageIdPolicy;
use crate::recipe::requirement::{Requirement, RequirementKind};
use crate::recipe::settings::Settings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A complete package recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    /// Package identity
    pub package: PackageSection,

    /// Option defaults
    #[serde(default)]
    pub options: OptionSet,

    /// Upstream requirements, in declaration order
    #[serde(default)]
    pub requires: Vec<Requirement>,

    /// Variables injected into the native build system
    #[serde(default)]
    pub toolchain: ToolchainSection,

    /// Source allowlist for export
    #[serde(default)]
    pub exports: ExportsSection,

    /// Metadata published to downstream consumers
    #[serde(default)]
    pub package_info: PackageInfoSection,

    /// Package identity policy
    #[serde(default)]
    pub package_id: PackageIdSection,
}

impl Recipe {
    /// Substitute variables in a template
    ///
    /// Replaces `%(key)s` patterns. Supported keys:
    /// - `name`, `version`, `description`, `url`, `license`, `author`
    /// - `options.<option>` (rendered as `true`/`false`)
    /// - `settings.<setting>` (`os`, `compiler`, `build_type`, `arch`)
    ///
    /// Unknown keys and unterminated patterns are errors.
    pub fn substitute(
        &self,
        template: &str,
        settings: &Settings,
        options: &OptionSet,
    ) -> Result<String> {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("%(") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find(")s").ok_or_else(|| {
                Error::ParseError(format!("Unterminated variable in '{}'", template))
            })?;
            let key = &after[..end];
            result.push_str(&self.lookup(key, settings, options)?);
            rest = &after[end + 2..];
        }
        result.push_str(rest);

        Ok(result)
    }

    fn lookup(&self, key: &str, settings: &Settings, options: &OptionSet) -> Result<String> {
        let pkg = &self.package;
        let value = match key {
            "name" => pkg.name.clone(),
            "version" => pkg.version.clone(),
            "description" => pkg.description.clone().unwrap_or_default(),
            "url" => pkg.url.clone().unwrap_or_default(),
            "license" => pkg.license.clone().unwrap_or_default(),
            "author" => pkg.author.clone().unwrap_or_default(),
            _ => {
                if let Some(option) = key.strip_prefix("options.") {
                    let name: OptionName = option.parse()?;
                    options.get(name).to_string()
                } else if let Some(setting) = key.strip_prefix("settings.") {
                    settings.get(setting).ok_or_else(|| {
                        Error::ParseError(format!("Unknown setting variable '%({})s'", key))
                    })?
                } else {
                    return Err(Error::ParseError(format!("Unknown variable '%({})s'", key)));
                }
            }
        };
        Ok(value)
    }

    /// Requirements that take part in the build
    pub fn enabled_requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.requires.iter().filter(|r| r.enabled)
    }

    /// Requirements that are declared but switched off
    pub fn disabled_requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.requires.iter().filter(|r| !r.enabled)
    }

    /// Enabled requirements of one kind
    pub fn requirements_of(&self, kind: RequirementKind) -> impl Iterator<Item = &Requirement> {
        self.enabled_requirements().filter(move |r| r.kind == kind)
    }

    /// Library names published to consumers
    ///
    /// Falls back to the package name when the recipe lists none.
    pub fn libs(&self) -> Vec<String> {
        if self.package_info.libs.is_empty() {
            vec![self.package.name.clone()]
        } else {
            self.package_info.libs.clone()
        }
    }
}

/// Package identity section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// License identifier
    #[serde(default)]
    pub license: Option<String>,

    /// Author contact
    #[serde(default)]
    pub author: Option<String>,

    /// Homepage or repository URL
    #[serde(default)]
    pub url: Option<String>,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,

    /// Search topics
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Toolchain variables
///
/// Values are `%(key)s` templates, rendered once per invocation from the
/// package identity, settings and options. Stored sorted so generated files
/// come out in a stable order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainSection {
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

/// Export allowlist
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportsSection {
    /// Ordered glob patterns, relative to the recipe folder
    ///
    /// A pattern matching a directory exports that directory recursively.
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Published package metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageInfoSection {
    /// Library artifacts produced by the package
    #[serde(default)]
    pub libs: Vec<String>,
}

/// Package identity policy section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageIdSection {
    #[serde(default)]
    pub policy: PackageIdPolicy,
}
