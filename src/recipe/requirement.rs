// src/recipe/requirement.rs

//! Pinned dependency declarations
//!
//! Every requirement names one exact upstream version as `name/version`.
//! Ranges, wildcards and floating aliases are rejected when the recipe is
//! parsed, so resolution never has to pick between candidates.

use crate::error::{Error, Result};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a requirement participates in the build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequirementKind {
    /// Test framework: available while building and testing, never linked
    Test,
    /// Build tool: available while building, never linked
    Tool,
    /// Link-time library dependency
    #[default]
    Library,
}

impl RequirementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementKind::Test => "test",
            RequirementKind::Tool => "tool",
            RequirementKind::Library => "library",
        }
    }

    /// Whether this requirement is only needed at build time
    pub fn is_build_time(&self) -> bool {
        matches!(self, RequirementKind::Test | RequirementKind::Tool)
    }
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated, exactly pinned requirement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRequirement", into = "RawRequirement")]
pub struct Requirement {
    pub name: String,
    pub version: String,
    pub kind: RequirementKind,
    /// Disabled requirements stay declared but are never resolved or
    /// emitted into generated files
    pub enabled: bool,
}

/// Requirement as written in the recipe file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRequirement {
    reference: String,
    #[serde(default)]
    kind: RequirementKind,
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl TryFrom<RawRequirement> for Requirement {
    type Error = Error;

    fn try_from(raw: RawRequirement) -> Result<Self> {
        let mut requirement = Requirement::parse(&raw.reference, raw.kind)?;
        requirement.enabled = raw.enabled;
        Ok(requirement)
    }
}

impl From<Requirement> for RawRequirement {
    fn from(req: Requirement) -> Self {
        RawRequirement {
            reference: req.reference(),
            kind: req.kind,
            enabled: req.enabled,
        }
    }
}

impl Requirement {
    /// Parse a `name/version` reference
    pub fn parse(reference: &str, kind: RequirementKind) -> Result<Self> {
        let reference = reference.trim();
        let (name, version) = reference.split_once('/').ok_or_else(|| {
            Error::ParseError(format!(
                "Invalid requirement '{}': expected name/version",
                reference
            ))
        })?;

        validate_name(name).map_err(|reason| {
            Error::ParseError(format!("Invalid requirement '{}': {}", reference, reason))
        })?;

        check_pinned(version).map_err(|reason| Error::Unpinned {
            reference: reference.to_string(),
            reason,
        })?;

        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            kind,
            enabled: true,
        })
    }

    /// The `name/version` reference string
    pub fn reference(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }

    /// The version as semver, when it is semver-compliant
    pub fn semver(&self) -> Option<Version> {
        Version::parse(&self.version).ok()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

fn validate_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("package name is empty".to_string());
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || "_-.+".contains(*c)))
    {
        return Err(format!("invalid character '{}' in package name", c));
    }
    Ok(())
}

/// Check that a version string names exactly one version
///
/// Accepts strict semver (`1.17.0`), dotted numeric versions (`2.38`,
/// `1.2.3.4`) and opaque tags made of `[A-Za-z0-9._+-]` such as
/// `cci.20230101`. Everything else is treated as a range or alias.
pub fn check_pinned(version: &str) -> std::result::Result<(), String> {
    if version.is_empty() {
        return Err("version is empty".to_string());
    }
    if version.starts_with('[') || version.ends_with(']') {
        return Err("version ranges are not allowed".to_string());
    }
    if let Some(c) = version.chars().find(|c| "<>=~^*|, ".contains(*c)) {
        return Err(format!("'{}' makes this a version range", c));
    }
    if version.eq_ignore_ascii_case("latest") {
        return Err("floating aliases are not allowed".to_string());
    }
    if version.contains('/') || version.contains('@') {
        return Err("unexpected reference suffix".to_string());
    }

    if Version::parse(version).is_ok() {
        return Ok(());
    }
    if version.split('.').all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())) {
        return Ok(());
    }
    if version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "._+-".contains(c))
    {
        return Ok(());
    }

    Err(format!("'{}' is not an exact version", version))
}
