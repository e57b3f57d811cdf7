// src/recipe/options.rs

//! Build options
//!
//! The option set is a fixed group of typed booleans. Defaults come from the
//! recipe's `[options]` table and can be overridden per invocation with
//! `name=value` pairs. Values are never coerced: only `true`/`false`
//! (or `True`/`False`) are accepted.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Names of the recipe's build options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionName {
    /// Build a shared library instead of a static one
    Shared,
    /// Build and register the test suite
    WithTests,
    /// Build the documentation
    WithDocs,
    /// Instrument the build for coverage reports
    WithCoverage,
}

impl OptionName {
    /// All option names, in declaration order
    pub const ALL: [OptionName; 4] = [
        OptionName::Shared,
        OptionName::WithTests,
        OptionName::WithDocs,
        OptionName::WithCoverage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionName::Shared => "shared",
            OptionName::WithTests => "with_tests",
            OptionName::WithDocs => "with_docs",
            OptionName::WithCoverage => "with_coverage",
        }
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        OptionName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| {
                Error::InvalidOption(format!(
                    "unknown option '{}' (expected one of: shared, with_tests, with_docs, with_coverage)",
                    s
                ))
            })
    }
}

/// Parse a boolean option value without coercion
pub fn parse_bool(value: &str) -> Result<bool> {
    match value.trim() {
        "true" | "True" => Ok(true),
        "false" | "False" => Ok(false),
        other => Err(Error::InvalidOption(format!(
            "'{}' is not a boolean (expected true or false)",
            other
        ))),
    }
}

/// The option set used for one invocation
///
/// Deserializes from the recipe's `[options]` table, where it supplies the
/// defaults. Unknown keys and non-boolean values are rejected by serde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionSet {
    #[serde(default = "default_true")]
    pub shared: bool,

    #[serde(default = "default_true")]
    pub with_tests: bool,

    #[serde(default = "default_true")]
    pub with_docs: bool,

    #[serde(default)]
    pub with_coverage: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OptionSet {
    fn default() -> Self {
        Self {
            shared: true,
            with_tests: true,
            with_docs: true,
            with_coverage: false,
        }
    }
}

impl OptionSet {
    /// Get an option value by name
    pub fn get(&self, name: OptionName) -> bool {
        match name {
            OptionName::Shared => self.shared,
            OptionName::WithTests => self.with_tests,
            OptionName::WithDocs => self.with_docs,
            OptionName::WithCoverage => self.with_coverage,
        }
    }

    /// Return a copy with one option changed
    pub fn with(mut self, name: OptionName, value: bool) -> Self {
        match name {
            OptionName::Shared => self.shared = value,
            OptionName::WithTests => self.with_tests = value,
            OptionName::WithDocs => self.with_docs = value,
            OptionName::WithCoverage => self.with_coverage = value,
        }
        self
    }

    /// Apply `name=value` overrides on top of these values
    ///
    /// Later overrides win when the same option is named twice.
    pub fn with_overrides<S: AsRef<str>>(self, overrides: &[S]) -> Result<Self> {
        overrides.iter().try_fold(self, |set, raw| {
            let raw = raw.as_ref();
            let (name, value) = raw.split_once('=').ok_or_else(|| {
                Error::InvalidOption(format!("expected name=value, got '{}'", raw))
            })?;
            Ok(set.with(name.trim().parse()?, parse_bool(value)?))
        })
    }

    /// Iterate over (name, value) pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (OptionName, bool)> + '_ {
        OptionName::ALL.into_iter().map(|name| (name, self.get(name)))
    }

    /// Every combination of the four options
    pub fn all_combinations() -> Vec<OptionSet> {
        (0u8..16)
            .map(|bits| OptionSet {
                shared: bits & 1 != 0,
                with_tests: bits & 2 != 0,
                with_docs: bits & 4 != 0,
                with_coverage: bits & 8 != 0,
            })
            .collect()
    }
}

impl fmt::Display for OptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        f.write_str(&pairs.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = OptionSet::default();
        assert!(options.shared);
        assert!(options.with_tests);
        assert!(options.with_docs);
        assert!(!options.with_coverage);
    }

    #[test]
    fn test_deserialize_partial_table_uses_defaults() {
        let options: OptionSet = toml::from_str("with_docs = false").unwrap();
        assert!(options.shared);
        assert!(!options.with_docs);
        assert!(!options.with_coverage);
    }

    #[test]
    fn test_deserialize_rejects_loose_values() {
        assert!(toml::from_str::<OptionSet>("shared = \"yes\"").is_err());
        assert!(toml::from_str::<OptionSet>("shared = 1").is_err());
        assert!(toml::from_str::<OptionSet>("fPIC = true").is_err());
    }

    #[test]
    fn test_overrides() {
        let options = OptionSet::default()
            .with_overrides(&["with_tests=false", "with_coverage=True"])
            .unwrap();
        assert!(!options.with_tests);
        assert!(options.with_coverage);
        assert!(options.shared);
    }

    #[test]
    fn test_override_last_wins() {
        let options = OptionSet::default()
            .with_overrides(&["shared=false", "shared=true"])
            .unwrap();
        assert!(options.shared);
    }

    #[test]
    fn test_override_rejects_unrecognized() {
        let base = OptionSet::default();
        assert!(base.with_overrides(&["shared=1"]).is_err());
        assert!(base.with_overrides(&["shared=yes"]).is_err());
        assert!(base.with_overrides(&["shared"]).is_err());
        assert!(base.with_overrides(&["fPIC=true"]).is_err());
    }

    #[test]
    fn test_all_combinations_are_distinct() {
        let combos = OptionSet::all_combinations();
        assert_eq!(combos.len(), 16);
        let unique: std::collections::HashSet<_> = combos.iter().collect();
        assert_eq!(unique.len(), 16);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            OptionSet::default().to_string(),
            "shared=true, with_tests=true, with_docs=true, with_coverage=false"
        );
    }
}
