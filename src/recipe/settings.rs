// src/recipe/settings.rs

//! Target settings supplied by the invoking orchestrator
//!
//! Settings describe the platform a package is built for: operating system,
//! compiler, build type and architecture. They default to the host and can
//! be overridden with `name=value` pairs.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// CMake build type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Debug" => Ok(BuildType::Debug),
            "Release" => Ok(BuildType::Release),
            "RelWithDebInfo" => Ok(BuildType::RelWithDebInfo),
            "MinSizeRel" => Ok(BuildType::MinSizeRel),
            other => Err(Error::InvalidSetting(format!(
                "unknown build_type '{}' (expected Debug, Release, RelWithDebInfo or MinSizeRel)",
                other
            ))),
        }
    }
}

/// Settings for one build invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Settings {
    /// Operating system (e.g. "linux", "macos", "windows")
    pub os: String,
    /// Compiler family (e.g. "gcc", "clang", "msvc")
    pub compiler: String,
    pub build_type: BuildType,
    /// Architecture (e.g. "x86_64", "aarch64")
    pub arch: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self::host()
    }
}

impl Settings {
    /// Settings describing the machine we are running on
    pub fn host() -> Self {
        let compiler = match std::env::consts::OS {
            "macos" => "apple-clang",
            "windows" => "msvc",
            _ => "gcc",
        };

        Self {
            os: std::env::consts::OS.to_string(),
            compiler: compiler.to_string(),
            build_type: BuildType::default(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    /// Look up a setting by name
    pub fn get(&self, name: &str) -> Option<String> {
        match name {
            "os" => Some(self.os.clone()),
            "compiler" => Some(self.compiler.clone()),
            "build_type" => Some(self.build_type.to_string()),
            "arch" => Some(self.arch.clone()),
            _ => None,
        }
    }

    /// Apply `name=value` overrides on top of these settings
    pub fn with_overrides<S: AsRef<str>>(mut self, overrides: &[S]) -> Result<Self> {
        for raw in overrides {
            let raw = raw.as_ref();
            let (name, value) = raw.split_once('=').ok_or_else(|| {
                Error::InvalidSetting(format!("expected name=value, got '{}'", raw))
            })?;
            let value = value.trim();
            if value.is_empty() {
                return Err(Error::InvalidSetting(format!("setting '{}' has no value", name)));
            }

            match name.trim() {
                "os" => self.os = value.to_string(),
                "compiler" => self.compiler = value.to_string(),
                "build_type" => self.build_type = value.parse()?,
                "arch" => self.arch = value.to_string(),
                other => {
                    return Err(Error::InvalidSetting(format!(
                        "unknown setting '{}' (expected one of: os, compiler, build_type, arch)",
                        other
                    )));
                }
            }
        }
        Ok(self)
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "os={}, compiler={}, build_type={}, arch={}",
            self.os, self.compiler, self.build_type, self.arch
        )
    }
}
