// src/recipe/kitchen/stage.rs

//! Cook stages
//!
//! A cook walks these stages strictly in order. There is no branching and no
//! retry: the first failure ends the cook at the stage it had reached.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CookStage {
    Declared,
    DependenciesResolved,
    Configured,
    ToolchainGenerated,
    Built,
    Packaged,
    InfoPublished,
}

impl CookStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CookStage::Declared => "declared",
            CookStage::DependenciesResolved => "dependencies-resolved",
            CookStage::Configured => "configured",
            CookStage::ToolchainGenerated => "toolchain-generated",
            CookStage::Built => "built",
            CookStage::Packaged => "packaged",
            CookStage::InfoPublished => "info-published",
        }
    }

    /// The stage that follows this one
    pub fn next(&self) -> Option<CookStage> {
        match self {
            CookStage::Declared => Some(CookStage::DependenciesResolved),
            CookStage::DependenciesResolved => Some(CookStage::Configured),
            CookStage::Configured => Some(CookStage::ToolchainGenerated),
            CookStage::ToolchainGenerated => Some(CookStage::Built),
            CookStage::Built => Some(CookStage::Packaged),
            CookStage::Packaged => Some(CookStage::InfoPublished),
            CookStage::InfoPublished => None,
        }
    }
}

impl fmt::Display for CookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
