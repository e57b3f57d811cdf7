// src/lib.rs

//! terminus-recipe
//!
//! Package recipe runner for native CMake projects. A recipe declares a
//! package's identity, options, pinned requirements, toolchain variables and
//! export allowlist; the Kitchen turns it into generated CMake descriptors,
//! a native build and a published package.
//!
//! # Architecture
//!
//! - Data-driven recipes: TOML files parsed into strongly typed structs
//! - Linear cook stages: resolve, configure, generate, build, package, publish
//! - Seams for dependency resolution and the native build system
//! - Package ids with an explicit policy for collapsing build variants

mod error;
pub mod hash;
pub mod recipe;

pub use error::{Error, Result};
pub use hash::{Hash, HashAlgorithm, Hasher};
pub use recipe::{Cook, CookContext, CookResult, Kitchen, KitchenConfig, Recipe};
