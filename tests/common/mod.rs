// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use terminus_recipe::recipe::kitchen::{BuildLayout, NativeBuildSystem, Phase};
use terminus_recipe::recipe::{Kitchen, KitchenConfig, Recipe};
use terminus_recipe::{Error, Result};

/// Native build system that records each step instead of running CMake.
///
/// `install` drops a fake shared library into the package folder so the
/// package stage has something to publish.
#[derive(Default)]
pub struct RecordingBuildSystem {
    pub calls: Mutex<Vec<(Phase, BuildLayout)>>,
    pub fail_at: Option<Phase>,
}

impl RecordingBuildSystem {
    pub fn failing_at(phase: Phase) -> Self {
        Self {
            fail_at: Some(phase),
            ..Default::default()
        }
    }

    pub fn phases(&self) -> Vec<Phase> {
        self.calls.lock().unwrap().iter().map(|(p, _)| *p).collect()
    }

    fn record(&self, phase: Phase, layout: &BuildLayout) -> Result<()> {
        self.calls.lock().unwrap().push((phase, layout.clone()));
        if self.fail_at == Some(phase) {
            return Err(phase.failure(format!("{} step failed on purpose", phase)));
        }
        Ok(())
    }
}

impl NativeBuildSystem for RecordingBuildSystem {
    fn configure(&self, layout: &BuildLayout) -> Result<String> {
        self.record(Phase::Configure, layout)?;
        if !layout.toolchain_file.is_file() {
            return Err(Error::ConfigureFailed(format!(
                "toolchain file {} missing",
                layout.toolchain_file.display()
            )));
        }
        Ok("-- Configuring done\n-- Generating done\n".to_string())
    }

    fn build(&self, layout: &BuildLayout) -> Result<String> {
        self.record(Phase::Build, layout)?;
        Ok("[100%] Built target terminus_image\n".to_string())
    }

    fn install(&self, layout: &BuildLayout) -> Result<String> {
        self.record(Phase::Install, layout)?;
        let lib = layout.package_folder.join("lib");
        fs::create_dir_all(&lib)?;
        fs::write(lib.join("libterminus_image.so"), b"\x7fELF")?;
        Ok(format!("-- Installing: {}\n", lib.display()))
    }
}

/// Create `<root>/<name>/<version>` for every enabled requirement.
pub fn populate_deps(root: &Path, recipe: &Recipe) {
    for req in recipe.enabled_requirements() {
        fs::create_dir_all(root.join(&req.name).join(&req.version)).unwrap();
    }
}

/// A Kitchen working entirely inside `temp`, backed by a local deps root.
pub fn kitchen_in(temp: &TempDir, build_system: Arc<RecordingBuildSystem>) -> Kitchen {
    let root = temp.path();
    let config = KitchenConfig {
        source_folder: root.join("source"),
        build_folder: root.join("build"),
        package_folder: root.join("package"),
        deps_root: root.join("deps"),
        jobs: 2,
        ..KitchenConfig::default()
    };
    Kitchen::new(config).with_build_system(build_system)
}

pub fn generators_folder(temp: &TempDir) -> PathBuf {
    temp.path().join("build").join("generators")
}

/// Write a terminus_image style source checkout, plus files that must not
/// be exported.
pub fn create_source_tree(root: &Path) {
    let files = [
        ("CMakeLists.txt", "cmake_minimum_required(VERSION 3.20)\n"),
        ("README.md", "# terminus_image\n"),
        ("include/terminus/image/Image.hpp", "#pragma once\n"),
        ("include/terminus/image/pixel/Pixel_RGB.hpp", "#pragma once\n"),
        ("src/Image.cpp", "// image\n"),
        ("src/io/read_image.cpp", "// io\n"),
        ("test/CMakeLists.txt", "add_executable(tests)\n"),
        ("test/TEST_Image.cpp", "// test\n"),
        // Not on the allowlist
        ("conanfile.py", "# recipe\n"),
        ("notes.txt", "scratch\n"),
        ("docs/Doxyfile", "PROJECT_NAME=terminus_image\n"),
        ("build/CMakeCache.txt", "CMAKE_BUILD_TYPE:STRING=Release\n"),
        (".git/config", "[core]\n"),
    ];

    for (rel, content) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}
