// src/recipe/kitchen/cmake.rs

//! Native build system driver
//!
//! The Kitchen talks to the native build through [`NativeBuildSystem`].
//! [`CMake`] runs the real tool; tests substitute a recording mock so the
//! full cook flow runs without a compiler.
//!
//! Configure runs once per invocation and yields a [`ConfiguredBuild`]
//! handle. Build and install only exist on that handle, so neither can run
//! against an unconfigured tree.

use crate::error::{Error, Result};
use crate::recipe::settings::BuildType;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Folders and parameters shared by every native step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    pub source_folder: PathBuf,
    pub build_folder: PathBuf,
    pub package_folder: PathBuf,
    pub toolchain_file: PathBuf,
    pub build_type: BuildType,
    pub generator: Option<String>,
    pub jobs: u32,
}

/// One native build step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configure,
    Build,
    Install,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Configure => "configure",
            Phase::Build => "build",
            Phase::Install => "install",
        }
    }

    /// Wrap native output in the error for this phase
    pub fn failure(&self, message: String) -> Error {
        match self {
            Phase::Configure => Error::ConfigureFailed(message),
            Phase::Build => Error::BuildFailed(message),
            Phase::Install => Error::InstallFailed(message),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seam between the Kitchen and the native build tool
///
/// Each method returns the step's captured output on success. Failures
/// carry the tool's output unmodified in the phase's error variant.
pub trait NativeBuildSystem: Send + Sync {
    fn configure(&self, layout: &BuildLayout) -> Result<String>;
    fn build(&self, layout: &BuildLayout) -> Result<String>;
    fn install(&self, layout: &BuildLayout) -> Result<String>;
}

/// CMake invoked as an external process
#[derive(Debug, Clone)]
pub struct CMake {
    program: String,
}

impl CMake {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments for a phase, in the order they are passed
    pub fn arguments(phase: Phase, layout: &BuildLayout) -> Vec<String> {
        let build_type = layout.build_type.as_str().to_string();
        let mut args = Vec::new();

        match phase {
            Phase::Configure => {
                args.push("-S".to_string());
                args.push(path_arg(&layout.source_folder));
                args.push("-B".to_string());
                args.push(path_arg(&layout.build_folder));
                if let Some(generator) = &layout.generator {
                    args.push("-G".to_string());
                    args.push(generator.clone());
                }
                args.push(format!(
                    "-DCMAKE_TOOLCHAIN_FILE={}",
                    path_arg(&layout.toolchain_file)
                ));
                args.push(format!(
                    "-DCMAKE_INSTALL_PREFIX={}",
                    path_arg(&layout.package_folder)
                ));
                args.push(format!("-DCMAKE_BUILD_TYPE={}", build_type));
            }
            Phase::Build => {
                args.push("--build".to_string());
                args.push(path_arg(&layout.build_folder));
                args.push("--config".to_string());
                args.push(build_type);
                args.push("--parallel".to_string());
                args.push(layout.jobs.max(1).to_string());
            }
            Phase::Install => {
                args.push("--install".to_string());
                args.push(path_arg(&layout.build_folder));
                args.push("--config".to_string());
                args.push(build_type);
                args.push("--prefix".to_string());
                args.push(path_arg(&layout.package_folder));
            }
        }

        args
    }

    fn run(&self, phase: Phase, layout: &BuildLayout) -> Result<String> {
        let program = which::which(&self.program).map_err(|e| {
            phase.failure(format!("{} not found: {}", self.program, e))
        })?;
        let args = Self::arguments(phase, layout);

        info!("Running {} {}", self.program, args.join(" "));

        let output = Command::new(&program)
            .args(&args)
            .output()
            .map_err(|e| phase.failure(format!("Failed to run {}: {}", program.display(), e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(phase.failure(format!(
                "{} exited with {}\n{}{}",
                self.program, output.status, stdout, stderr
            )));
        }

        debug!("{} {} finished", self.program, phase);

        let mut log = stdout.into_owned();
        log.push_str(&stderr);
        Ok(log)
    }
}

impl Default for CMake {
    fn default() -> Self {
        Self::new("cmake")
    }
}

impl NativeBuildSystem for CMake {
    fn configure(&self, layout: &BuildLayout) -> Result<String> {
        self.run(Phase::Configure, layout)
    }

    fn build(&self, layout: &BuildLayout) -> Result<String> {
        self.run(Phase::Build, layout)
    }

    fn install(&self, layout: &BuildLayout) -> Result<String> {
        self.run(Phase::Install, layout)
    }
}

/// A configured native build tree
pub struct ConfiguredBuild<'a> {
    system: &'a dyn NativeBuildSystem,
    layout: BuildLayout,
}

impl<'a> ConfiguredBuild<'a> {
    /// Run the native configure step and return the handle with its output
    pub fn configure(
        system: &'a dyn NativeBuildSystem,
        layout: BuildLayout,
    ) -> Result<(Self, String)> {
        let log = system.configure(&layout)?;
        Ok((Self { system, layout }, log))
    }

    pub fn layout(&self) -> &BuildLayout {
        &self.layout
    }

    pub fn build(&self) -> Result<String> {
        self.system.build(&self.layout)
    }

    pub fn install(&self) -> Result<String> {
        self.system.install(&self.layout)
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(root: &Path) -> BuildLayout {
        BuildLayout {
            source_folder: root.join("src"),
            build_folder: root.join("build"),
            package_folder: root.join("package"),
            toolchain_file: root.join("build/generators/terminus_toolchain.cmake"),
            build_type: BuildType::Release,
            generator: Some("Ninja".to_string()),
            jobs: 8,
        }
    }

    #[test]
    fn test_configure_arguments() {
        let args = CMake::arguments(Phase::Configure, &layout(Path::new("/w")));
        assert_eq!(
            args,
            vec![
                "-S",
                "/w/src",
                "-B",
                "/w/build",
                "-G",
                "Ninja",
                "-DCMAKE_TOOLCHAIN_FILE=/w/build/generators/terminus_toolchain.cmake",
                "-DCMAKE_INSTALL_PREFIX=/w/package",
                "-DCMAKE_BUILD_TYPE=Release",
            ]
        );
    }

    #[test]
    fn test_build_and_install_arguments() {
        let l = layout(Path::new("/w"));
        assert_eq!(
            CMake::arguments(Phase::Build, &l),
            vec!["--build", "/w/build", "--config", "Release", "--parallel", "8"]
        );
        assert_eq!(
            CMake::arguments(Phase::Install, &l),
            vec!["--install", "/w/build", "--config", "Release", "--prefix", "/w/package"]
        );
    }

    #[test]
    fn test_missing_program_fails_in_phase() {
        let cmake = CMake::new("definitely-not-a-real-cmake-binary");
        let l = layout(Path::new("/w"));
        assert!(matches!(cmake.configure(&l), Err(Error::ConfigureFailed(_))));
        assert!(matches!(cmake.build(&l), Err(Error::BuildFailed(_))));
        assert!(matches!(cmake.install(&l), Err(Error::InstallFailed(_))));
    }

    #[cfg(unix)]
    fn fake_cmake(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-cmake");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_output_is_captured() {
        let temp = tempfile::tempdir().unwrap();
        let program = fake_cmake(temp.path(), "echo \"cmake $@\"");
        let cmake = CMake::new(program.to_string_lossy());

        let log = cmake.build(&layout(temp.path())).unwrap();
        assert!(log.contains("--build"));
        assert!(log.contains("--parallel 8"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_keeps_native_output() {
        let temp = tempfile::tempdir().unwrap();
        let program = fake_cmake(
            temp.path(),
            "echo 'main.cpp:3: error: expected ;' >&2\nexit 2",
        );
        let cmake = CMake::new(program.to_string_lossy());

        let err = cmake.build(&layout(temp.path())).unwrap_err();
        match err {
            Error::BuildFailed(message) => {
                assert!(message.contains("main.cpp:3: error: expected ;"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
