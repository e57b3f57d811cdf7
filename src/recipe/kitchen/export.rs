// src/recipe/kitchen/export.rs

//! Export-sources staging
//!
//! Copies the recipe's allowlisted files from the recipe folder into an
//! export folder. Patterns are globs relative to the recipe folder; a match
//! that is a directory is copied recursively. Anything not matched stays
//! behind.

use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Stage allowlisted sources from `recipe_folder` into `dest`
///
/// `dest` must be absent or empty. Relative folders are taken from the
/// current directory. Returns the copied files relative to `dest`, sorted.
pub fn export_sources(recipe_folder: &Path, patterns: &[String], dest: &Path) -> Result<Vec<PathBuf>> {
    let recipe_folder = std::path::absolute(recipe_folder)?;
    let dest = std::path::absolute(dest)?;
    let (recipe_folder, dest) = (recipe_folder.as_path(), dest.as_path());

    if dest.exists() && fs::read_dir(dest)?.next().is_some() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("export folder {} is not empty", dest.display()),
        )));
    }
    fs::create_dir_all(dest)?;

    let base = glob::Pattern::escape(&recipe_folder.to_string_lossy());
    let mut copied = BTreeSet::new();

    for pattern in patterns {
        let full = format!("{}/{}", base, pattern);
        let matches = glob::glob(&full)
            .map_err(|e| Error::ParseError(format!("Invalid export pattern '{}': {}", pattern, e)))?;

        let mut matched = 0usize;
        for entry in matches {
            let path = entry.map_err(|e| Error::Io(e.into()))?;
            if path.starts_with(dest) {
                continue;
            }
            let rel = relative_to(&path, recipe_folder)?;
            matched += 1;

            if path.is_dir() {
                for file in copy_tree(&path, &dest.join(&rel))? {
                    copied.insert(rel.join(file));
                }
            } else {
                copy_file(&path, &dest.join(&rel))?;
                copied.insert(rel);
            }
        }

        if matched == 0 {
            warn!("Export pattern '{}' matched nothing", pattern);
        } else {
            debug!("Export pattern '{}' matched {} path(s)", pattern, matched);
        }
    }

    info!(
        "Exported {} file(s) from {} to {}",
        copied.len(),
        recipe_folder.display(),
        dest.display()
    );

    Ok(copied.into_iter().collect())
}

/// Copy a directory tree, returning copied files relative to `src`
pub(crate) fn copy_tree(src: &Path, dst: &Path) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::new();

    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io(io::Error::other(e.to_string())))?;
        let rel = relative_to(entry.path(), src)?;
        let target = dst.join(&rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            copy_file(entry.path(), &target)?;
            copied.push(rel);
        }
    }

    Ok(copied)
}

fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)?;
    Ok(())
}

fn relative_to(path: &Path, base: &Path) -> Result<PathBuf> {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .map_err(|_| {
            Error::Io(io::Error::other(format!(
                "{} is outside {}",
                path.display(),
                base.display()
            )))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    fn patterns(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_export_allowlist_only() {
        let recipe = tempfile::tempdir().unwrap();
        touch(recipe.path(), "CMakeLists.txt");
        touch(recipe.path(), "src/image.cpp");
        touch(recipe.path(), "src/detail/codec.cpp");
        touch(recipe.path(), "notes.txt");
        touch(recipe.path(), "build/CMakeCache.txt");

        let out = tempfile::tempdir().unwrap();
        let dest = out.path().join("export");
        let copied = export_sources(
            recipe.path(),
            &patterns(&["CMakeLists.txt", "src/*"]),
            &dest,
        )
        .unwrap();

        assert_eq!(
            copied,
            vec![
                PathBuf::from("CMakeLists.txt"),
                PathBuf::from("src/detail/codec.cpp"),
                PathBuf::from("src/image.cpp"),
            ]
        );
        assert!(!dest.join("notes.txt").exists());
        assert!(!dest.join("build").exists());
    }

    #[test]
    fn test_missing_pattern_is_not_an_error() {
        let recipe = tempfile::tempdir().unwrap();
        touch(recipe.path(), "CMakeLists.txt");

        let out = tempfile::tempdir().unwrap();
        let copied = export_sources(
            recipe.path(),
            &patterns(&["CMakeLists.txt", "README.md"]),
            &out.path().join("export"),
        )
        .unwrap();
        assert_eq!(copied, vec![PathBuf::from("CMakeLists.txt")]);
    }

    #[test]
    fn test_non_empty_destination_rejected() {
        let recipe = tempfile::tempdir().unwrap();
        touch(recipe.path(), "CMakeLists.txt");

        let out = tempfile::tempdir().unwrap();
        touch(out.path(), "stale.txt");
        assert!(export_sources(recipe.path(), &patterns(&["*"]), out.path()).is_err());
    }

    #[test]
    fn test_copy_tree() {
        let src = tempfile::tempdir().unwrap();
        touch(src.path(), "a/b/c.txt");
        touch(src.path(), "d.txt");

        let dst = tempfile::tempdir().unwrap();
        let copied = copy_tree(src.path(), dst.path()).unwrap();
        assert_eq!(copied, vec![PathBuf::from("a/b/c.txt"), PathBuf::from("d.txt")]);
        assert_eq!(fs::read_to_string(dst.path().join("a/b/c.txt")).unwrap(), "a/b/c.txt");
    }
}
