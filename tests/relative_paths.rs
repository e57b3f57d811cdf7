// tests/relative_paths.rs

//! Cooking and exporting with folders given relative to the working
//! directory, the way the CLI passes its defaults.

mod common;

use common::{create_source_tree, populate_deps, RecordingBuildSystem};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use terminus_recipe::recipe::kitchen::{export_sources, CMake, Phase};
use terminus_recipe::recipe::{terminus_image, CookContext, Kitchen, KitchenConfig, Settings};

/// Tests here change the process working directory
static CWD: Mutex<()> = Mutex::new(());

/// Run `f` with the working directory set to `dir`, restoring it after
fn in_dir<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
    let _guard = CWD.lock().unwrap_or_else(|e| e.into_inner());
    let previous = env::current_dir().unwrap();
    env::set_current_dir(dir).unwrap();
    let result = f();
    env::set_current_dir(previous).unwrap();
    result
}

#[test]
fn test_export_from_current_directory() {
    let temp = tempfile::tempdir().unwrap();
    create_source_tree(temp.path());
    let recipe = terminus_image().unwrap();

    let files = in_dir(temp.path(), || {
        export_sources(Path::new("."), &recipe.exports.sources, Path::new("export")).unwrap()
    });

    assert!(files.contains(&PathBuf::from("CMakeLists.txt")));
    assert!(files.contains(&PathBuf::from("src/Image.cpp")));
    assert!(!files.iter().any(|f| f.starts_with("export")));
    assert!(temp.path().join("export/include/terminus/image/Image.hpp").exists());
    assert!(!temp.path().join("export/conanfile.py").exists());
}

#[test]
fn test_cook_with_relative_folders() {
    let temp = tempfile::tempdir().unwrap();
    let recipe = terminus_image().unwrap();
    populate_deps(&temp.path().join("deps"), &recipe);
    fs::create_dir_all(temp.path().join("checkout")).unwrap();

    let build = Arc::new(RecordingBuildSystem::default());
    let (cwd, result) = in_dir(temp.path(), || {
        let config = KitchenConfig {
            source_folder: PathBuf::from("checkout"),
            build_folder: PathBuf::from("build"),
            package_folder: PathBuf::from("package"),
            deps_root: PathBuf::from("deps"),
            ..KitchenConfig::default()
        };
        let kitchen = Kitchen::new(config).with_build_system(build.clone());
        let ctx = CookContext::new(&recipe, Settings::host(), recipe.options);
        (env::current_dir().unwrap(), kitchen.cook(&recipe, &ctx).unwrap())
    });

    assert_eq!(result.package_folder, cwd.join("package"));

    for (phase, layout) in build.calls.lock().unwrap().iter() {
        assert!(layout.source_folder.is_absolute(), "{} source", phase);
        assert!(layout.build_folder.is_absolute(), "{} build", phase);
        assert!(layout.package_folder.is_absolute(), "{} package", phase);
        assert!(layout.toolchain_file.is_absolute(), "{} toolchain", phase);
    }

    let calls = build.calls.lock().unwrap();
    let (_, layout) = calls.iter().find(|(p, _)| *p == Phase::Configure).unwrap();
    let toolchain = cwd.join("build/generators/terminus_toolchain.cmake");
    assert!(CMake::arguments(Phase::Configure, layout)
        .contains(&format!("-DCMAKE_TOOLCHAIN_FILE={}", toolchain.display())));

    let generated = result.generated.unwrap();
    let deps = fs::read_to_string(&generated.deps_file).unwrap();
    let boost = cwd.join("deps/boost/1.89.0");
    assert!(deps.contains(&format!("set(boost_ROOT \"{}\")", boost.display())));
    assert!(result
        .dependencies
        .iter()
        .all(|d| d.package_folder.is_absolute()));
}
