//! `spire init`: project scaffolding command.
//!
//! Writes a starter `spire.toml` and the conventional shader directories
//! (`shaders/` with a `materials/` subdirectory).

use std::fs;
use std::path::{Path, PathBuf};

use spire_config::CONFIG_FILE;

use crate::GlobalArgs;

/// Starter configuration. Every key shows its default.
const TEMPLATE: &str = r#"[paths]
input = "shaders"
output = "build/shaders"
# Extra include directories, searched after the input root and its parent.
include = []

[toolchain]
# SDK root whose bin/ holds slangc and glslangValidator.
# Falls back to the VULKAN_SDK environment variable, then PATH.
# sdk = "/opt/vulkan-sdk"
profile = "glsl_460"
target_env = "vulkan1.3"
debug_info = true
include_notice = "include"
# timeout_secs = 120

[build]
# Concurrent compiler invocations, 0 for one per core.
jobs = 0
# What to do with an artifact that has no dependency manifest:
# "rebuild" or "assume-fresh".
missing_manifest = "rebuild"
"#;

/// Runs the `spire init` command.
///
/// Initializes `dir` (created if needed) or the current directory.
/// Refuses to overwrite an existing `spire.toml`.
pub fn run(dir: Option<String>, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let root = match dir {
        Some(d) => PathBuf::from(d),
        None => std::env::current_dir()?,
    };
    let config = init_project(&root)?;
    if !global.quiet {
        eprintln!("     Created {}", config.display());
    }
    Ok(0)
}

/// Scaffolds a project in `root` and returns the path of the written config.
fn init_project(root: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let config = root.join(CONFIG_FILE);
    if config.exists() {
        return Err(format!("{} already exists", config.display()).into());
    }
    fs::create_dir_all(root.join("shaders").join("materials"))?;
    fs::write(&config, TEMPLATE)?;
    Ok(config)
}
