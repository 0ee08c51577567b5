//! Project resolution: anchoring configured paths and building the toolchain.

use std::path::{Path, PathBuf};
use std::time::Duration;

use spire_cache::MissingManifestPolicy;
use spire_compiler::ToolchainConfig;

use crate::types::SpireConfig;

/// A configuration with every path made concrete.
#[derive(Debug, Clone)]
pub struct ResolvedProject {
    /// Root of the shader source tree.
    pub input: PathBuf,
    /// Root of the artifact tree.
    pub output: PathBuf,
    /// Configured include directories, searched after the input root and its parent.
    pub extra_includes: Vec<PathBuf>,
    /// Compiler executables and options.
    pub toolchain: ToolchainConfig,
    /// Worker count, 0 for automatic.
    pub jobs: usize,
    /// Policy for artifacts without a manifest.
    pub missing_manifest: MissingManifestPolicy,
}

/// Resolves `config`, loaded from `project_dir`.
///
/// `sdk_env` is the value of the SDK environment variable, consulted only
/// when the configuration names no SDK.
pub fn resolve_project(
    config: &SpireConfig,
    project_dir: &Path,
    sdk_env: Option<&Path>,
) -> ResolvedProject {
    let input = anchor(project_dir, &config.paths.input);
    let output = anchor(project_dir, &config.paths.output);

    let extra_includes = config
        .paths
        .include
        .iter()
        .map(|dir| anchor(project_dir, dir))
        .collect();

    let section = &config.toolchain;
    let sdk = match &section.sdk {
        Some(sdk) => Some(anchor(project_dir, sdk)),
        None => sdk_env.map(Path::to_path_buf),
    };
    let mut toolchain = match &sdk {
        Some(sdk) => ToolchainConfig::from_sdk(sdk),
        None => ToolchainConfig::default(),
    };
    if let Some(slangc) = &section.slangc {
        toolchain.slangc = executable(project_dir, slangc);
    }
    if let Some(glslang) = &section.glslang {
        toolchain.glslang = executable(project_dir, glslang);
    }
    toolchain.profile = section.profile.clone();
    toolchain.target_env = section.target_env.clone();
    toolchain.debug_info = section.debug_info;
    toolchain.include_notice = section.include_notice.clone();
    toolchain.timeout = section.timeout_secs.map(Duration::from_secs);

    ResolvedProject {
        input,
        output,
        extra_includes,
        toolchain,
        jobs: config.build.jobs,
        missing_manifest: config.build.missing_manifest,
    }
}

impl ResolvedProject {
    /// The include search list: input root, its parent, then the extras.
    pub fn include_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.input.clone()];
        if let Some(parent) = self.input.parent().filter(|p| !p.as_os_str().is_empty()) {
            paths.push(parent.to_path_buf());
        }
        paths.extend(self.extra_includes.iter().cloned());
        paths
    }
}

fn anchor(project_dir: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_dir.join(path)
    }
}

/// A bare program name stays a `PATH` lookup; anything with a directory
/// part is anchored like other paths.
fn executable(project_dir: &Path, value: &str) -> PathBuf {
    if Path::new(value).components().count() > 1 {
        anchor(project_dir, value)
    } else {
        PathBuf::from(value)
    }
}
