//! Resolved settings for the external compiler executables.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the Vulkan SDK installation.
pub const SDK_ENV_VAR: &str = "VULKAN_SDK";

/// Everything needed to invoke the shader compilers.
///
/// Resolved once by the caller and handed to [`ProcessCompiler`](crate::ProcessCompiler);
/// nothing here is read from the environment implicitly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolchainConfig {
    /// The `slangc` executable.
    pub slangc: PathBuf,
    /// The `glslangValidator` executable.
    pub glslang: PathBuf,
    /// Slang profile, e.g. `glsl_460`.
    pub profile: String,
    /// glslang target environment, e.g. `vulkan1.3`.
    pub target_env: String,
    /// Emit debug information into artifacts.
    pub debug_info: bool,
    /// Marker word preceding each path in `slangc -output-includes`.
    pub include_notice: String,
    /// Upper bound on a single compiler invocation.
    pub timeout: Option<Duration>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            slangc: PathBuf::from(executable("slangc")),
            glslang: PathBuf::from(executable("glslangValidator")),
            profile: "glsl_460".to_string(),
            target_env: "vulkan1.3".to_string(),
            debug_info: true,
            include_notice: "include".to_string(),
            timeout: None,
        }
    }
}

impl ToolchainConfig {
    /// Defaults with both executables taken from `<sdk>/bin`.
    pub fn from_sdk(sdk: &Path) -> Self {
        let bin = sdk.join("bin");
        Self {
            slangc: bin.join(executable("slangc")),
            glslang: bin.join(executable("glslangValidator")),
            ..Self::default()
        }
    }
}

fn executable(name: &str) -> String {
    format!("{name}{}", std::env::consts::EXE_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_path_lookup() {
        let tc = ToolchainConfig::default();
        assert!(tc.slangc.starts_with("slangc"));
        assert_eq!(tc.slangc.parent(), Some(Path::new("")));
        assert_eq!(tc.profile, "glsl_460");
        assert_eq!(tc.target_env, "vulkan1.3");
        assert!(tc.debug_info);
        assert_eq!(tc.timeout, None);
    }

    #[test]
    fn from_sdk_uses_bin_dir() {
        let tc = ToolchainConfig::from_sdk(Path::new("/opt/vulkan"));
        assert!(tc.slangc.starts_with("/opt/vulkan/bin"));
        assert!(tc.glslang.starts_with("/opt/vulkan/bin"));
        assert_eq!(tc.include_notice, "include");
    }
}
