//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::SpireConfig;
use std::path::Path;

/// File name of the project configuration.
pub const CONFIG_FILE: &str = "spire.toml";

/// Loads and validates a `spire.toml` configuration from a project directory.
///
/// Reads `<project_dir>/spire.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<SpireConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `spire.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<SpireConfig, ConfigError> {
    let config: SpireConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and configuration values are consistent.
fn validate_config(config: &SpireConfig) -> Result<(), ConfigError> {
    if config.paths.input.is_empty() {
        return Err(ConfigError::MissingField("paths.input".to_string()));
    }
    if config.paths.output.is_empty() {
        return Err(ConfigError::MissingField("paths.output".to_string()));
    }
    if config.paths.input == config.paths.output {
        return Err(ConfigError::ValidationError(
            "paths.input and paths.output must differ".to_string(),
        ));
    }
    if config.toolchain.include_notice.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "toolchain.include_notice must not be empty".to_string(),
        ));
    }
    if config.toolchain.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "toolchain.timeout_secs must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spire_cache::MissingManifestPolicy;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[paths]
input = "shaders"
output = "build/shaders"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.paths.input, "shaders");
        assert_eq!(config.paths.output, "build/shaders");
        assert!(config.paths.include.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[paths]
input = "shaders"
output = "build/shaders"
include = ["extern", "third_party/ffx"]

[toolchain]
sdk = "/opt/vulkan"
slangc = "tools/slangc"
profile = "spirv_1_6"
target_env = "vulkan1.2"
debug_info = false
include_notice = "dependency"
timeout_secs = 120

[build]
jobs = 4
missing_manifest = "assume-fresh"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.paths.include, vec!["extern", "third_party/ffx"]);
        assert_eq!(config.toolchain.sdk.as_deref(), Some("/opt/vulkan"));
        assert_eq!(config.toolchain.slangc.as_deref(), Some("tools/slangc"));
        assert_eq!(config.toolchain.glslang, None);
        assert_eq!(config.toolchain.profile, "spirv_1_6");
        assert_eq!(config.toolchain.target_env, "vulkan1.2");
        assert!(!config.toolchain.debug_info);
        assert_eq!(config.toolchain.include_notice, "dependency");
        assert_eq!(config.toolchain.timeout_secs, Some(120));
        assert_eq!(config.build.jobs, 4);
        assert_eq!(
            config.build.missing_manifest,
            MissingManifestPolicy::AssumeFresh
        );
    }

    #[test]
    fn default_values() {
        let toml = r#"
[paths]
input = "shaders"
output = "out"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.toolchain.profile, "glsl_460");
        assert_eq!(config.toolchain.target_env, "vulkan1.3");
        assert!(config.toolchain.debug_info);
        assert_eq!(config.toolchain.include_notice, "include");
        assert_eq!(config.toolchain.timeout_secs, None);
        assert_eq!(config.build.jobs, 0);
        assert_eq!(config.build.missing_manifest, MissingManifestPolicy::Rebuild);
    }

    #[test]
    fn partial_toolchain_table_keeps_defaults() {
        let toml = r#"
[paths]
input = "shaders"
output = "out"

[toolchain]
debug_info = false
"#;
        let config = load_config_from_str(toml).unwrap();
        assert!(!config.toolchain.debug_info);
        assert_eq!(config.toolchain.profile, "glsl_460");
    }

    #[test]
    fn include_accepts_single_string() {
        let toml = r#"
[paths]
input = "shaders"
output = "out"
include = "extern"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.paths.include, vec!["extern"]);
    }

    #[test]
    fn missing_input_errors() {
        let toml = r#"
[paths]
input = ""
output = "out"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(f) if f == "paths.input"));
    }

    #[test]
    fn missing_paths_table_errors() {
        let err = load_config_from_str("[build]\njobs = 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn same_input_and_output_errors() {
        let toml = r#"
[paths]
input = "shaders"
output = "shaders"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn zero_timeout_errors() {
        let toml = r#"
[paths]
input = "shaders"
output = "out"

[toolchain]
timeout_secs = 0
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn unknown_policy_errors() {
        let toml = r#"
[paths]
input = "shaders"
output = "out"

[build]
missing_manifest = "sometimes"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let toml = "this is not valid toml {{{}}}";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[paths]\ninput = \"shaders\"\noutput = \"out\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.paths.input, "shaders");
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
