//! Configuration types deserialized from `spire.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use spire_cache::MissingManifestPolicy;

/// The top-level configuration parsed from `spire.toml`.
#[derive(Debug, Deserialize)]
pub struct SpireConfig {
    /// Source, output and include locations.
    pub paths: PathsConfig,
    /// Compiler executables and their options.
    #[serde(default)]
    pub toolchain: ToolchainSection,
    /// Scheduling and staleness settings.
    #[serde(default)]
    pub build: BuildConfig,
}

/// Locations, relative to the directory holding `spire.toml` unless absolute.
#[derive(Debug, Deserialize)]
pub struct PathsConfig {
    /// Root of the shader source tree.
    pub input: String,
    /// Root of the mirrored artifact tree.
    pub output: String,
    /// Extra include directories searched after the input root and its parent.
    ///
    /// Accepts either a single string or a list of strings.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub include: Vec<String>,
}

/// The `[toolchain]` table.
#[derive(Debug, Deserialize)]
pub struct ToolchainSection {
    /// Vulkan SDK root; both compilers are looked up in its `bin` directory.
    pub sdk: Option<String>,
    /// Explicit `slangc` executable, overriding the SDK.
    pub slangc: Option<String>,
    /// Explicit `glslangValidator` executable, overriding the SDK.
    pub glslang: Option<String>,
    /// Slang profile.
    #[serde(default = "default_profile")]
    pub profile: String,
    /// glslang target environment.
    #[serde(default = "default_target_env")]
    pub target_env: String,
    /// Emit debug information.
    #[serde(default = "default_true")]
    pub debug_info: bool,
    /// Marker preceding each path in `slangc -output-includes` output.
    #[serde(default = "default_include_notice")]
    pub include_notice: String,
    /// Kill a compiler invocation after this many seconds.
    pub timeout_secs: Option<u64>,
}

impl Default for ToolchainSection {
    fn default() -> Self {
        Self {
            sdk: None,
            slangc: None,
            glslang: None,
            profile: default_profile(),
            target_env: default_target_env(),
            debug_info: true,
            include_notice: default_include_notice(),
            timeout_secs: None,
        }
    }
}

fn default_profile() -> String {
    "glsl_460".to_string()
}

fn default_target_env() -> String {
    "vulkan1.3".to_string()
}

fn default_include_notice() -> String {
    "include".to_string()
}

fn default_true() -> bool {
    true
}

/// The `[build]` table.
#[derive(Debug, Default, Deserialize)]
pub struct BuildConfig {
    /// Maximum concurrent compiler invocations; 0 uses every available core.
    #[serde(default)]
    pub jobs: usize,
    /// What to do with built artifacts that have no dependency manifest.
    #[serde(default)]
    pub missing_manifest: MissingManifestPolicy,
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows TOML config to accept both `include = "extern"` (string) and
/// `include = ["extern", "third_party"]` (array of strings).
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
