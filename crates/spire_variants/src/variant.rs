//! A single concrete compilation task.

use std::ffi::{OsStr, OsString};

use serde::Serialize;
use spire_common::{DefineSet, ShaderStage, ARTIFACT_EXTENSION, DEFAULT_ENTRY_POINT};

use crate::family::VariantFamily;

/// Label of the implicit variant of a non-material source.
pub const DEFAULT_VARIANT: &str = "default";

/// One (defines, entry point, output suffix) combination of a source file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BuildVariant {
    /// Human-readable label: `default` or the family name.
    pub name: String,
    /// Macros defined while compiling.
    pub defines: DefineSet,
    /// Entry point symbol compiled from the source.
    pub entry_point: String,
    /// Stage the entry point targets, when known.
    pub stage: Option<ShaderStage>,
    /// Suffix appended to the artifact base name, including the binary extension.
    pub output_suffix: String,
}

impl BuildVariant {
    /// The implicit variant of a composable or stage source.
    ///
    /// A stage source keeps its stage marker in the artifact name
    /// (`blit.frag` becomes `blit.frag.spv`).
    pub fn implicit(stage: Option<ShaderStage>) -> Self {
        let output_suffix = match stage {
            Some(stage) => format!("{stage}.{ARTIFACT_EXTENSION}"),
            None => ARTIFACT_EXTENSION.to_string(),
        };
        Self {
            name: DEFAULT_VARIANT.to_string(),
            defines: DefineSet::new(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            stage,
            output_suffix,
        }
    }

    /// The variant of `family` compiled for `stage`.
    pub fn for_family(family: VariantFamily, stage: ShaderStage) -> Self {
        let defines = DefineSet::from_flags(family.defines().iter().copied())
            .expect("catalog defines are valid identifiers");
        Self {
            name: family.name().to_string(),
            defines,
            entry_point: family.entry_point(stage).to_string(),
            stage: Some(stage),
            output_suffix: format!("{stage}.{ARTIFACT_EXTENSION}"),
        }
    }

    /// Artifact file name for a source whose base name is `base`.
    ///
    /// The base is kept byte for byte, so distinct sources never share a name.
    pub fn artifact_file_name(&self, base: impl AsRef<OsStr>) -> OsString {
        let mut name = base.as_ref().to_os_string();
        name.push(".");
        name.push(&self.output_suffix);
        name
    }

    /// Returns `true` for the implicit variant.
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_VARIANT
    }
}
