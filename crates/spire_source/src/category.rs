//! Classification of input files by extension and location.

use std::path::{Component, Path};

use serde::Serialize;
use spire_common::{ShaderStage, MATERIALS_DIR};

/// Extensions of files that are only ever pulled in through `#include`/`import`.
const INCLUDE_EXTENSIONS: &[&str] = &["glsl", "slangh", "h", "hpp", "hlsli", "inc"];

/// Extension of composable Slang programs.
const SLANG_EXTENSION: &str = "slang";

/// How a source file participates in the build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceCategory {
    /// A single-file Slang program with named entry points.
    ComposableSource,
    /// A GLSL file holding exactly one pipeline stage.
    StageSource,
    /// A header-like fragment that is never built on its own.
    IncludeOnly,
    /// A material program expanded into the fixed variant catalog.
    CompositeSource,
}

/// Source language, which selects the compiler backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    /// Slang, compiled by `slangc`.
    Slang,
    /// GLSL, compiled by `glslangValidator`.
    Glsl,
}

impl SourceCategory {
    /// Returns `true` if files of this category produce artifacts.
    pub fn is_build_target(self) -> bool {
        !matches!(self, SourceCategory::IncludeOnly)
    }

    /// The language used to compile this category, or `None` for include-only files.
    pub fn language(self) -> Option<SourceLanguage> {
        match self {
            SourceCategory::ComposableSource | SourceCategory::CompositeSource => {
                Some(SourceLanguage::Slang)
            }
            SourceCategory::StageSource => Some(SourceLanguage::Glsl),
            SourceCategory::IncludeOnly => None,
        }
    }
}

/// Classifies a file from its path relative to the input root.
///
/// Returns `None` for files the pipeline does not recognize at all.
pub fn classify(relative: &Path) -> Option<SourceCategory> {
    let ext = relative.extension()?.to_str()?;
    if ext == SLANG_EXTENSION {
        return Some(if in_materials_dir(relative) {
            SourceCategory::CompositeSource
        } else {
            SourceCategory::ComposableSource
        });
    }
    if ShaderStage::from_extension(ext).is_some() {
        return Some(SourceCategory::StageSource);
    }
    if INCLUDE_EXTENSIONS.contains(&ext) {
        return Some(SourceCategory::IncludeOnly);
    }
    None
}

/// Returns `true` if any directory above the file is named [`MATERIALS_DIR`].
fn in_materials_dir(relative: &Path) -> bool {
    relative
        .parent()
        .map(|dir| {
            dir.components()
                .any(|c| matches!(c, Component::Normal(name) if name == MATERIALS_DIR))
        })
        .unwrap_or(false)
}
