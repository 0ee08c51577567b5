//! A single discovered input file.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::Serialize;
use spire_common::ShaderStage;

use crate::category::{classify, SourceCategory, SourceLanguage};

/// One classified file under the input root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceUnit {
    /// Path used to read the file.
    pub path: PathBuf,
    /// Path relative to the input root; mirrored under the output root.
    pub relative: PathBuf,
    /// How the file participates in the build.
    pub category: SourceCategory,
}

impl SourceUnit {
    /// Classifies `path`, which must lie below `root`.
    ///
    /// Returns `None` if the path is outside `root` or its extension is not
    /// recognized.
    pub fn from_path(root: &Path, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(root).ok()?.to_path_buf();
        let category = classify(&relative)?;
        Some(Self {
            path: path.to_path_buf(),
            relative,
            category,
        })
    }

    /// File name without its final extension (`lit` for `lit.slang`).
    pub fn stem(&self) -> &OsStr {
        self.relative.file_stem().unwrap_or_default()
    }

    /// Full file name (`blit.frag`).
    pub fn file_name(&self) -> &OsStr {
        self.relative.file_name().unwrap_or_default()
    }

    /// Directory of the file relative to the input root.
    pub fn relative_dir(&self) -> &Path {
        self.relative.parent().unwrap_or_else(|| Path::new(""))
    }

    /// The pipeline stage of a stage source, taken from its extension.
    pub fn stage(&self) -> Option<ShaderStage> {
        if self.category != SourceCategory::StageSource {
            return None;
        }
        ShaderStage::from_extension(self.relative.extension()?.to_str()?)
    }

    /// Language used to compile this unit.
    pub fn language(&self) -> Option<SourceLanguage> {
        self.category.language()
    }

    /// Returns `true` if this unit produces artifacts.
    pub fn is_build_target(&self) -> bool {
        self.category.is_build_target()
    }
}
