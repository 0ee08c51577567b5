//! Per-artifact dependency manifests.
//!
//! A manifest lives next to its artifact (`lit.spv` → `lit.deps`) and lists,
//! one path per line, every file the compiler read while producing the
//! artifact other than the primary source. It is rewritten wholesale after
//! each successful build and never merged.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use spire_common::MANIFEST_EXTENSION;

use crate::error::CacheError;

/// The set of files an artifact was built from, besides its source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyManifest {
    entries: BTreeSet<PathBuf>,
}

/// Returns the manifest path belonging to `artifact`.
pub fn manifest_path(artifact: &Path) -> PathBuf {
    artifact.with_extension(MANIFEST_EXTENSION)
}

impl DependencyManifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a manifest from dependency paths, dropping duplicates.
    pub fn from_entries(entries: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Adds a dependency. Returns `false` if it was already listed.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.entries.insert(path)
    }

    /// Returns `true` if `path` is listed.
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains(path)
    }

    /// Iterates the listed dependencies.
    pub fn entries(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(PathBuf::as_path)
    }

    /// Number of listed dependencies.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no dependencies are listed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses the on-disk text form: one path per line, blank lines ignored.
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut entries = BTreeSet::new();
        for (index, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            if line.contains('\0') {
                return Err(format!("NUL byte on line {}", index + 1));
            }
            entries.insert(PathBuf::from(line));
        }
        Ok(Self { entries })
    }

    /// Renders the on-disk text form.
    ///
    /// Fails for paths that are not UTF-8 or contain a line break, since the
    /// format has no escaping.
    pub fn to_text(&self) -> Result<String, CacheError> {
        let mut text = String::new();
        for path in &self.entries {
            let line = path
                .to_str()
                .filter(|s| !s.is_empty() && !s.contains(&['\n', '\r', '\0'][..]))
                .ok_or_else(|| CacheError::UnrepresentablePath { path: path.clone() })?;
            text.push_str(line);
            text.push('\n');
        }
        Ok(text)
    }

    /// Loads the manifest of `artifact`.
    ///
    /// Returns `Ok(None)` if no manifest exists.
    pub fn load(artifact: &Path) -> Result<Option<Self>, CacheError> {
        let path = manifest_path(artifact);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CacheError::Io { path, source }),
        };
        let text = String::from_utf8(bytes).map_err(|_| CacheError::MalformedManifest {
            path: path.clone(),
            reason: "invalid UTF-8".to_string(),
        })?;
        Self::parse(&text)
            .map(Some)
            .map_err(|reason| CacheError::MalformedManifest { path, reason })
    }

    /// Writes this manifest for `artifact`, replacing any previous one.
    ///
    /// The text is written to a temporary file in the same directory and
    /// renamed into place, so readers never observe a partial manifest.
    pub fn save(&self, artifact: &Path) -> Result<(), CacheError> {
        let path = manifest_path(artifact);
        let text = self.to_text()?;
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let io_err = |source: std::io::Error| CacheError::Io {
            path: path.clone(),
            source,
        };

        let mut tmp = tempfile::Builder::new()
            .prefix(".deps-")
            .tempfile_in(dir)
            .map_err(io_err)?;
        tmp.write_all(text.as_bytes()).map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    /// Deletes the manifest of `artifact`. Returns `false` if there was none.
    pub fn remove(artifact: &Path) -> Result<bool, CacheError> {
        let path = manifest_path(artifact);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }
}
