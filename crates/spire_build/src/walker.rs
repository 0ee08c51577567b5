//! Discovery of source units under the input root.

use std::path::Path;

use spire_source::SourceUnit;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::BuildError;

/// Recursively collects every recognized file below `root`.
///
/// Units are returned in file-name order. Unrecognized files are skipped,
/// as is `exclude` (typically an output root nested inside the input root).
/// Unreadable subdirectories are logged and skipped; only an unreadable
/// `root` is an error.
pub fn discover(root: &Path, exclude: Option<&Path>) -> Result<Vec<SourceUnit>, BuildError> {
    std::fs::read_dir(root).map_err(|source| BuildError::InputRoot {
        path: root.to_path_buf(),
        source,
    })?;

    let mut units = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| exclude.map_or(true, |ex| entry.path() != ex));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match SourceUnit::from_path(root, entry.path()) {
            Some(unit) => units.push(unit),
            None => debug!(path = %entry.path().display(), "ignoring unrecognized file"),
        }
    }
    Ok(units)
}
