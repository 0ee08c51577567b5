//! File version probing used by staleness checks.

use std::fmt;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Observes the version of a file and decides when one version supersedes another.
///
/// The evaluator only talks to this trait, so the timestamp policy can be
/// replaced (for example by content hashes) without touching callers.
pub trait ContentVersion: Send + Sync {
    /// A comparable version stamp.
    type Stamp: Copy + Ord + fmt::Debug;

    /// Returns the stamp of `path`, or `None` if it does not exist.
    fn probe(&self, path: &Path) -> io::Result<Option<Self::Stamp>>;

    /// Returns `true` if a source at `source` invalidates an artifact at `artifact`.
    fn source_changed(&self, source: Self::Stamp, artifact: Self::Stamp) -> bool {
        source > artifact
    }

    /// Returns `true` if a dependency at `dependency` invalidates an artifact at `artifact`.
    ///
    /// Equal stamps count as changed: timestamps cannot order writes that
    /// land in the same tick.
    fn dependency_changed(&self, dependency: Self::Stamp, artifact: Self::Stamp) -> bool {
        dependency >= artifact
    }
}

/// Versions files by their last-modified time.
#[derive(Clone, Copy, Debug, Default)]
pub struct ModifiedTime;

impl ContentVersion for ModifiedTime {
    type Stamp = SystemTime;

    fn probe(&self, path: &Path) -> io::Result<Option<SystemTime>> {
        match std::fs::metadata(path) {
            Ok(meta) => meta.modified().map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use std::time::Duration;

    #[test]
    fn probe_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ModifiedTime.probe(&dir.path().join("nope")).unwrap().is_none());
    }

    #[test]
    fn probe_reads_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.glsl");
        std::fs::write(&path, "x").unwrap();
        filetime::set_file_mtime(&path, FileTime::from_unix_time(1_000_000, 0)).unwrap();

        let stamp = ModifiedTime.probe(&path).unwrap().unwrap();
        assert_eq!(stamp, SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000));
    }

    #[test]
    fn source_comparison_is_strict() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
        let later = t + Duration::from_secs(1);
        assert!(!ModifiedTime.source_changed(t, t));
        assert!(ModifiedTime.source_changed(later, t));
        assert!(!ModifiedTime.source_changed(t, later));
    }

    #[test]
    fn dependency_comparison_includes_ties() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
        let earlier = t - Duration::from_secs(1);
        assert!(ModifiedTime.dependency_changed(t, t));
        assert!(!ModifiedTime.dependency_changed(earlier, t));
    }
}
