//! Rebuild decisions for individual artifacts.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::manifest::DependencyManifest;
use crate::version::{ContentVersion, ModifiedTime};

/// What to do when an existing artifact has no usable dependency manifest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingManifestPolicy {
    /// Rebuild once so the manifest gets populated.
    #[default]
    Rebuild,
    /// Trust the source timestamp alone. Include changes go unnoticed until
    /// the artifact is rebuilt for another reason.
    AssumeFresh,
}

/// The verdict for one artifact, with the reason it is stale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Staleness {
    /// The artifact is up to date.
    Fresh,
    /// The artifact has never been built.
    ArtifactMissing,
    /// The source is newer than the artifact.
    SourceChanged,
    /// A file's version could not be read.
    Unreadable {
        /// The file that could not be probed.
        path: PathBuf,
    },
    /// A recorded dependency no longer exists.
    DependencyMissing {
        /// The vanished dependency.
        path: PathBuf,
    },
    /// A recorded dependency is at least as new as the artifact.
    DependencyChanged {
        /// The changed dependency.
        path: PathBuf,
    },
    /// The manifest is absent or malformed and the policy asks for a rebuild.
    ManifestMissing,
}

impl Staleness {
    /// Returns `true` unless the artifact is fresh.
    pub fn is_stale(&self) -> bool {
        !matches!(self, Staleness::Fresh)
    }
}

impl fmt::Display for Staleness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Staleness::Fresh => f.write_str("up to date"),
            Staleness::ArtifactMissing => f.write_str("never built"),
            Staleness::SourceChanged => f.write_str("source changed"),
            Staleness::Unreadable { path } => write!(f, "cannot read {}", path.display()),
            Staleness::DependencyMissing { path } => {
                write!(f, "dependency {} no longer exists", path.display())
            }
            Staleness::DependencyChanged { path } => {
                write!(f, "dependency {} changed", path.display())
            }
            Staleness::ManifestMissing => f.write_str("no dependency manifest"),
        }
    }
}

/// Decides whether an artifact must be rebuilt.
///
/// Evaluation only reads the filesystem, so one evaluator can be shared
/// across threads and called any number of times.
#[derive(Debug, Clone)]
pub struct StalenessEvaluator<V = ModifiedTime> {
    version: V,
    policy: MissingManifestPolicy,
}

impl StalenessEvaluator<ModifiedTime> {
    /// Creates an evaluator that compares modification times.
    pub fn new(policy: MissingManifestPolicy) -> Self {
        Self::with_version(ModifiedTime, policy)
    }
}

impl Default for StalenessEvaluator<ModifiedTime> {
    fn default() -> Self {
        Self::new(MissingManifestPolicy::default())
    }
}

impl<V: ContentVersion> StalenessEvaluator<V> {
    /// Creates an evaluator with a custom version probe.
    pub fn with_version(version: V, policy: MissingManifestPolicy) -> Self {
        Self { version, policy }
    }

    /// The configured missing-manifest policy.
    pub fn policy(&self) -> MissingManifestPolicy {
        self.policy
    }

    /// Returns `true` if `artifact` must be rebuilt from `source`.
    pub fn needs_rebuild(&self, source: &Path, artifact: &Path) -> bool {
        self.evaluate(source, artifact).is_stale()
    }

    /// Evaluates `artifact` against `source` and its dependency manifest.
    pub fn evaluate(&self, source: &Path, artifact: &Path) -> Staleness {
        let verdict = self.evaluate_inner(source, artifact);
        debug!(artifact = %artifact.display(), verdict = %verdict, "evaluated");
        verdict
    }

    fn evaluate_inner(&self, source: &Path, artifact: &Path) -> Staleness {
        let artifact_stamp = match self.version.probe(artifact) {
            Ok(Some(stamp)) => stamp,
            Ok(None) => return Staleness::ArtifactMissing,
            Err(_) => return unreadable(artifact),
        };
        let source_stamp = match self.version.probe(source) {
            Ok(Some(stamp)) => stamp,
            _ => return unreadable(source),
        };
        if self.version.source_changed(source_stamp, artifact_stamp) {
            return Staleness::SourceChanged;
        }

        let manifest = match DependencyManifest::load(artifact) {
            Ok(Some(manifest)) => manifest,
            Ok(None) => return self.without_manifest(),
            Err(e) => {
                debug!("treating unreadable manifest as absent: {e}");
                return self.without_manifest();
            }
        };

        for dependency in manifest.entries() {
            match self.version.probe(dependency) {
                Ok(Some(stamp)) => {
                    if self.version.dependency_changed(stamp, artifact_stamp) {
                        return Staleness::DependencyChanged {
                            path: dependency.to_path_buf(),
                        };
                    }
                }
                Ok(None) => {
                    return Staleness::DependencyMissing {
                        path: dependency.to_path_buf(),
                    }
                }
                Err(_) => return unreadable(dependency),
            }
        }
        Staleness::Fresh
    }

    fn without_manifest(&self) -> Staleness {
        match self.policy {
            MissingManifestPolicy::Rebuild => Staleness::ManifestMissing,
            MissingManifestPolicy::AssumeFresh => Staleness::Fresh,
        }
    }
}

fn unreadable(path: &Path) -> Staleness {
    Staleness::Unreadable {
        path: path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use tempfile::TempDir;

    /// A source tree with a source, one include, and an artifact, all with
    /// controlled timestamps.
    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let f = Self { dir };
            f.write("lit.slang", 100);
            f.write("common.slangh", 100);
            f
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn write(&self, name: &str, mtime: i64) {
            let path = self.path(name);
            std::fs::write(&path, name).unwrap();
            self.touch(name, mtime);
        }

        fn touch(&self, name: &str, mtime: i64) {
            filetime::set_file_mtime(self.path(name), FileTime::from_unix_time(mtime, 0)).unwrap();
        }

        fn build(&self, mtime: i64, deps: &[&str]) {
            self.write("lit.spv", mtime);
            DependencyManifest::from_entries(deps.iter().map(|d| self.path(d)))
                .save(&self.path("lit.spv"))
                .unwrap();
        }

        fn evaluate(&self, evaluator: &StalenessEvaluator) -> Staleness {
            evaluator.evaluate(&self.path("lit.slang"), &self.path("lit.spv"))
        }
    }

    #[test]
    fn missing_artifact_is_stale() {
        let f = Fixture::new();
        let eval = StalenessEvaluator::default();
        assert_eq!(f.evaluate(&eval), Staleness::ArtifactMissing);
        assert!(eval.needs_rebuild(&f.path("lit.slang"), &f.path("lit.spv")));
    }

    #[test]
    fn missing_artifact_is_stale_even_without_source() {
        let f = Fixture::new();
        let eval = StalenessEvaluator::default();
        assert!(eval.needs_rebuild(&f.path("gone.slang"), &f.path("gone.spv")));
    }

    #[test]
    fn fresh_artifact_stays_fresh() {
        let f = Fixture::new();
        f.build(200, &["common.slangh"]);
        let eval = StalenessEvaluator::default();
        for _ in 0..3 {
            assert_eq!(f.evaluate(&eval), Staleness::Fresh);
        }
    }

    #[test]
    fn newer_source_is_stale() {
        let f = Fixture::new();
        f.build(200, &["common.slangh"]);
        f.touch("lit.slang", 300);
        assert_eq!(
            f.evaluate(&StalenessEvaluator::default()),
            Staleness::SourceChanged
        );
    }

    #[test]
    fn source_with_same_timestamp_is_fresh() {
        let f = Fixture::new();
        f.build(200, &[]);
        f.touch("lit.slang", 200);
        assert_eq!(f.evaluate(&StalenessEvaluator::default()), Staleness::Fresh);
    }

    #[test]
    fn touched_dependency_is_stale() {
        let f = Fixture::new();
        f.build(200, &["common.slangh"]);
        f.touch("common.slangh", 300);
        assert_eq!(
            f.evaluate(&StalenessEvaluator::default()),
            Staleness::DependencyChanged {
                path: f.path("common.slangh")
            }
        );
    }

    #[test]
    fn dependency_tie_is_stale() {
        let f = Fixture::new();
        f.build(200, &["common.slangh"]);
        f.touch("common.slangh", 200);
        assert!(f.evaluate(&StalenessEvaluator::default()).is_stale());
    }

    #[test]
    fn vanished_dependency_is_stale() {
        let f = Fixture::new();
        f.build(200, &["common.slangh"]);
        std::fs::remove_file(f.path("common.slangh")).unwrap();
        assert_eq!(
            f.evaluate(&StalenessEvaluator::default()),
            Staleness::DependencyMissing {
                path: f.path("common.slangh")
            }
        );
    }

    #[test]
    fn rebuild_restores_freshness() {
        let f = Fixture::new();
        f.build(200, &["common.slangh"]);
        f.touch("common.slangh", 300);
        let eval = StalenessEvaluator::default();
        assert!(f.evaluate(&eval).is_stale());

        f.build(400, &["common.slangh"]);
        assert_eq!(f.evaluate(&eval), Staleness::Fresh);
    }

    #[test]
    fn missing_manifest_rebuild_policy() {
        let f = Fixture::new();
        f.write("lit.spv", 200);
        let eval = StalenessEvaluator::new(MissingManifestPolicy::Rebuild);
        assert_eq!(f.evaluate(&eval), Staleness::ManifestMissing);
    }

    #[test]
    fn missing_manifest_assume_fresh_policy() {
        let f = Fixture::new();
        f.write("lit.spv", 200);
        f.touch("common.slangh", 300);
        let eval = StalenessEvaluator::new(MissingManifestPolicy::AssumeFresh);
        // Without a manifest the include change is invisible.
        assert_eq!(f.evaluate(&eval), Staleness::Fresh);
    }

    #[test]
    fn malformed_manifest_counts_as_absent() {
        let f = Fixture::new();
        f.write("lit.spv", 200);
        std::fs::write(f.path("lit.deps"), [0xff, 0xfe]).unwrap();

        let rebuild = StalenessEvaluator::new(MissingManifestPolicy::Rebuild);
        assert_eq!(f.evaluate(&rebuild), Staleness::ManifestMissing);

        let assume = StalenessEvaluator::new(MissingManifestPolicy::AssumeFresh);
        assert_eq!(f.evaluate(&assume), Staleness::Fresh);
    }

    #[test]
    fn empty_manifest_is_fresh() {
        let f = Fixture::new();
        f.build(200, &[]);
        assert_eq!(f.evaluate(&StalenessEvaluator::default()), Staleness::Fresh);
    }

    #[test]
    fn display_reasons() {
        assert_eq!(Staleness::Fresh.to_string(), "up to date");
        assert_eq!(Staleness::ArtifactMissing.to_string(), "never built");
        let changed = Staleness::DependencyChanged {
            path: PathBuf::from("common.slangh"),
        };
        assert_eq!(changed.to_string(), "dependency common.slangh changed");
    }

    #[test]
    fn serializes_with_reason_tag() {
        let json = serde_json::to_string(&Staleness::SourceChanged).unwrap();
        assert_eq!(json, r#"{"reason":"source_changed"}"#);
    }

    #[test]
    fn policy_deserializes_kebab_case() {
        let policy: MissingManifestPolicy = serde_json::from_str("\"assume-fresh\"").unwrap();
        assert_eq!(policy, MissingManifestPolicy::AssumeFresh);
    }
}
