//! Incremental rebuild state derived from the filesystem.
//!
//! There is no build database: an artifact is fresh when it is no older than
//! its source and newer than every file listed in its sidecar
//! [`DependencyManifest`]. The comparison itself goes through the
//! [`ContentVersion`] abstraction so the timestamp policy can be swapped.

#![warn(missing_docs)]

pub mod error;
pub mod manifest;
pub mod staleness;
pub mod version;

pub use error::CacheError;
pub use manifest::{manifest_path, DependencyManifest};
pub use staleness::{MissingManifestPolicy, Staleness, StalenessEvaluator};
pub use version::{ContentVersion, ModifiedTime};
