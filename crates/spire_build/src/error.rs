//! Error types for whole-build failures.

use std::path::PathBuf;

/// Errors that prevent a build from starting.
///
/// Problems with individual units are recorded in the
/// [`BuildReport`](crate::BuildReport) instead.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The input root is missing or cannot be listed.
    #[error("cannot read input directory {path}: {source}")]
    InputRoot {
        /// The configured input root.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The worker pool could not be created.
    #[error("failed to start build workers: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
