//! Error types for manifest operations.

use std::path::PathBuf;

/// Errors that can occur while reading or writing dependency manifests.
///
/// Staleness evaluation never surfaces these: a manifest that cannot be
/// read is treated as absent, which biases the build towards rebuilding.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing a manifest.
    #[error("manifest I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The manifest exists but is not a valid list of paths.
    #[error("malformed dependency manifest {path}: {reason}")]
    MalformedManifest {
        /// The manifest file path.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// A dependency path cannot be written as a single UTF-8 line.
    #[error("dependency path cannot be stored in a manifest: {path:?}")]
    UnrepresentablePath {
        /// The offending dependency path.
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = CacheError::Io {
            path: PathBuf::from("/out/lit.deps"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("manifest I/O error"));
        assert!(msg.contains("lit.deps"));
    }

    #[test]
    fn malformed_display() {
        let err = CacheError::MalformedManifest {
            path: PathBuf::from("lit.deps"),
            reason: "invalid UTF-8".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("malformed dependency manifest"));
        assert!(msg.contains("invalid UTF-8"));
    }

    #[test]
    fn unrepresentable_display() {
        let err = CacheError::UnrepresentablePath {
            path: PathBuf::from("bad\nname.glsl"),
        };
        assert!(err.to_string().contains("cannot be stored"));
    }
}
