//! Error types for compiler invocation and dependency discovery.

use std::path::PathBuf;

use spire_cache::CacheError;

/// Errors that abort a single compile job.
///
/// None of these touch the previously built artifact: compilers write to a
/// temporary file that only replaces the artifact on success.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The compiler ran and reported failure.
    #[error("failed to compile {path}:\n{diagnostics}")]
    Failed {
        /// The source that failed to compile.
        path: PathBuf,
        /// Compiler output explaining the failure.
        diagnostics: String,
    },

    /// The compiler executable could not be started.
    #[error("cannot run {program}: {source}")]
    Spawn {
        /// The executable that failed to start.
        program: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The compiler did not finish in time and was killed.
    #[error("{program} timed out after {seconds}s")]
    TimedOut {
        /// The executable that was killed.
        program: PathBuf,
        /// The configured limit.
        seconds: u64,
    },

    /// The compiler reported success but produced no output file.
    #[error("compiler reported success but wrote no output to {path}")]
    MissingOutput {
        /// The expected output path.
        path: PathBuf,
    },

    /// A filesystem operation around the compile failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors while recovering the include set of a freshly built artifact.
///
/// These never fail a build: the artifact stays, and its manifest is
/// dropped so the next run rebuilds it.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// A line of the include report could not be understood.
    #[error("malformed include report at line {line}: {reason}")]
    Malformed {
        /// 1-based line number in the report.
        line: usize,
        /// Description of the problem.
        reason: String,
    },

    /// The include report invocation itself failed.
    #[error("include report failed: {diagnostics}")]
    ReportFailed {
        /// Compiler output or the invocation error.
        diagnostics: String,
    },

    /// The discovered set could not be written as a manifest.
    #[error("cannot record dependencies: {0}")]
    Record(#[from] CacheError),
}
