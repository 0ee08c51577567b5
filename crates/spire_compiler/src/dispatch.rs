//! Compilation dispatcher: compile one variant, publish the artifact, record
//! its dependencies.

use std::path::{Path, PathBuf};

use spire_cache::DependencyManifest;
use spire_common::ARTIFACT_EXTENSION;
use spire_source::SourceLanguage;
use spire_variants::BuildVariant;
use tracing::{debug, warn};

use crate::error::{CompileError, DiscoveryError};
use crate::invocation::{CompileRequest, Compiler};

/// The outcome of a successful dispatch.
#[derive(Debug)]
pub struct Dispatched {
    /// The artifact that was (re)built.
    pub artifact: PathBuf,
    /// The manifest written for it, if dependency discovery succeeded.
    pub manifest: Option<DependencyManifest>,
    /// Why no manifest was written.
    pub include_error: Option<DiscoveryError>,
    /// Compiler output of the successful compile, usually warnings.
    pub diagnostics: String,
}

/// Runs compile jobs against a [`Compiler`] with a fixed include search list.
#[derive(Debug)]
pub struct Dispatcher<C> {
    compiler: C,
    include_paths: Vec<PathBuf>,
}

impl<C: Compiler> Dispatcher<C> {
    /// Creates a dispatcher passing `include_paths` to every invocation.
    pub fn new(compiler: C, include_paths: Vec<PathBuf>) -> Self {
        Self {
            compiler,
            include_paths,
        }
    }

    /// The underlying compiler.
    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    /// The include search list, in priority order.
    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    /// Compiles `source` as `variant` into `artifact`, then rewrites its
    /// dependency manifest.
    ///
    /// The compiler writes to a temporary file in the artifact's directory,
    /// which replaces the artifact only after a confirmed success. On any
    /// error the previous artifact and manifest are left exactly as they
    /// were. The artifact directory must already exist.
    pub fn dispatch(
        &self,
        source: &Path,
        language: SourceLanguage,
        artifact: &Path,
        variant: &BuildVariant,
    ) -> Result<Dispatched, CompileError> {
        let dir = parent_dir(artifact);
        let staging = tempfile::Builder::new()
            .prefix(".spire-")
            .suffix(&format!(".{ARTIFACT_EXTENSION}"))
            .tempfile_in(dir)
            .map_err(|source| CompileError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .into_temp_path();

        let request = CompileRequest {
            source,
            output: &staging,
            language,
            variant,
            include_paths: &self.include_paths,
        };
        let output = self.compiler.compile(&request)?;
        if !output.success {
            return Err(CompileError::Failed {
                path: source.to_path_buf(),
                diagnostics: output.combined(),
            });
        }
        // The staging file exists from the start, so an empty one means the
        // compiler never wrote it.
        let written = std::fs::metadata(&staging)
            .map(|meta| meta.len() > 0)
            .unwrap_or(false);
        if !written {
            return Err(CompileError::MissingOutput {
                path: artifact.to_path_buf(),
            });
        }
        staging
            .persist(artifact)
            .map_err(|e| CompileError::Io {
                path: artifact.to_path_buf(),
                source: e.error,
            })?;
        debug!(artifact = %artifact.display(), variant = %variant.name, "artifact published");

        let request = CompileRequest {
            source,
            output: artifact,
            language,
            variant,
            include_paths: &self.include_paths,
        };
        let (manifest, include_error) = match self.record_dependencies(&request) {
            Ok(manifest) => (Some(manifest), None),
            Err(e) => {
                warn!(artifact = %artifact.display(), "dependencies not recorded: {e}");
                if let Err(rm) = DependencyManifest::remove(artifact) {
                    warn!("cannot remove stale manifest: {rm}");
                }
                (None, Some(e))
            }
        };

        Ok(Dispatched {
            artifact: artifact.to_path_buf(),
            manifest,
            include_error,
            diagnostics: output.combined(),
        })
    }

    fn record_dependencies(
        &self,
        request: &CompileRequest<'_>,
    ) -> Result<DependencyManifest, DiscoveryError> {
        let report = self
            .compiler
            .report_includes(request)
            .map_err(|e| DiscoveryError::ReportFailed {
                diagnostics: e.to_string(),
            })?;
        if !report.success {
            return Err(DiscoveryError::ReportFailed {
                diagnostics: report.combined(),
            });
        }
        let reported = self.compiler.discovery(request.language).discover(&report)?;

        let primary = identity(request.source);
        let mut manifest = DependencyManifest::new();
        for path in reported {
            let resolved = self.locate(request.source, &path);
            if identity(&resolved) != primary {
                manifest.insert(resolved);
            }
        }
        manifest.save(request.output)?;
        Ok(manifest)
    }

    /// Resolves a reported include the way the preprocessor searches:
    /// the including file's directory first, then the include list.
    fn locate(&self, source: &Path, reported: &Path) -> PathBuf {
        if reported.is_absolute() {
            return reported.to_path_buf();
        }
        let source_dir = source.parent().unwrap_or_else(|| Path::new(""));
        let found = std::iter::once(source_dir)
            .chain(self.include_paths.iter().map(PathBuf::as_path))
            .map(|dir| dir.join(reported))
            .find(|candidate| candidate.exists())
            .unwrap_or_else(|| source_dir.join(reported));
        if found.is_absolute() {
            return found;
        }
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(found),
            Err(_) => found,
        }
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// A comparable identity for a path: canonical if it exists.
fn identity(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
