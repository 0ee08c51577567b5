//! The compiler capability used by the dispatcher.

use std::path::{Path, PathBuf};

use spire_common::{DefineSet, ShaderStage};
use spire_source::SourceLanguage;
use spire_variants::BuildVariant;

use crate::discovery::DependencyDiscovery;
use crate::error::CompileError;

/// One compiler invocation.
#[derive(Clone, Copy, Debug)]
pub struct CompileRequest<'a> {
    /// The primary source file.
    pub source: &'a Path,
    /// Where the compiler must write its output.
    pub output: &'a Path,
    /// Source language, selecting the backend.
    pub language: SourceLanguage,
    /// Defines, entry point and stage.
    pub variant: &'a BuildVariant,
    /// Include search directories, in priority order.
    pub include_paths: &'a [PathBuf],
}

impl CompileRequest<'_> {
    /// Macros to define.
    pub fn defines(&self) -> &DefineSet {
        &self.variant.defines
    }

    /// Entry point symbol.
    pub fn entry_point(&self) -> &str {
        &self.variant.entry_point
    }

    /// Target stage, if the variant names one.
    pub fn stage(&self) -> Option<ShaderStage> {
        self.variant.stage
    }
}

/// What a compiler invocation printed and whether it succeeded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// `true` if the tool exited successfully.
    pub success: bool,
    /// Standard output.
    pub stdout: String,
    /// Diagnostic output (standard error).
    pub diagnostics: String,
}

impl ToolOutput {
    /// A successful invocation with the given standard output.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            diagnostics: String::new(),
        }
    }

    /// A failed invocation with the given diagnostics.
    pub fn failed(diagnostics: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            diagnostics: diagnostics.into(),
        }
    }

    /// Both streams, diagnostics first, for error reporting.
    pub fn combined(&self) -> String {
        match (self.diagnostics.trim(), self.stdout.trim()) {
            ("", out) => out.to_string(),
            (diag, "") => diag.to_string(),
            (diag, out) => format!("{diag}\n{out}"),
        }
    }
}

/// Something that can turn a shader source into a binary.
///
/// `Err` is reserved for failures to run the tool at all; a tool that ran
/// and rejected the input returns `Ok` with `success == false`.
pub trait Compiler: Send + Sync {
    /// Compiles `request.source` into `request.output`.
    fn compile(&self, request: &CompileRequest<'_>) -> Result<ToolOutput, CompileError>;

    /// Runs the invocation that lists every file `request.source` reads.
    ///
    /// Must not write `request.output`.
    fn report_includes(&self, request: &CompileRequest<'_>) -> Result<ToolOutput, CompileError>;

    /// The parser for `report_includes` output of `language`.
    fn discovery(&self, language: SourceLanguage) -> &dyn DependencyDiscovery;
}
