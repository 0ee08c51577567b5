//! Parsers that recover the include set from compiler output.
//!
//! Each backend reports includes differently. `slangc -output-includes`
//! prints one notice per file it opens, and `glslangValidator -E` emits
//! `#line` directives naming every file spliced into the preprocessed text.
//! Both are reduced to a plain list of paths in report order; duplicates and
//! the primary source are filtered later by the dispatcher.

use std::path::PathBuf;

use crate::error::DiscoveryError;
use crate::invocation::ToolOutput;

/// Extracts dependency paths from an include report.
pub trait DependencyDiscovery: Send + Sync {
    /// Parses `output` into the paths it names.
    fn discover(&self, output: &ToolOutput) -> Result<Vec<PathBuf>, DiscoveryError>;
}

/// Finds `<marker> '<path>'` notices in `slangc -output-includes` output.
///
/// Both streams are scanned. Lines where the marker is not followed by a
/// quoted path are ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncludeNoticeParser {
    marker: String,
}

impl IncludeNoticeParser {
    /// Creates a parser looking for `marker`.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    fn parse_line(&self, line: &str) -> Result<Option<PathBuf>, String> {
        let mut rest = line;
        while let Some(pos) = rest.find(self.marker.as_str()) {
            rest = &rest[pos + self.marker.len()..];
            if let Some(path) = quoted(rest.trim_start())? {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }
}

impl Default for IncludeNoticeParser {
    fn default() -> Self {
        Self::new("include")
    }
}

impl DependencyDiscovery for IncludeNoticeParser {
    fn discover(&self, output: &ToolOutput) -> Result<Vec<PathBuf>, DiscoveryError> {
        let mut paths = Vec::new();
        let lines = output.diagnostics.lines().chain(output.stdout.lines());
        for (index, line) in lines.enumerate() {
            match self.parse_line(line) {
                Ok(Some(path)) => paths.push(path),
                Ok(None) => {}
                Err(reason) => {
                    return Err(DiscoveryError::Malformed {
                        line: index + 1,
                        reason,
                    })
                }
            }
        }
        Ok(paths)
    }
}

/// Collects the file names of `#line N "file"` directives in preprocessed text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineDirectiveParser;

impl LineDirectiveParser {
    fn parse_line(line: &str) -> Result<Option<PathBuf>, String> {
        let Some(rest) = line.trim_start().strip_prefix("#line") else {
            return Ok(None);
        };
        let rest = rest.trim_start();
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return Err("#line without a line number".to_string());
        }
        let rest = rest[digits..].trim_start();
        if rest.starts_with('"') {
            quoted(rest)
        } else {
            // `#line N` or `#line N <source-string-number>`
            Ok(None)
        }
    }
}

impl DependencyDiscovery for LineDirectiveParser {
    fn discover(&self, output: &ToolOutput) -> Result<Vec<PathBuf>, DiscoveryError> {
        let mut paths = Vec::new();
        for (index, line) in output.stdout.lines().enumerate() {
            match Self::parse_line(line) {
                Ok(Some(path)) => paths.push(path),
                Ok(None) => {}
                Err(reason) => {
                    return Err(DiscoveryError::Malformed {
                        line: index + 1,
                        reason,
                    })
                }
            }
        }
        Ok(paths)
    }
}

/// Reads a path quoted with `'` or `"` at the start of `text`.
///
/// Returns `Ok(None)` if `text` does not start with a quote.
fn quoted(text: &str) -> Result<Option<PathBuf>, String> {
    let Some(quote) = text.chars().next().filter(|c| *c == '\'' || *c == '"') else {
        return Ok(None);
    };
    let body = &text[1..];
    let end = body
        .find(quote)
        .ok_or_else(|| "unterminated path".to_string())?;
    if end == 0 {
        return Err("empty path".to_string());
    }
    Ok(Some(PathBuf::from(&body[..end])))
}
