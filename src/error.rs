//! Error types for partial resolution and configuration

use std::fmt;
use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Fixed name prefixed to every reported line
pub const PLUGIN_NAME: &str = "html-partial";

/// Recoverable errors found while resolving a document.
///
/// None of these abort resolution: the offending tag is replaced by empty
/// content and the error is handed to a [`crate::Reporter`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartialError {
    /// A tag occurrence has no `src` attribute
    #[error("partial missing required source attribute")]
    MissingSourceAttribute,

    /// `base_path + src` does not exist
    #[error("referenced file does not exist: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// The file exists but reading it failed
    #[error("error reading referenced file {}: {message}", path.display())]
    SourceReadError { path: PathBuf, message: String },

    /// A partial (transitively) includes itself
    #[error("circular partial reference detected: {chain}")]
    CycleDetected { chain: String },
}

/// A single reported error, with enough context to point at the offending tag
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub error: PartialError,
    /// Name of the document the tag was found in (a file path or `<input>`)
    pub origin: String,
    /// Byte range of the tag within `source`
    pub span: Span,
    /// The normalized text that was being scanned
    pub source: String,
}

impl Diagnostic {
    pub fn new(error: PartialError, origin: impl Into<String>, span: Span, source: &str) -> Self {
        Self {
            error,
            origin: origin.into(),
            span,
            source: source.to_string(),
        }
    }

    /// Format the diagnostic with a source excerpt using ariadne
    pub fn format(&self) -> String {
        let mut buf = Vec::new();
        let origin = self.origin.as_str();
        let message = self.error.to_string();

        let written = Report::build(ReportKind::Error, origin, self.span.start)
            .with_message(format!("[{}] {}", PLUGIN_NAME, message))
            .with_label(
                Label::new((origin, self.span.clone()))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((origin, Source::from(self.source.as_str())), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", PLUGIN_NAME, self.origin, self.error)
    }
}

/// Errors that can occur when loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid tag name {name:?}: expected a letter followed by letters, digits, '-', '_' or ':'")]
    InvalidTagName { name: String },

    #[error("invalid indent width {width}: must be at most {max}")]
    InvalidIndentWidth { width: usize, max: usize },

    #[error("failed to build tag pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Fatal, per-document errors raised at the input boundary
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessError {
    #[error("streams unsupported")]
    UnsupportedInputKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_plugin_name_and_origin() {
        let diag = Diagnostic::new(
            PartialError::SourceNotFound {
                path: PathBuf::from("parts/missing.html"),
            },
            "index.html",
            0..10,
            "<partial src=\"missing.html\"/>",
        );
        assert_eq!(
            diag.to_string(),
            "[html-partial] index.html: referenced file does not exist: parts/missing.html"
        );
    }

    #[test]
    fn test_format_contains_excerpt() {
        let source = "<p>a</p>\n<partial title=\"x\"/>\n";
        let diag = Diagnostic::new(PartialError::MissingSourceAttribute, "page.html", 9..29, source);
        let report = diag.format();
        assert!(report.contains("partial missing required source attribute"));
        assert!(report.contains("page.html"));
    }
}
