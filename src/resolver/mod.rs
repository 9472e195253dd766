//! Partial resolution - replaces partial tags with the files they reference
//!
//! For each tag occurrence the resolver:
//! 1. Parses the tag's attributes, using the first `src` as the file to include
//! 2. Loads `base_path + src` from disk
//! 3. Resolves the loaded content as a document of its own, so partials may
//!    include further partials
//! 4. Substitutes the remaining attributes into the result
//! 5. Replaces the tag's text in the including document
//!
//! Missing `src` attributes and unreadable files are reported and the tag is
//! replaced by nothing; resolution of the rest of the document continues.

mod context;
mod report;

use std::fs;
use std::path::PathBuf;

use tracing::{debug, trace};

pub use context::ResolutionContext;
pub use report::{CollectingReporter, Reporter, TracingReporter};

use crate::config::PartialConfig;
use crate::error::{ConfigError, Diagnostic, PartialError};
use crate::formatter::{pretty_print, Normalizer};
use crate::scanner::{RegexTagScanner, TagOccurrence, TagScanner};
use crate::substitute::substitute;

/// Origin name used for documents that did not come from a file
pub const INPUT_ORIGIN: &str = "<input>";

/// Resolves partial tags according to one configuration
pub struct Resolver<'a> {
    config: &'a PartialConfig,
    scanner: Box<dyn TagScanner + 'a>,
    normalizer: Normalizer,
    reporter: &'a dyn Reporter,
}

impl<'a> Resolver<'a> {
    /// Create a resolver using the regex scanner for `config.tag_name`
    pub fn new(config: &'a PartialConfig, reporter: &'a dyn Reporter) -> Result<Self, ConfigError> {
        config.validate()?;
        let scanner = RegexTagScanner::new(&config.tag_name)?;
        Self::with_scanner(config, reporter, Box::new(scanner))
    }

    /// Create a resolver with a custom tag scanner
    pub fn with_scanner(
        config: &'a PartialConfig,
        reporter: &'a dyn Reporter,
        scanner: Box<dyn TagScanner + 'a>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            config,
            scanner,
            normalizer: Normalizer::new(&config.tag_name)?,
            reporter,
        })
    }

    /// Fully resolve a top-level document and pretty-print the result
    pub fn resolve_document(&self, origin: &str, text: &str) -> String {
        let mut ctx = ResolutionContext::new();
        let resolved = self.resolve(origin, text, &mut ctx);

        if self.config.pretty_print {
            pretty_print(&resolved, self.config.indent_width)
        } else {
            resolved
        }
    }

    /// Normalize `text` and replace every partial tag in it, recursively
    pub fn resolve(&self, origin: &str, text: &str, ctx: &mut ResolutionContext) -> String {
        let normalized = self.normalizer.normalize(text);
        let occurrences = self.scanner.scan(&normalized);
        trace!(origin, count = occurrences.len(), "scanned for partial tags");

        let mut document = normalized.clone();
        for occurrence in &occurrences {
            // Already replaced along with an identical tag, or swallowed by an
            // enclosing closed tag.
            if !document.contains(&occurrence.text) {
                continue;
            }
            let content = self.resolve_occurrence(origin, &normalized, occurrence, ctx);
            document = document.replace(&occurrence.text, &content);
        }
        document
    }

    fn resolve_occurrence(
        &self,
        origin: &str,
        source: &str,
        occurrence: &TagOccurrence,
        ctx: &mut ResolutionContext,
    ) -> String {
        let attributes = occurrence.parse_attributes();

        let Some(src) = attributes.source() else {
            self.report(PartialError::MissingSourceAttribute, origin, source, occurrence);
            return String::new();
        };

        let path = self.source_path(src);
        if !path.exists() {
            self.report(PartialError::SourceNotFound { path }, origin, source, occurrence);
            return String::new();
        }

        if self.config.detect_cycles && ctx.is_resolving(&path) {
            let chain = ctx.chain_to(&path);
            self.report(PartialError::CycleDetected { chain }, origin, source, occurrence);
            return String::new();
        }

        let raw = match fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                let error = PartialError::SourceReadError {
                    path,
                    message: e.to_string(),
                };
                self.report(error, origin, source, occurrence);
                return String::new();
            }
        };

        debug!(path = %path.display(), depth = ctx.depth(), "including partial");

        ctx.start_resolving(&path);
        let nested_origin = path.display().to_string();
        let resolved = self.resolve(&nested_origin, &raw, ctx);
        ctx.done_resolving();

        substitute(
            &resolved,
            &attributes.variables(),
            &self.config.variable_prefix,
        )
    }

    /// `base_path` and `src` joined as plain strings
    fn source_path(&self, src: &str) -> PathBuf {
        PathBuf::from(format!("{}{}", self.config.base_path, src))
    }

    fn report(&self, error: PartialError, origin: &str, source: &str, occurrence: &TagOccurrence) {
        let diagnostic = Diagnostic::new(error, origin, occurrence.span.clone(), source);
        self.reporter.report(&diagnostic);
    }
}
