//! HTML Partial - include HTML fragments into documents with `<partial>` tags
//!
//! A partial tag names a file and any number of variables:
//!
//! ```html
//! <partial src="header.html" title="Home"></partial>
//! <partial src="footer.html" year="2024" />
//! ```
//!
//! Each tag is replaced by the referenced file's content, with every `@@title`
//! (or `@@year`) placeholder in that file replaced by the attribute's value.
//! Included files may contain partial tags of their own.
//!
//! # Example
//!
//! ```rust
//! use html_partial::resolve;
//!
//! let html = resolve("<div><p>no partials here</p></div>").unwrap();
//! assert!(html.contains("<p>"));
//! ```

pub mod config;
pub mod error;
pub mod formatter;
pub mod input;
pub mod resolver;
pub mod scanner;
pub mod substitute;

pub use config::PartialConfig;
pub use error::{ConfigError, Diagnostic, PartialError, ProcessError, PLUGIN_NAME};
pub use input::{process, process_batch, Input, NamedInput, Processed, Rejected};
pub use resolver::{
    CollectingReporter, Reporter, ResolutionContext, Resolver, TracingReporter, INPUT_ORIGIN,
};
pub use scanner::{Attribute, Attributes, RegexTagScanner, TagForm, TagOccurrence, TagScanner};

/// Resolve a document with the default configuration
///
/// Recoverable errors (missing `src`, missing files) are logged through
/// `tracing`; the offending tags are replaced by nothing.
pub fn resolve(source: &str) -> Result<String, ConfigError> {
    resolve_with_config(source, &PartialConfig::default())
}

/// Resolve a document with a custom configuration
///
/// # Example
///
/// ```rust
/// use html_partial::{resolve_with_config, PartialConfig};
///
/// let config = PartialConfig::new().with_tag_name("include").with_pretty_print(false);
/// let html = resolve_with_config("<p>text</p>", &config).unwrap();
/// assert_eq!(html, "<p>text</p>");
/// ```
pub fn resolve_with_config(source: &str, config: &PartialConfig) -> Result<String, ConfigError> {
    resolve_with_reporter(source, config, &TracingReporter)
}

/// Resolve a document, sending recoverable errors to `reporter`
pub fn resolve_with_reporter(
    source: &str,
    config: &PartialConfig,
    reporter: &dyn Reporter,
) -> Result<String, ConfigError> {
    let resolver = Resolver::new(config, reporter)?;
    Ok(resolver.resolve_document(INPUT_ORIGIN, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_without_partials() {
        let html = resolve("<div><p>a</p></div>").unwrap();
        assert_eq!(html, "<div>\n  <p>\n    a\n  </p>\n</div>\n");
    }

    #[test]
    fn test_resolve_invalid_config() {
        let config = PartialConfig::new().with_tag_name("");
        let result = resolve_with_config("<p>a</p>", &config);
        assert!(matches!(result, Err(ConfigError::InvalidTagName { .. })));
    }

    #[test]
    fn test_resolve_rejects_oversized_indent() {
        let config = PartialConfig::new().with_indent_width(9_000_000_000_000_000_000);
        let reporter = CollectingReporter::new();
        let result = resolve_with_reporter("<div><p>a</p></div>", &config, &reporter);
        assert!(matches!(result, Err(ConfigError::InvalidIndentWidth { .. })));
    }

    #[test]
    fn test_resolve_reports_missing_file() {
        let config = PartialConfig::new().with_base_path("/nonexistent-dir-for-tests/");
        let reporter = CollectingReporter::new();
        let html =
            resolve_with_reporter(r#"<p>a</p><partial src="x.html"/>"#, &config, &reporter).unwrap();
        assert_eq!(html, "<p>\n  a\n</p>\n");
        assert_eq!(reporter.len(), 1);
    }

    #[test]
    fn test_closure_reporter() {
        let seen = std::cell::Cell::new(0);
        let reporter = |_: &Diagnostic| seen.set(seen.get() + 1);
        resolve_with_reporter("<partial/>", &PartialConfig::default(), &reporter).unwrap();
        assert_eq!(seen.get(), 1);
    }
}
