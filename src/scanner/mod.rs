//! Discovery of partial tags in a document
//!
//! Tags are found structurally by pattern matching, not by parsing HTML. The
//! [`TagScanner`] trait keeps that choice behind a narrow seam so the resolver
//! does not depend on how occurrences are found.
//!
//! # Nesting
//!
//! The closed form is matched non-greedily: `<partial ...>` ends at the nearest
//! `</partial>`. A partial tag nested inside another's body is therefore part
//! of the outer occurrence, and a second closing tag after it is left behind
//! as text.

pub mod attributes;

use regex::Regex;

pub use attributes::{parse_attributes, Attribute, Attributes, SOURCE_KEY};

use crate::error::Span;

/// Which syntactic form a tag occurrence was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagForm {
    /// `<partial ...>...</partial>`
    Closed,
    /// `<partial .../>`
    SelfClosing,
}

/// One textual match of the partial element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOccurrence {
    /// The exact matched text
    pub text: String,
    /// The attribute text between the element name and the end of the open tag
    pub attributes: String,
    /// Byte range of `text` in the scanned document
    pub span: Span,
    pub form: TagForm,
}

impl TagOccurrence {
    /// Parse this occurrence's attributes
    pub fn parse_attributes(&self) -> Attributes {
        parse_attributes(&self.attributes)
    }
}

/// Finds partial tag occurrences in a document
pub trait TagScanner {
    /// Return every occurrence: closed-form matches first, then self-closing
    fn scan(&self, document: &str) -> Vec<TagOccurrence>;
}

/// Regex-backed scanner for a single element name
#[derive(Debug, Clone)]
pub struct RegexTagScanner {
    closed: Regex,
    self_closing: Regex,
}

impl RegexTagScanner {
    /// Build the patterns for `tag_name`, matched case-insensitively
    pub fn new(tag_name: &str) -> Result<Self, regex::Error> {
        let tag = regex::escape(tag_name);

        // The open tag of the closed form must not end in "/>".
        let closed = Regex::new(&format!(
            r"(?is)<{tag}(\s(?:[^>/]|/[^>])*)?>.*?</{tag}\s*>"
        ))?;
        let self_closing = Regex::new(&format!(r"(?is)<{tag}(\s[^>]*?)?/>"))?;

        Ok(Self {
            closed,
            self_closing,
        })
    }

    fn collect(pattern: &Regex, form: TagForm, document: &str, out: &mut Vec<TagOccurrence>) {
        for caps in pattern.captures_iter(document) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            out.push(TagOccurrence {
                text: whole.as_str().to_string(),
                attributes: caps
                    .get(1)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
                span: whole.range(),
                form,
            });
        }
    }
}

impl TagScanner for RegexTagScanner {
    fn scan(&self, document: &str) -> Vec<TagOccurrence> {
        let mut found = Vec::new();
        Self::collect(&self.closed, TagForm::Closed, document, &mut found);
        Self::collect(&self.self_closing, TagForm::SelfClosing, document, &mut found);
        found
    }
}
