//! Whitespace normalization before scanning and pretty-printing after resolution

mod pretty;

use once_cell::sync::Lazy;
use regex::Regex;

pub use pretty::pretty_print;

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

/// Puts every partial tag on a line of its own.
///
/// All line breaks are collapsed to single spaces first, so a tag whose
/// attributes were spread over several lines ends up on one.
#[derive(Debug, Clone)]
pub struct Normalizer {
    open_tag: Regex,
    close_tag: Regex,
}

impl Normalizer {
    pub fn new(tag_name: &str) -> Result<Self, regex::Error> {
        let tag = regex::escape(tag_name);
        Ok(Self {
            open_tag: Regex::new(&format!(r"(?i)<{tag}(?:\s|/?>)"))?,
            close_tag: Regex::new(&format!(r"(?i)</{tag}\s*>"))?,
        })
    }

    pub fn normalize(&self, text: &str) -> String {
        let flat = LINE_BREAK.replace_all(text, " ");
        let opened = self.open_tag.replace_all(&flat, "\n$0");
        self.close_tag.replace_all(&opened, "$0\n").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn normalize(text: &str) -> String {
        Normalizer::new("partial").unwrap().normalize(text)
    }

    #[test]
    fn test_line_breaks_collapse_to_spaces() {
        assert_eq!(normalize("<p>\r\na\rb\n</p>"), "<p> a b </p>");
    }

    #[test]
    fn test_tags_get_their_own_lines() {
        assert_eq!(
            normalize("<div><partial\n src=\"a\"\n/></div>"),
            "<div>\n<partial  src=\"a\" /></div>"
        );
        assert_eq!(
            normalize("x<partial src=\"b\">y</partial>z"),
            "x\n<partial src=\"b\">y</partial>\nz"
        );
    }

    #[test]
    fn test_other_elements_untouched() {
        assert_eq!(normalize("<partials><p>x</p></partials>"), "<partials><p>x</p></partials>");
    }

    #[test]
    fn test_bare_tag_forms() {
        assert_eq!(normalize("a<partial/>b<partial></partial>"), "a\n<partial/>b\n<partial></partial>\n");
    }
}
