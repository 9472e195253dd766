//! Attribute extraction from a single tag's attribute text

/// Key of the attribute naming the file to include
pub const SOURCE_KEY: &str = "src";

/// A `key=value` pair found on a partial tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Whether this is the `src` attribute, in any letter case
    pub fn is_source(&self) -> bool {
        self.key.eq_ignore_ascii_case(SOURCE_KEY)
    }
}

/// Attributes of one tag, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(pub Vec<Attribute>);

impl Attributes {
    /// The first `src` value, if any. Later `src` attributes are ignored.
    pub fn source(&self) -> Option<&str> {
        self.0
            .iter()
            .find(|a| a.is_source())
            .map(|a| a.value.as_str())
    }

    /// Every non-`src` attribute, in source order
    pub fn variables(&self) -> Vec<&Attribute> {
        self.0.iter().filter(|a| !a.is_source()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parse the attribute text of a tag (everything between the element name and
/// the closing `>` or `/>`).
///
/// Values may be quoted with `"` or `'` and may contain spaces. Quoted or not,
/// a value ends where the next `key=` begins. Segments that do not look like
/// `key=value` are skipped.
pub fn parse_attributes(text: &str) -> Attributes {
    let mut cursor = Cursor::new(text);
    let mut attrs = Vec::new();

    loop {
        cursor.skip_while(|c| c.is_whitespace() || c == '/');
        if cursor.at_end() || cursor.peek() == Some('>') {
            break;
        }

        let key = cursor.take_while(is_key_char);
        if key.is_empty() {
            // Stray quote or '=': drop the rest of this segment.
            cursor.bump();
            cursor.skip_while(|c| !c.is_whitespace());
            continue;
        }
        if cursor.peek() != Some('=') {
            // Bare attribute such as `disabled`
            continue;
        }
        cursor.bump();

        let value = match cursor.peek() {
            Some(quote @ ('"' | '\'')) => {
                cursor.bump();
                cursor.take_quoted(quote)
            }
            _ => cursor.take_unquoted(),
        };

        attrs.push(Attribute::new(key, value));
    }

    Attributes(attrs)
}

fn is_key_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '=' | '"' | '\'' | '<' | '>' | '/')
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        self.skip_while(pred);
        &self.text[start..self.pos]
    }

    /// Read up to the matching unescaped quote and step past it. Like an
    /// unquoted value, a quoted one also ends where the next `key=` begins.
    fn take_quoted(&mut self, quote: char) -> String {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() && starts_next_attribute(self.rest()) {
                return value;
            }
            self.bump();
            if c == quote {
                return value;
            }
            if c == '\\' && self.peek() == Some(quote) {
                value.push(quote);
                self.bump();
                continue;
            }
            value.push(c);
        }
        value
    }

    /// Read until the next `key=` boundary, a quote, `>`, or the end
    fn take_unquoted(&mut self) -> String {
        let start = self.pos;
        let mut end = self.pos;

        while let Some(c) = self.peek() {
            if matches!(c, '>' | '"' | '\'') {
                break;
            }
            if c.is_whitespace() && starts_next_attribute(&self.text[self.pos..]) {
                break;
            }
            self.bump();
            end = self.pos;
        }

        let value = self.text[start..end].trim_end();
        let value = if self.at_end() || self.peek() == Some('>') {
            value.strip_suffix('/').unwrap_or(value).trim_end()
        } else {
            value
        };
        value.to_string()
    }
}

/// Whether `rest` (starting at whitespace) continues with `key=`
fn starts_next_attribute(rest: &str) -> bool {
    let trimmed = rest.trim_start();
    let key_len = trimmed
        .char_indices()
        .find(|&(_, c)| !is_key_char(c))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    key_len > 0 && trimmed[key_len..].starts_with('=')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pairs(text: &str) -> Vec<(String, String)> {
        parse_attributes(text)
            .0
            .into_iter()
            .map(|a| (a.key, a.value))
            .collect()
    }

    fn owned(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_double_and_single_quotes() {
        assert_eq!(
            pairs(r#" src="a.html" title='Hello there'"#),
            owned(&[("src", "a.html"), ("title", "Hello there")])
        );
    }

    #[test]
    fn test_unquoted_value_with_spaces_stops_at_next_key() {
        assert_eq!(
            pairs(" title=Hello big world src=b.html"),
            owned(&[("title", "Hello big world"), ("src", "b.html")])
        );
    }

    #[test]
    fn test_self_closing_slash_is_not_part_of_value() {
        assert_eq!(pairs(" src=c.html /"), owned(&[("src", "c.html")]));
        assert_eq!(pairs(r#" src="c.html"/"#), owned(&[("src", "c.html")]));
    }

    #[test]
    fn test_slash_inside_path_is_kept() {
        assert_eq!(
            pairs(" src=parts/nav/top.html"),
            owned(&[("src", "parts/nav/top.html")])
        );
    }

    #[test]
    fn test_quoted_value_stops_at_next_key() {
        assert_eq!(
            pairs(r#" label="a b=c" src="x.html""#),
            owned(&[("label", "a"), ("b", "c"), ("src", "x.html")])
        );
    }

    #[test]
    fn test_quoted_value_keeps_spaces_and_equals_without_key() {
        assert_eq!(
            pairs(r#" q="1 + 1 = 2" src='a b.html'"#),
            owned(&[("q", "1 + 1 = 2"), ("src", "a b.html")])
        );
    }

    #[test]
    fn test_source_key_is_case_insensitive() {
        let attrs = parse_attributes(r#" SRC="a.html" Title="T""#);
        assert_eq!(attrs.source(), Some("a.html"));
        let keys: Vec<&str> = attrs.variables().iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["Title"]);
    }

    #[test]
    fn test_escaped_quote() {
        assert_eq!(
            pairs(r#" quote="say \"hi\"""#),
            owned(&[("quote", r#"say "hi""#)])
        );
    }

    #[test]
    fn test_malformed_segments_are_skipped() {
        assert_eq!(
            pairs(r#" disabled ="x" src="a.html""#),
            owned(&[("src", "a.html")])
        );
        assert_eq!(
            pairs(r#" hidden src="a.html" 'junk' n=1"#),
            owned(&[("src", "a.html"), ("n", "1")])
        );
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(pairs(r#" alt="""#), owned(&[("alt", "")]));
    }

    #[test]
    fn test_source_and_variables() {
        let attrs = parse_attributes(r#" a="1" src="first.html" b="2" src="second.html""#);
        assert_eq!(attrs.source(), Some("first.html"));
        let keys: Vec<&str> = attrs.variables().iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_no_attributes() {
        assert!(parse_attributes("").is_empty());
        assert!(parse_attributes("   ").is_empty());
        assert_eq!(parse_attributes(r#" title="x""#).source(), None);
    }
}
