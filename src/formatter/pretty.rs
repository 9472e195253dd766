//! HTML pretty-printer
//!
//! Reflows indentation only: block elements go on their own lines, indented by
//! nesting depth, while inline elements and text stay together on one line.
//! Runs of ASCII whitespace in text collapse to one space. The bodies of
//! `pre`, `textarea`, `script` and `style` are copied verbatim.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\n\r\x0C]+").unwrap());

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "button", "cite", "code", "data", "dfn", "em", "i",
    "img", "input", "kbd", "label", "mark", "q", "s", "samp", "select", "small", "span", "strong",
    "sub", "sup", "time", "u", "var", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["pre", "script", "style", "textarea"];

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Open {
        name: String,
        raw: &'a str,
        self_closing: bool,
    },
    Close {
        name: String,
        raw: &'a str,
    },
    Text(&'a str),
    /// Comment, doctype or processing instruction
    Markup(&'a str),
    /// A raw-text element from its open tag through its close tag
    Verbatim(&'a str),
}

/// Reformat `html` with `indent_width` spaces per nesting level
pub fn pretty_print(html: &str, indent_width: usize) -> String {
    let mut printer = Printer::new(indent_width);
    for token in tokenize(html) {
        printer.push(token);
    }
    printer.finish()
}

fn tokenize(html: &str) -> Vec<Token<'_>> {
    let bytes = html.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut text_start = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'<' {
            pos += 1;
            continue;
        }

        let rest = &html[pos..];
        let len = if rest.starts_with("<!--") {
            rest.find("-->").map(|i| i + 3)
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            rest.find('>').map(|i| i + 1)
        } else if is_tag_start(rest) {
            tag_end(rest)
        } else {
            None
        };
        let Some(len) = len else {
            pos += 1;
            continue;
        };

        if text_start < pos {
            tokens.push(Token::Text(&html[text_start..pos]));
        }

        let raw = &rest[..len];
        let mut end = pos + len;
        if raw.starts_with("<!") || raw.starts_with("<?") {
            tokens.push(Token::Markup(raw));
        } else if raw.starts_with("</") {
            tokens.push(Token::Close {
                name: element_name(raw),
                raw,
            });
        } else {
            let name = element_name(raw);
            let self_closing = raw.ends_with("/>");
            match find_raw_text_close(html, end, &name) {
                Some(close_end) if !self_closing => {
                    tokens.push(Token::Verbatim(&html[pos..close_end]));
                    end = close_end;
                }
                _ => tokens.push(Token::Open {
                    name,
                    raw,
                    self_closing,
                }),
            }
        }

        pos = end;
        text_start = end;
    }

    if text_start < html.len() {
        tokens.push(Token::Text(&html[text_start..]));
    }
    tokens
}

fn is_tag_start(rest: &str) -> bool {
    let mut chars = rest.chars().skip(1);
    match chars.next() {
        Some('/') => chars.next().is_some_and(|c| c.is_ascii_alphabetic()),
        Some(c) => c.is_ascii_alphabetic(),
        None => false,
    }
}

/// Length of the tag at the start of `rest`, honoring quoted attribute values
fn tag_end(rest: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in rest.char_indices().skip(1) {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return Some(i + 1),
            None => {}
        }
    }
    None
}

fn element_name(raw: &str) -> String {
    raw.trim_start_matches('<')
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
        .collect::<String>()
        .to_ascii_lowercase()
}

/// For raw-text elements, the end offset of the matching close tag
fn find_raw_text_close(html: &str, from: usize, name: &str) -> Option<usize> {
    if !RAW_TEXT_ELEMENTS.contains(&name) {
        return None;
    }
    let needle = format!("</{}", name);
    let start = html[from..].to_ascii_lowercase().find(&needle)? + from;
    let close = html[start..].find('>')?;
    Some(start + close + 1)
}

struct Printer {
    unit: String,
    depth: usize,
    lines: Vec<String>,
    line: String,
}

impl Printer {
    fn new(indent_width: usize) -> Self {
        Self {
            unit: " ".repeat(indent_width),
            depth: 0,
            lines: Vec::new(),
            line: String::new(),
        }
    }

    fn emit(&mut self, content: &str) {
        self.lines
            .push(format!("{}{}", self.unit.repeat(self.depth), content));
    }

    fn flush(&mut self) {
        let pending = std::mem::take(&mut self.line);
        let trimmed = pending.trim_matches(|c: char| c.is_ascii_whitespace());
        if !trimmed.is_empty() {
            self.emit(trimmed);
        }
    }

    fn push(&mut self, token: Token<'_>) {
        match token {
            Token::Text(text) => {
                self.line.push_str(&WHITESPACE.replace_all(text, " "));
            }
            Token::Open {
                name,
                raw,
                self_closing,
            } => {
                if INLINE_ELEMENTS.contains(&name.as_str()) {
                    self.line.push_str(raw);
                } else {
                    self.flush();
                    self.emit(raw);
                    if !self_closing && !VOID_ELEMENTS.contains(&name.as_str()) {
                        self.depth += 1;
                    }
                }
            }
            Token::Close { name, raw } => {
                if INLINE_ELEMENTS.contains(&name.as_str()) {
                    self.line.push_str(raw);
                } else {
                    self.flush();
                    self.depth = self.depth.saturating_sub(1);
                    self.emit(raw);
                }
            }
            Token::Markup(raw) | Token::Verbatim(raw) => {
                self.flush();
                self.emit(raw);
            }
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}
