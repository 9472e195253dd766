//! Variable placeholder substitution

use aho_corasick::{AhoCorasickBuilder, MatchKind};

use crate::scanner::Attribute;

/// Replace every `prefix + key` placeholder in `content` with the attribute's
/// value.
///
/// All placeholders are replaced in a single left-to-right pass, so a value
/// that itself contains a placeholder is inserted as-is. Where one key is a
/// prefix of another (`@@a`, `@@ab`) the longer placeholder wins; if a key is
/// given twice the first value is used.
pub fn substitute(content: &str, variables: &[&Attribute], prefix: &str) -> String {
    let mut placeholders: Vec<String> = Vec::with_capacity(variables.len());
    let mut values: Vec<&str> = Vec::with_capacity(variables.len());

    for attr in variables {
        if attr.key.is_empty() {
            continue;
        }
        let placeholder = format!("{}{}", prefix, attr.key);
        if placeholders.contains(&placeholder) {
            continue;
        }
        placeholders.push(placeholder);
        values.push(attr.value.as_str());
    }

    if content.is_empty() || placeholders.is_empty() {
        return content.to_string();
    }

    let matcher = AhoCorasickBuilder::new()
        .match_kind(MatchKind::LeftmostLongest)
        .build(&placeholders);
    matcher.replace_all(content, &values)
}
