//! Configuration shared by every resolution component

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Widest indentation step the pretty-printer accepts
pub const MAX_INDENT_WIDTH: usize = 16;

/// Settings for one resolution pass.
///
/// Built once before resolution begins and passed by reference to every
/// component; nothing mutates it while a document is being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialConfig {
    /// Element name identifying partial tags
    pub tag_name: String,

    /// Prefix prepended verbatim to every `src` value before file access
    pub base_path: String,

    /// Marker that precedes variable names inside partial content
    pub variable_prefix: String,

    /// Whether to reflow the final document
    pub pretty_print: bool,

    /// Spaces per nesting level when pretty-printing
    pub indent_width: usize,

    /// Whether to stop on partials that include themselves
    pub detect_cycles: bool,
}

impl Default for PartialConfig {
    fn default() -> Self {
        Self {
            tag_name: "partial".to_string(),
            base_path: String::new(),
            variable_prefix: "@@".to_string(),
            pretty_print: true,
            indent_width: 2,
            detect_cycles: true,
        }
    }
}

/// TOML structure for deserializing configuration files
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    tag_name: Option<String>,
    base_path: Option<String>,
    variable_prefix: Option<String>,
    pretty_print: Option<bool>,
    indent_width: Option<usize>,
    detect_cycles: Option<bool>,
}

impl PartialConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let defaults = Self::default();

        let config = Self {
            tag_name: parsed.tag_name.unwrap_or(defaults.tag_name),
            base_path: parsed.base_path.unwrap_or(defaults.base_path),
            variable_prefix: parsed.variable_prefix.unwrap_or(defaults.variable_prefix),
            pretty_print: parsed.pretty_print.unwrap_or(defaults.pretty_print),
            indent_width: parsed.indent_width.unwrap_or(defaults.indent_width),
            detect_cycles: parsed.detect_cycles.unwrap_or(defaults.detect_cycles),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the tag name can be used as an element name and the
    /// indent width is within bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indent_width > MAX_INDENT_WIDTH {
            return Err(ConfigError::InvalidIndentWidth {
                width: self.indent_width,
                max: MAX_INDENT_WIDTH,
            });
        }

        let mut chars = self.tag_name.chars();
        let valid = match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {
                chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
            }
            _ => false,
        };

        if valid {
            Ok(())
        } else {
            Err(ConfigError::InvalidTagName {
                name: self.tag_name.clone(),
            })
        }
    }

    /// Set the partial element name
    pub fn with_tag_name(mut self, name: impl Into<String>) -> Self {
        self.tag_name = name.into();
        self
    }

    /// Set the prefix prepended to every source path
    pub fn with_base_path(mut self, base: impl Into<String>) -> Self {
        self.base_path = base.into();
        self
    }

    /// Set the variable placeholder prefix
    pub fn with_variable_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.variable_prefix = prefix.into();
        self
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set the indentation width used by the pretty-printer
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Enable or disable cycle detection
    pub fn with_detect_cycles(mut self, detect: bool) -> Self {
        self.detect_cycles = detect;
        self
    }
}
