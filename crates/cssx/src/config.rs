//! Compiler and project configuration.
//!
//! A project is configured by an optional `cssx.toml`:
//!
//! ```toml
//! [compiler]
//! max_expansion_depth = 50
//! indent = 2
//! html_lang = "es"
//! default_title = "Generated Page"
//!
//! [output]
//! dir = "dist"
//! css = true
//! html = true
//! ```
//!
//! Every key is optional. A missing file yields the defaults.

use std::path::{Path, PathBuf};

use cssx_core::sema::MAX_EXPANSION_DEPTH;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "cssx.toml";

/// Settings for a single compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Deepest template invocation chain before expansion gives up.
    pub max_expansion_depth: usize,
    /// Spaces per indentation level in generated CSS and HTML.
    pub indent: usize,
    /// Value of the `lang` attribute on the generated `<html>` element.
    pub html_lang: String,
    /// Page title used when the source declares no `titulo_pagina`.
    pub default_title: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_expansion_depth: MAX_EXPANSION_DEPTH,
            indent: 2,
            html_lang: "es".to_string(),
            default_title: "Generated Page".to_string(),
        }
    }
}

impl CompilerConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum template expansion depth.
    pub fn with_max_expansion_depth(mut self, depth: usize) -> Self {
        self.max_expansion_depth = depth;
        self
    }

    /// Set the indentation width.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set the document language.
    pub fn with_html_lang(mut self, lang: impl Into<String>) -> Self {
        self.html_lang = lang.into();
        self
    }

    /// Set the fallback page title.
    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }
}

/// Where and what to write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Output directory. Relative paths are taken from the working directory.
    pub dir: PathBuf,
    /// Write `<stem>.css`.
    pub css: bool,
    /// Write `<stem>.html`.
    pub html: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            css: true,
            html: true,
        }
    }
}

/// Contents of `cssx.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub compiler: CompilerConfig,
    pub output: OutputConfig,
}

impl ProjectConfig {
    /// Parse configuration text. `path` is only used in error messages.
    pub fn from_toml(text: &str, path: impl AsRef<Path>) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::config(path.as_ref(), e.message()))
    }

    /// Load a configuration file. A file that does not exist yields the
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_toml(&text, path)?;
                tracing::debug!(path = %path.display(), "loaded configuration");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no configuration file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(Error::io(path, e)),
        }
    }

    /// Load `cssx.toml` from `dir`, or the defaults if there is none.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self> {
        Self::load(dir.as_ref().join(CONFIG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.max_expansion_depth, 50);
        assert_eq!(config.indent, 2);
        assert_eq!(config.html_lang, "es");
        assert_eq!(config.default_title, "Generated Page");

        let output = OutputConfig::default();
        assert!(output.css && output.html);
    }

    #[test]
    fn builder_setters() {
        let config = CompilerConfig::new()
            .with_indent(4)
            .with_html_lang("en")
            .with_default_title("Demo")
            .with_max_expansion_depth(8);
        assert_eq!(config.indent, 4);
        assert_eq!(config.html_lang, "en");
        assert_eq!(config.default_title, "Demo");
        assert_eq!(config.max_expansion_depth, 8);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ProjectConfig::from_toml("[compiler]\nindent = 4\n\n[output]\nhtml = false\n", "cssx.toml")
            .expect("valid configuration");
        assert_eq!(config.compiler.indent, 4);
        assert_eq!(config.compiler.html_lang, "es");
        assert!(config.output.css);
        assert!(!config.output.html);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let err = ProjectConfig::from_toml("[compiler]\nindent = \"wide\"\n", "cssx.toml")
            .expect_err("wrong type");
        assert!(matches!(err, Error::Config { .. }));

        let err = ProjectConfig::from_toml("[compiler]\ncolour = 1\n", "cssx.toml")
            .expect_err("unknown key");
        assert!(err.to_string().starts_with("invalid configuration in 'cssx.toml'"));
    }
}
