//! Runtime configuration.
//!
//! A host can describe its languages in JSON instead of registering them in
//! code:
//!
//! ```json
//! {
//!   "languages": [
//!     {
//!       "type_name": "SchemeProvider",
//!       "location": "mosaic-scheme",
//!       "names": ["Scheme", "scm"],
//!       "extensions": [".ss", "scm"]
//!     }
//!   ],
//!   "options": { "debug_mode": false, "link_globals": true }
//! }
//! ```
//!
//! Languages from configuration are registered as deferred locators, so
//! nothing is instantiated until a unit in that language is compiled.

use std::path::Path;

use mosaic_compiler::CompilerOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Runtime-wide switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeOptions {
    /// Forwarded to providers when they compile.
    pub debug_mode: bool,
    /// Pre-link declared globals into static slots.
    pub link_globals: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            debug_mode: false,
            link_globals: true,
        }
    }
}

impl From<&RuntimeOptions> for CompilerOptions {
    fn from(options: &RuntimeOptions) -> Self {
        CompilerOptions {
            link_globals: options.link_globals,
            debug_mode: options.debug_mode,
        }
    }
}

/// One language to register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSetup {
    pub type_name: String,
    pub location: String,
    #[serde(default)]
    pub names: Vec<String>,
    /// File extensions, with or without the leading dot.
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl LanguageSetup {
    /// Names followed by dot-prefixed extensions.
    pub fn identifiers(&self) -> Vec<String> {
        let extensions = self.extensions.iter().map(|ext| {
            if ext.starts_with('.') {
                ext.clone()
            } else {
                format!(".{}", ext)
            }
        });
        self.names.iter().cloned().chain(extensions).collect()
    }
}

/// Everything needed to set up a [`Runtime`](crate::Runtime).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub languages: Vec<LanguageSetup>,
    pub options: RuntimeOptions,
}

impl RuntimeConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = RuntimeConfig::from_json(
            r#"{
                "languages": [
                    { "type_name": "Scheme", "location": "pkg", "names": ["scheme"], "extensions": ["ss", ".scm"] }
                ],
                "options": { "debug_mode": true }
            }"#,
        )
        .unwrap();

        assert_eq!(config.languages.len(), 1);
        assert_eq!(
            config.languages[0].identifiers(),
            vec!["scheme", ".ss", ".scm"]
        );
        assert!(config.options.debug_mode);
        assert!(config.options.link_globals);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(RuntimeConfig::from_json("{}").unwrap(), RuntimeConfig::default());
    }

    #[test]
    fn missing_type_name_is_an_error() {
        let err = RuntimeConfig::from_json(r#"{ "languages": [{ "location": "x" }] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn json_survives_a_file() {
        let config = RuntimeConfig {
            languages: vec![LanguageSetup {
                type_name: "Lua".to_string(),
                location: "lua-pkg".to_string(),
                names: vec!["lua".to_string()],
                extensions: vec![".lua".to_string()],
            }],
            options: RuntimeOptions::default(),
        };
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), config.to_json().unwrap()).unwrap();
        assert_eq!(RuntimeConfig::from_file(file.path()).unwrap(), config);
    }
}
