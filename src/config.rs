//! Optional JSON configuration (`--config enum-props.json`).
//!
//! ```json
//! { "indent_width": 2, "extensions": ["swift"], "exclude": ["**/Generated/**"] }
//! ```
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rewrite::RewriteOptions;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Spaces per nesting level when a body has no indentation to copy.
    pub indent_width: usize,
    /// File extensions picked up when an input is a directory.
    pub extensions: Vec<String>,
    /// Glob patterns of paths never rewritten.
    pub exclude: Vec<String>,
    /// Give accessors of `public`/`package` enums the same access level.
    pub mirror_access: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_width: 4,
            extensions: vec!["swift".to_string()],
            exclude: Vec::new(),
            mirror_access: true,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_json(&source, path)
    }

    /// Deserialize with the offending key path in the error message.
    pub fn from_json(source: &str, path: &Path) -> Result<Self, ConfigError> {
        let de = &mut serde_json::Deserializer::from_str(source);
        serde_path_to_error::deserialize(de).map_err(|err| {
            let at = err.path().to_string();
            ConfigError::Invalid {
                path: PathBuf::from(path),
                message: format!("at {at}: {}", err.into_inner()),
            }
        })
    }

    pub fn exclude_patterns(&self) -> Result<Vec<glob::Pattern>, ConfigError> {
        self.exclude
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern)
                    .map_err(|source| ConfigError::Exclude { pattern: pattern.clone(), source })
            })
            .collect()
    }

    pub fn rewrite_options(&self) -> RewriteOptions {
        RewriteOptions { indent_width: self.indent_width, mirror_access: self.mirror_access }
    }
}
