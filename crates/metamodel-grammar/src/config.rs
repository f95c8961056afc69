//! Compiler configuration.

use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::diagnostic::CompilerError;

/// Default name of the identifier property injected into every parser rule.
pub const DEFAULT_REFERENCE_PROPERTY: &str = "__id";

/// Configuration for the grammar compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerConfig {
    /// Name of the identifier property every parser rule carries.
    pub reference_property: String,

    /// Echo advisory warnings to stderr.
    pub report_warnings: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            reference_property: DEFAULT_REFERENCE_PROPERTY.to_string(),
            report_warnings: true,
        }
    }
}

impl CompilerConfig {
    /// Parses a generator configuration document. Missing keys keep their defaults.
    pub fn from_json(source: &str) -> Result<Self, CompilerError> {
        let config: Self = serde_json::from_str(source).map_err(|e| CompilerError::InvalidConfig {
            message: e.to_string(),
        })?;

        if config.reference_property.trim().is_empty() {
            return Err(CompilerError::InvalidConfig {
                message: "referenceProperty must not be empty".to_string(),
            });
        }

        Ok(config)
    }

    /// Loads a generator configuration file.
    pub fn load(path: &Path) -> Result<Self, CompilerError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CompilerError::io(path, e.to_string()))?;
        Self::from_json(&content)
    }
}
