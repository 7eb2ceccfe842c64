//! Pipeline configuration
//!
//! Every field has a default, so a config file only needs to name what it
//! changes:
//!
//! ```
//! use gamut_rs::GamutConfig;
//!
//! let config = GamutConfig::from_json_str(r#"{ "export": { "name": "ames" } }"#).unwrap();
//! assert_eq!(config.cleaning.null_threshold, 40);
//! assert_eq!(config.export.name, "ames");
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::Result;

/// Default number of missing entries a column may have and still be kept.
pub const DEFAULT_NULL_THRESHOLD: usize = 40;

/// Configuration for column cleaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Columns with more missing entries than this are dropped, never imputed
    pub null_threshold: usize,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            null_threshold: DEFAULT_NULL_THRESHOLD,
        }
    }
}

impl CleanerConfig {
    pub fn with_null_threshold(mut self, threshold: usize) -> Self {
        self.null_threshold = threshold;
        self
    }
}

/// Configuration for artifact export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Dataset name; the artifacts are `<name>-gaam.json` and
    /// `<name>-gaam-instance-data.json`
    pub name: String,
    /// Directory the artifacts are written to
    pub directory: PathBuf,
    /// Pad both documents with placeholder records for unused columns
    pub include_all_columns: bool,
    /// Indent the JSON output
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            name: "datasetname".to_string(),
            directory: PathBuf::from("."),
            include_all_columns: false,
            pretty: false,
        }
    }
}

impl ExportConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_all_columns(mut self, include: bool) -> Self {
        self.include_all_columns = include;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamutConfig {
    pub cleaning: CleanerConfig,
    pub export: ExportConfig,
}

impl GamutConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
