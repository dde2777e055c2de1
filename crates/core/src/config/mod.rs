//! Engine configuration and document loading.
//!
//! Both the metadata model and the engine config are plain serde documents,
//! read as JSON (`.json`) or YAML (`.yaml`, `.yml`) depending on extension.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::FilterConfig;
use crate::model::MetadataModel;

/// Current config format version written by [`EngineConfig::new`].
pub const CONFIG_VERSION: &str = "0.1.0";

fn default_config_version() -> String {
    CONFIG_VERSION.to_string()
}

/// Error type for parsing model and config documents.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension maps to no known document format.
    #[error("Unsupported document format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Convenience result type for document loading.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Serialization format of a model or config document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).as_deref() {
            Some("json") => Ok(DocumentFormat::Json),
            Some("yaml") | Some("yml") => Ok(DocumentFormat::Yaml),
            _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Deserialize a document from text in the given format.
pub fn parse_document<T: DeserializeOwned>(text: &str, format: DocumentFormat) -> LoadResult<T> {
    match format {
        DocumentFormat::Json => Ok(serde_json::from_str(text)?),
        DocumentFormat::Yaml => Ok(serde_yaml::from_str(text)?),
    }
}

/// Read and deserialize a document, picking the format from the extension.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let format = DocumentFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    parse_document(&text, format)
}

/// Serializable engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Schema/config version. This is about the config format, not the library version.
    #[serde(default = "default_config_version")]
    pub config_version: String,
    #[serde(flatten)]
    pub filter: FilterConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl EngineConfig {
    pub fn new(filter: FilterConfig) -> Self {
        Self { config_version: default_config_version(), filter }
    }
}

/// Load the metadata model from disk.
pub fn load_model(path: &Path) -> Result<MetadataModel> {
    read_document(path)
        .with_context(|| format!("Failed to load metadata model at {}", path.display()))
}

/// Load the engine config from disk.
pub fn load_engine_config(path: &Path) -> Result<EngineConfig> {
    read_document(path)
        .with_context(|| format!("Failed to load engine config at {}", path.display()))
}
