//! Configuration loaded from `shelfsearch.toml`.
//!
//! Every section has defaults, so a missing file or a file with only a few
//! keys is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::search::pages::DEFAULT_PAGE_DELIMITER;
use crate::search::{EmbedderConfig, SearchError};

pub const CONFIG_FILE_NAME: &str = "shelfsearch.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub chunking: ChunkingConfig,
    pub embedder: EmbedderConfig,
    pub cache: CacheConfig,
    pub search: SearchOptionsConfig,
}

/// Where extracted document text lives: `<dir>/<document_id>/<text_file>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub dir: PathBuf,
    pub text_file: String,
    pub page_delimiter: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("extracted_text"),
            text_file: "full_text.txt".to_string(),
            page_delimiter: DEFAULT_PAGE_DELIMITER.to_string(),
        }
    }
}

/// Word-window chunking parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
    pub min_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 400,
            overlap: 50,
            min_chars: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("vector_cache.bin"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptionsConfig {
    pub top_k: usize,
}

impl Default for SearchOptionsConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

impl Config {
    /// Load from `explicit` if given (it must exist), otherwise from the
    /// first of `./shelfsearch.toml` and the user config directory that
    /// exists, otherwise defaults.
    ///
    /// Not validated here: command-line overrides are applied afterwards, so
    /// callers run [`Config::validate`] on the final value.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(),
        };

        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join("shelfsearch").join("config.toml"))
            .filter(|path| path.is_file())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reject settings that would make indexing loop forever or produce an
    /// unusable index.
    pub fn validate(&self) -> std::result::Result<(), SearchError> {
        let chunking = &self.chunking;
        if chunking.chunk_size == 0 {
            return Err(SearchError::invalid_config("chunking.chunk_size must be positive"));
        }
        if chunking.overlap >= chunking.chunk_size {
            return Err(SearchError::invalid_config(format!(
                "chunking.overlap ({}) must be smaller than chunking.chunk_size ({})",
                chunking.overlap, chunking.chunk_size
            )));
        }
        if self.source.page_delimiter.trim().is_empty() {
            return Err(SearchError::invalid_config(
                "source.page_delimiter must not be empty",
            ));
        }
        if self.source.text_file.trim().is_empty() {
            return Err(SearchError::invalid_config("source.text_file must not be empty"));
        }
        if self.embedder.batch_size == 0 {
            return Err(SearchError::invalid_config("embedder.batch_size must be positive"));
        }
        if self.embedder.dimensions == 0 {
            return Err(SearchError::invalid_config("embedder.dimensions must be positive"));
        }
        Ok(())
    }
}
