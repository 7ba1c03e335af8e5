use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("source directory not found: {}", .0.display())]
    SourceDirMissing(PathBuf),

    #[error("embedding provider unavailable: {0}")]
    EmbedderUnavailable(String),

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("embedding dimension mismatch: index has {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("index is inconsistent: {0}")]
    InconsistentIndex(String),

    #[error("cache error: {0}")]
    Cache(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SearchError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }
}

impl From<bincode::Error> for SearchError {
    fn from(e: bincode::Error) -> Self {
        Self::Cache(e.to_string())
    }
}
