mod ollama;

pub use ollama::OllamaEmbedder;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::{Result, SearchError};

/// Source of every vector in the index. Implementations must be
/// deterministic for a fixed model.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
    fn dimensions(&self) -> usize;
    /// Identifies the vector space; part of the cache fingerprint.
    fn model(&self) -> &str;
    async fn health_check(&self) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedderConfig {
    pub provider: String,
    pub model: String,
    pub endpoint: Option<String>,
    pub dimensions: usize,
    pub timeout_secs: u64,
    pub batch_size: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "all-minilm".to_string(),
            endpoint: None,
            dimensions: 384,
            timeout_secs: 120,
            batch_size: 32,
        }
    }
}

impl EmbedderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn create_embedder(config: &EmbedderConfig) -> Result<Box<dyn Embedder>> {
    match config.provider.as_str() {
        "ollama" => {
            let endpoint = config
                .endpoint
                .clone()
                .unwrap_or_else(|| "http://localhost:11434".to_string());
            Ok(Box::new(OllamaEmbedder::new(
                &endpoint,
                &config.model,
                config.dimensions,
                config.timeout(),
            )?))
        }
        other => Err(SearchError::invalid_config(format!(
            "unknown embedding provider '{}'",
            other
        ))),
    }
}
