use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::Embedder;
use crate::search::error::{Result, SearchError};

pub struct OllamaEmbedder {
    endpoint: String,
    model: String,
    dimensions: usize,
    client: Client,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
    truncate: bool,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

impl OllamaEmbedder {
    pub fn new(endpoint: &str, model: &str, dimensions: usize, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                SearchError::invalid_config(format!("cannot create HTTP client: {}", e))
            })?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            dimensions,
            client,
        })
    }

    fn unreachable(&self) -> SearchError {
        SearchError::EmbedderUnavailable(format!(
            "cannot connect to Ollama at {}. Is Ollama running?\n\
             Install: https://ollama.ai\n\
             Start: ollama serve",
            self.endpoint
        ))
    }

    /// Error for a non-success `/api/embed` reply.
    fn rejected(&self, status: StatusCode, body: &str) -> SearchError {
        if status == StatusCode::NOT_FOUND || body.contains("not found") {
            return SearchError::embedding(format!(
                "model '{}' not found. Pull it with:\n  ollama pull {}",
                self.model, self.model
            ));
        }
        SearchError::embedding(format!("Ollama error ({}): {}", status, body))
    }

    fn is_installed(&self, tags: &OllamaTagsResponse) -> bool {
        let tagged = format!("{}:latest", self.model);
        tags.models
            .iter()
            .any(|m| m.name.starts_with(&self.model) || m.name == tagged)
    }

    /// Every vector must exist and match the configured width; a short or
    /// ragged batch would misalign chunks and rows.
    fn check_batch(&self, expected: usize, embeddings: &[Vec<f32>]) -> Result<()> {
        if embeddings.len() != expected {
            return Err(SearchError::embedding(format!(
                "Ollama returned {} embeddings for {} inputs",
                embeddings.len(),
                expected
            )));
        }
        if let Some(bad) = embeddings.iter().find(|e| e.len() != self.dimensions) {
            return Err(SearchError::embedding(format!(
                "model '{}' returned {}-dimensional vectors, configured for {}",
                self.model,
                bad.len(),
                self.dimensions
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::embedding("no embedding returned"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbedRequest {
            model: &self.model,
            input: texts,
            truncate: true,
        };

        debug!(inputs = texts.len(), model = %self.model, "requesting embeddings");

        let response = self
            .client
            .post(format!("{}/api/embed", self.endpoint))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    self.unreachable()
                } else if e.is_timeout() {
                    SearchError::embedding(format!("Ollama request timed out: {}", e))
                } else {
                    SearchError::embedding(format!("Ollama request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(self.rejected(status, &body));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| SearchError::embedding(format!("malformed Ollama response: {}", e)))?;

        self.check_batch(texts.len(), &embed_response.embeddings)?;
        Ok(embed_response.embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.endpoint))
            .send()
            .await
            .map_err(|_| self.unreachable())?;

        if !response.status().is_success() {
            return Err(SearchError::EmbedderUnavailable(format!(
                "Ollama health check failed ({})",
                response.status()
            )));
        }

        let tags: OllamaTagsResponse = response
            .json()
            .await
            .map_err(|e| {
                SearchError::EmbedderUnavailable(format!("malformed tag list: {}", e))
            })?;
        if !self.is_installed(&tags) {
            return Err(SearchError::EmbedderUnavailable(format!(
                "model '{}' not installed. Pull it with:\n  ollama pull {}",
                self.model, self.model
            )));
        }

        Ok(())
    }
}
