mod cache;
mod types;

pub use cache::{fingerprint, CachedIndex, IndexCache, CACHE_SCHEMA_VERSION};
pub use types::{Chunk, DocumentCount, IndexStats, SearchResult};

use super::error::{Result, SearchError};

/// Chunks plus a parallel embedding matrix: row `i` belongs to chunk `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Index {
    chunks: Vec<Chunk>,
    embeddings: Vec<Vec<f32>>,
}

impl Index {
    /// Fails unless there is exactly one row per chunk and every row has the
    /// same width.
    pub fn new(chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(SearchError::InconsistentIndex(format!(
                "{} chunks but {} embedding rows",
                chunks.len(),
                embeddings.len()
            )));
        }

        if let Some(first) = embeddings.first() {
            let width = first.len();
            if width == 0 {
                return Err(SearchError::InconsistentIndex(
                    "embedding rows are empty".to_string(),
                ));
            }
            if let Some(row) = embeddings.iter().position(|e| e.len() != width) {
                return Err(SearchError::InconsistentIndex(format!(
                    "row {} has width {}, expected {}",
                    row,
                    embeddings[row].len(),
                    width
                )));
            }
        }

        Ok(Self { chunks, embeddings })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    /// Embedding width, or `None` for an empty index.
    pub fn dimensions(&self) -> Option<usize> {
        self.embeddings.first().map(Vec::len)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Chunk, &[f32])> {
        self.chunks
            .iter()
            .zip(self.embeddings.iter().map(Vec::as_slice))
    }

    pub fn contains_document(&self, document_id: &str) -> bool {
        self.chunks.iter().any(|c| c.document_id == document_id)
    }

    /// Chunk counts per source document, in the order documents were indexed.
    pub fn document_counts(&self) -> Vec<DocumentCount> {
        let mut counts: Vec<DocumentCount> = Vec::new();
        for chunk in &self.chunks {
            match counts
                .iter_mut()
                .find(|c| c.document_id == chunk.document_id)
            {
                Some(count) => count.chunks += 1,
                None => counts.push(DocumentCount {
                    document_id: chunk.document_id.clone(),
                    chunks: 1,
                }),
            }
        }
        counts
    }
}

/// Cosine similarity clamped to [-1, 1]. Zero-length vectors, mismatched
/// widths and non-finite results all score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 0.0;
    }

    let similarity = dot / denom;
    if similarity.is_finite() {
        similarity.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
