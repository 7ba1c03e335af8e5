use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    pub document_id: String,
    pub page_number: Option<u32>,
    pub text: String,
}

impl Chunk {
    pub fn new(
        document_id: impl Into<String>,
        page_number: Option<u32>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            page_number,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub document_id: String,
    pub page_number: Option<u32>,
    pub text: String,
    pub similarity: f32,
}

impl SearchResult {
    pub fn new(chunk: &Chunk, similarity: f32) -> Self {
        Self {
            document_id: chunk.document_id.clone(),
            page_number: chunk.page_number,
            text: chunk.text.clone(),
            similarity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentCount {
    pub document_id: String,
    pub chunks: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_chunks: usize,
    pub total_source_documents: usize,
    /// In index order.
    pub chunks_per_document: Vec<DocumentCount>,
    pub dimensions: Option<usize>,
    pub cache_size_bytes: u64,
    pub indexed_at: Option<DateTime<Utc>>,
}
