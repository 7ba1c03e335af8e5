//! The search engine facade: owns the in-memory index, its cache file and
//! the embedding provider used for both indexing and queries.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;

use super::embedder::Embedder;
use super::error::{Result, SearchError};
use super::indexer::{IndexReport, Indexer};
use super::searcher::rank;
use super::store::{fingerprint, Index, IndexCache, IndexStats, SearchResult};

/// Why a query produced the results it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    Ok,
    EmptyIndex,
    UnknownDocument(String),
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStatus::Ok => write!(f, "ok"),
            SearchStatus::EmptyIndex => {
                write!(f, "no indexed documents; run an index build first")
            }
            SearchStatus::UnknownDocument(id) => {
                write!(f, "document '{}' is not in the index", id)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub status: SearchStatus,
}

impl SearchResponse {
    fn empty(status: SearchStatus) -> Self {
        warn!(%status, "search returned no results");
        Self {
            results: Vec::new(),
            status,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// What `index_all` did.
#[derive(Debug, Clone)]
pub enum IndexOutcome {
    /// The cache was valid and loaded as-is.
    Loaded { chunks: usize },
    /// The index was rebuilt from the source directory.
    Built(IndexReport),
}

pub struct SearchEngine {
    embedder: Arc<dyn Embedder>,
    indexer: Indexer,
    cache: IndexCache,
    index: Index,
    indexed_at: Option<DateTime<Utc>>,
}

impl SearchEngine {
    pub fn new(config: &Config, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let indexer = Indexer::new(Arc::clone(&embedder), config)?;
        let cache = IndexCache::new(
            config.cache.path.clone(),
            settings_fingerprint(config, embedder.as_ref()),
        );

        Ok(Self {
            embedder,
            indexer,
            cache,
            index: Index::default(),
            indexed_at: None,
        })
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn cache(&self) -> &IndexCache {
        &self.cache
    }

    /// Load the cache into memory if it is valid. Returns whether it was.
    pub fn load_cache(&mut self) -> bool {
        match self.cache.load() {
            Some(cached) => {
                info!(
                    chunks = cached.index.len(),
                    path = %self.cache.path().display(),
                    "loaded index from cache"
                );
                self.index = cached.index;
                self.indexed_at = Some(cached.indexed_at);
                true
            }
            None => false,
        }
    }

    /// Make the index ready for queries.
    ///
    /// Without `force_reindex` a valid cache is loaded and nothing is
    /// recomputed. Otherwise every document is re-chunked and re-embedded and
    /// the cache is overwritten; a build with no chunks deletes it. On error
    /// the engine keeps its previous index.
    pub async fn index_all(&mut self, force_reindex: bool) -> Result<IndexOutcome> {
        if !force_reindex && self.load_cache() {
            return Ok(IndexOutcome::Loaded {
                chunks: self.index.len(),
            });
        }

        info!(dir = %self.indexer.source_dir().display(), "building index");
        let (index, report) = self.indexer.build().await?;

        if index.is_empty() {
            warn!("nothing was indexed; removing any previous cache");
            self.cache.clear()?;
            self.index = index;
            self.indexed_at = None;
        } else {
            let indexed_at = self.cache.save(&index)?;
            self.index = index;
            self.indexed_at = Some(indexed_at);
        }

        Ok(IndexOutcome::Built(report))
    }

    /// Nearest chunks to `query` across all documents.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<SearchResponse> {
        self.query(query, None, top_k).await
    }

    /// Nearest chunks to `query` within one document.
    pub async fn search_within(
        &self,
        query: &str,
        document_id: &str,
        top_k: usize,
    ) -> Result<SearchResponse> {
        self.query(query, Some(document_id), top_k).await
    }

    async fn query(
        &self,
        query: &str,
        document_id: Option<&str>,
        top_k: usize,
    ) -> Result<SearchResponse> {
        if self.index.is_empty() {
            return Ok(SearchResponse::empty(SearchStatus::EmptyIndex));
        }
        if let Some(id) = document_id {
            if !self.index.contains_document(id) {
                return Ok(SearchResponse::empty(SearchStatus::UnknownDocument(
                    id.to_string(),
                )));
            }
        }

        let query_vector = self.embedder.embed(query).await?;
        if let Some(expected) = self.index.dimensions() {
            if query_vector.len() != expected {
                return Err(SearchError::DimensionMismatch {
                    expected,
                    actual: query_vector.len(),
                });
            }
        }

        Ok(SearchResponse {
            results: rank(&self.index, &query_vector, document_id, top_k),
            status: SearchStatus::Ok,
        })
    }

    /// Document ids in index order.
    pub fn documents(&self) -> Vec<String> {
        self.index
            .document_counts()
            .into_iter()
            .map(|c| c.document_id)
            .collect()
    }

    pub fn statistics(&self) -> IndexStats {
        let chunks_per_document = self.index.document_counts();
        IndexStats {
            total_chunks: self.index.len(),
            total_source_documents: chunks_per_document.len(),
            chunks_per_document,
            dimensions: self.index.dimensions(),
            cache_size_bytes: self.cache.size_bytes(),
            indexed_at: self.indexed_at,
        }
    }

    /// Drop the in-memory index and delete the cache file.
    pub fn clear(&mut self) -> Result<()> {
        self.cache.clear()?;
        self.index = Index::default();
        self.indexed_at = None;
        Ok(())
    }
}

/// Digest of every setting that changes what ends up in the index.
fn settings_fingerprint(config: &Config, embedder: &dyn Embedder) -> String {
    let dimensions = embedder.dimensions().to_string();
    let chunk_size = config.chunking.chunk_size.to_string();
    let overlap = config.chunking.overlap.to_string();
    let min_chars = config.chunking.min_chars.to_string();

    fingerprint(&[
        embedder.model(),
        dimensions.as_str(),
        chunk_size.as_str(),
        overlap.as_str(),
        min_chars.as_str(),
        config.source.page_delimiter.as_str(),
        config.source.text_file.as_str(),
    ])
}
