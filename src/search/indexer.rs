use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::{Config, SourceConfig};

use super::chunker::Chunker;
use super::embedder::Embedder;
use super::error::{Result, SearchError};
use super::pages::{extract_page_number, split_sections};
use super::store::{Chunk, DocumentCount, Index};

pub struct Indexer {
    embedder: Arc<dyn Embedder>,
    chunker: Chunker,
    source: SourceConfig,
    batch_size: usize,
}

/// A document left out of the build, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub document_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    pub documents_indexed: usize,
    pub chunks_created: usize,
    pub chunks_per_document: Vec<DocumentCount>,
    pub skipped: Vec<SkippedDocument>,
}

impl Indexer {
    pub fn new(embedder: Arc<dyn Embedder>, config: &Config) -> Result<Self> {
        config.validate()?;
        let chunker = Chunker::new(config.chunking.chunk_size, config.chunking.overlap)?
            .with_min_chars(config.chunking.min_chars);

        Ok(Self {
            embedder,
            chunker,
            source: config.source.clone(),
            batch_size: config.embedder.batch_size,
        })
    }

    pub fn source_dir(&self) -> &Path {
        &self.source.dir
    }

    /// Read, chunk and embed every document under the source directory.
    ///
    /// Nothing is returned unless every chunk was embedded; an embedding
    /// failure aborts the whole build.
    pub async fn build(&self) -> Result<(Index, IndexReport)> {
        let (chunks, mut report) = self.collect_chunks()?;

        if chunks.is_empty() {
            warn!(dir = %self.source.dir.display(), "no chunks to index");
            return Ok((Index::default(), report));
        }

        self.embedder.health_check().await?;

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embed_all(&texts).await?;
        let index = Index::new(chunks, embeddings)?;

        report.chunks_created = index.len();
        info!(
            documents = report.documents_indexed,
            chunks = report.chunks_created,
            skipped = report.skipped.len(),
            "index built"
        );

        Ok((index, report))
    }

    /// Read and chunk every document, in file-name order. Unreadable
    /// documents are skipped; a missing source directory is fatal.
    pub fn collect_chunks(&self) -> Result<(Vec<Chunk>, IndexReport)> {
        let root = &self.source.dir;
        if !root.is_dir() {
            return Err(SearchError::SourceDirMissing(root.clone()));
        }

        let mut report = IndexReport::default();
        let mut chunks = Vec::new();

        for (document_id, dir) in self.document_dirs() {
            let text_path = dir.join(&self.source.text_file);

            let content = match fs::read_to_string(&text_path) {
                Ok(content) => content,
                Err(e) => {
                    let reason = if text_path.exists() {
                        format!("cannot read {}: {}", text_path.display(), e)
                    } else {
                        format!("no {}", self.source.text_file)
                    };
                    warn!(document = %document_id, %reason, "skipping document");
                    report.skipped.push(SkippedDocument {
                        document_id,
                        reason,
                    });
                    continue;
                }
            };

            let document_chunks = self.chunk_document(&document_id, &content);
            debug!(document = %document_id, chunks = document_chunks.len(), "chunked document");

            report.documents_indexed += 1;
            report.chunks_per_document.push(DocumentCount {
                document_id,
                chunks: document_chunks.len(),
            });
            chunks.extend(document_chunks);
        }

        report.chunks_created = chunks.len();
        Ok((chunks, report))
    }

    fn document_dirs(&self) -> Vec<(String, PathBuf)> {
        let mut dirs = Vec::new();

        for entry in WalkDir::new(&self.source.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            let document_id = entry.file_name().to_string_lossy().to_string();
            dirs.push((document_id, entry.into_path()));
        }

        dirs
    }

    /// Split one document into page sections and chunk each section.
    ///
    /// The extraction step puts the `PAGE n` header in its own section, so a
    /// page number found in a section without chunks is carried to the next
    /// section that has some.
    pub fn chunk_document(&self, document_id: &str, content: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut pending_page: Option<u32> = None;

        for section in split_sections(content, &self.source.page_delimiter) {
            let page = extract_page_number(&section);
            let texts = self.chunker.chunk(&section);

            if texts.is_empty() {
                if page.is_some() {
                    pending_page = page;
                }
                continue;
            }

            let page_number = page.or(pending_page.take());

            chunks.extend(
                texts
                    .into_iter()
                    .map(|text| Chunk::new(document_id, page_number, text)),
            );
        }

        chunks
    }

    /// Embed `texts` in batches, keeping output rows aligned with inputs.
    async fn embed_all(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for (i, batch) in texts.chunks(self.batch_size).enumerate() {
            let vectors = self.embedder.embed_batch(batch).await?;
            if vectors.len() != batch.len() {
                return Err(SearchError::embedding(format!(
                    "batch {} returned {} vectors for {} texts",
                    i,
                    vectors.len(),
                    batch.len()
                )));
            }
            embeddings.extend(vectors);
            debug!(embedded = embeddings.len(), total = texts.len(), "embedding progress");
        }

        Ok(embeddings)
    }
}
