pub mod chunker;
pub mod embedder;
pub mod engine;
pub mod error;
pub mod indexer;
pub mod pages;
pub mod searcher;
pub mod store;

pub use chunker::{Chunker, MIN_CHUNK_CHARS};
pub use embedder::{create_embedder, Embedder, EmbedderConfig, OllamaEmbedder};
pub use engine::{IndexOutcome, SearchEngine, SearchResponse, SearchStatus};
pub use error::{Result, SearchError};
pub use indexer::{IndexReport, Indexer, SkippedDocument};
pub use searcher::rank;
pub use store::{Chunk, DocumentCount, Index, IndexCache, IndexStats, SearchResult};
