use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "shelfsearch")]
#[command(version, about = "Semantic search over text extracted from books and reports")]
pub struct Args {
    /// Config file (default: ./shelfsearch.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding one sub-directory of extracted text per document
    #[arg(long, env = "SHELFSEARCH_SOURCE", global = true)]
    pub source: Option<PathBuf>,

    /// Index cache file
    #[arg(long, env = "SHELFSEARCH_CACHE", global = true)]
    pub cache: Option<PathBuf>,

    /// Ollama endpoint
    #[arg(long, env = "OLLAMA_HOST", global = true)]
    pub endpoint: Option<String>,

    /// Embedding model
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build the index, or load it from cache when it is up to date
    Index {
        /// Rebuild even if a valid cache exists
        #[arg(long)]
        force: bool,
    },

    /// Search the index
    Search {
        query: String,

        /// Number of results
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Only search within this document
        #[arg(short, long)]
        document: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show index statistics
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Delete the index cache
    Clear,

    /// Interactive search menu (default)
    Interactive,
}

impl Args {
    /// Apply command-line overrides on top of file configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(source) = &self.source {
            config.source.dir = source.clone();
        }
        if let Some(cache) = &self.cache {
            config.cache.path = cache.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.embedder.endpoint = Some(normalize_endpoint(endpoint));
        }
        if let Some(model) = &self.model {
            config.embedder.model = model.clone();
        }
    }
}

/// `OLLAMA_HOST` is often a bare `host:port`.
fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    }
}
