mod args;
mod index;
mod interactive;
mod search;
pub mod tui;

pub use args::{Args, Command};
pub use index::{run_clear, run_index, run_stats};
pub use interactive::run_interactive;
pub use search::run_search;

use anyhow::Result;
use std::sync::Arc;

use crate::config::Config;
use crate::search::{create_embedder, Embedder, SearchEngine};

/// Engine wired to the embedding provider named in `config`.
pub fn build_engine(config: &Config) -> Result<SearchEngine> {
    let embedder: Arc<dyn Embedder> = Arc::from(create_embedder(&config.embedder)?);
    Ok(SearchEngine::new(config, embedder)?)
}
