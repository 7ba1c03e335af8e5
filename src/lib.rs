//! Semantic search over text extracted from books and reports.
//!
//! Documents are split into overlapping word chunks, embedded through an
//! [`Embedder`](search::Embedder), cached to a single binary file and
//! queried by cosine similarity, either across the whole collection or
//! within one document.

pub mod cli;
pub mod config;
pub mod search;
