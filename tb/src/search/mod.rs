//! Multi-file text search
//!
//! [`FileSelector`] turns a directory or an explicit list of paths and glob
//! patterns into sandbox-filtered candidates; [`SearchEngine`] fans those
//! candidates out over a worker pool and reports the first match per file.

mod engine;
mod selector;
mod types;

pub use engine::SearchEngine;
pub use selector::FileSelector;
pub use types::{SearchQuery, SearchResponse, SearchResult};
