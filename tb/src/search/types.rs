//! Search query and result types

use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What to search for and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Case-insensitive substring to look for
    pub query: String,

    /// Directory to search (relative paths resolve against the session's working dir)
    pub directory: PathBuf,

    /// Literal paths and/or glob patterns restricting the scope; empty = walk `directory`
    pub files: Vec<String>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            directory: PathBuf::from("."),
            files: Vec::new(),
        }
    }

    pub fn in_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }
}

/// First match found in one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Non-UTF-8 names are rendered lossily rather than failing the response
    #[serde(serialize_with = "serialize_path_lossy")]
    pub file_path: PathBuf,

    /// 1-based
    pub line_number: usize,

    /// The raw line, without its terminator
    pub line_content: String,

    /// Byte offset of the match within the lower-cased line
    pub found_at: usize,

    pub file_size: u64,

    /// RFC 3339
    pub modified_time: String,
}

/// Everything one search produced
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// One entry per matching file, in completion order
    pub results: Vec<SearchResult>,
    pub total_files: usize,
    pub files_matched: usize,
    #[serde(serialize_with = "serialize_duration")]
    pub duration: Duration,
}

impl SearchResponse {
    pub fn empty(duration: Duration) -> Self {
        Self {
            results: Vec::new(),
            total_files: 0,
            files_matched: 0,
            duration,
        }
    }
}

fn serialize_path_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

fn serialize_duration<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:?}", duration))
}
