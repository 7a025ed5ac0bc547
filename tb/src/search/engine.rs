//! SearchEngine - concurrent first-match-per-file text search
//!
//! Candidate paths go onto a work queue that a pool of tokio tasks drains.
//! Each file is owned by exactly one worker, which sends at most one result
//! (the first matching line) to the fan-in channel. The aggregator collects
//! until every worker has dropped its sender. Cancellation is honoured
//! between files: a scan already underway runs to its first hit or EOF.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{SearchResponse, SearchResult};
use crate::tools::ToolError;

/// Bounded worker pool for case-insensitive substring search
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    max_workers: Option<usize>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the pool below the machine's available parallelism
    pub fn with_max_workers(max_workers: Option<usize>) -> Self {
        Self { max_workers }
    }

    /// min(available parallelism, candidates), further capped by configuration
    pub fn worker_count(&self, candidates: usize) -> usize {
        let available = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        let mut workers = available.min(candidates);
        if let Some(max) = self.max_workers {
            workers = workers.min(max.max(1));
        }
        workers
    }

    /// Scan every candidate, reporting the first matching line of each file
    pub async fn search(
        &self,
        query: &str,
        candidates: Vec<PathBuf>,
        cancel: &CancellationToken,
    ) -> Result<SearchResponse, ToolError> {
        let started = Instant::now();
        debug!(%query, candidates = %candidates.len(), "SearchEngine::search: called");

        if query.is_empty() {
            return Err(ToolError::Validation("query cannot be empty".to_string()));
        }

        let total_files = candidates.len();
        let workers = self.worker_count(total_files);
        if workers == 0 {
            debug!("SearchEngine::search: no candidates");
            return Ok(SearchResponse::empty(started.elapsed()));
        }

        let query_lower: Arc<str> = Arc::from(query.to_lowercase());

        // The queue holds every candidate up front, so enqueueing never waits
        let (work_tx, work_rx) = mpsc::channel::<PathBuf>(total_files);
        for path in candidates {
            if work_tx.send(path).await.is_err() {
                break;
            }
        }
        drop(work_tx);
        let work_rx = Arc::new(Mutex::new(work_rx));

        let (result_tx, mut result_rx) = mpsc::channel::<SearchResult>(total_files);
        let mut pool = JoinSet::new();
        for worker_id in 0..workers {
            pool.spawn(search_worker(
                worker_id,
                Arc::clone(&work_rx),
                result_tx.clone(),
                Arc::clone(&query_lower),
                cancel.clone(),
            ));
        }
        drop(result_tx);

        let mut results = Vec::new();
        while let Some(result) = result_rx.recv().await {
            results.push(result);
        }

        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                warn!(%e, "SearchEngine::search: worker failed");
            }
        }

        if cancel.is_cancelled() {
            info!(matched = %results.len(), "SearchEngine::search: cancelled, returning partial results");
        }

        let response = SearchResponse {
            files_matched: results.len(),
            results,
            total_files,
            duration: started.elapsed(),
        };
        info!(
            total_files = %response.total_files,
            files_matched = %response.files_matched,
            workers = %workers,
            duration = ?response.duration,
            "SearchEngine::search: complete"
        );
        Ok(response)
    }
}

async fn search_worker(
    worker_id: usize,
    work_rx: Arc<Mutex<mpsc::Receiver<PathBuf>>>,
    result_tx: mpsc::Sender<SearchResult>,
    query_lower: Arc<str>,
    cancel: CancellationToken,
) {
    debug!(%worker_id, "search_worker: started");
    let mut scanned = 0usize;

    loop {
        if cancel.is_cancelled() {
            debug!(%worker_id, "search_worker: cancelled");
            break;
        }

        let next = work_rx.lock().await.recv().await;
        let Some(path) = next else {
            break;
        };

        scanned += 1;
        if let Some(result) = search_file(&path, &query_lower).await {
            if result_tx.send(result).await.is_err() {
                break;
            }
        }
    }

    debug!(%worker_id, %scanned, "search_worker: done");
}

/// Scan one file line by line, stopping at the first hit
///
/// Files that cannot be opened or read are skipped: they count toward the
/// total but never toward matches.
async fn search_file(path: &Path, query_lower: &str) -> Option<SearchResult> {
    let file = match File::open(path).await {
        Ok(f) => f,
        Err(e) => {
            debug!(?path, %e, "search_file: skipping unopenable file");
            return None;
        }
    };

    let metadata = match file.metadata().await {
        Ok(m) => m,
        Err(e) => {
            debug!(?path, %e, "search_file: skipping file without metadata");
            return None;
        }
    };

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut line_number = 0usize;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => return None,
            Ok(_) => {}
            Err(e) => {
                debug!(?path, %e, "search_file: read failed, skipping rest of file");
                return None;
            }
        }
        line_number += 1;

        let line = decode_line(&buf);
        if let Some(found_at) = line.to_lowercase().find(query_lower) {
            debug!(?path, %line_number, "search_file: match");
            let modified_time = metadata
                .modified()
                .map(|t| DateTime::<Local>::from(t).to_rfc3339())
                .unwrap_or_default();

            return Some(SearchResult {
                file_path: path.to_path_buf(),
                line_number,
                line_content: line,
                found_at,
                file_size: metadata.len(),
                modified_time,
            });
        }
    }
}

/// Strip the line terminator (`\n` or `\r\n`) and decode lossily
fn decode_line(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}
