//! FileSelector - resolve a search scope into candidate files
//!
//! Without an explicit list the base directory is walked. With one, each
//! entry is tried as a literal file first and otherwise expanded as a glob
//! (`**` matches any depth). Entries that neither exist nor parse as a
//! pattern are skipped silently: model-written parameters are often
//! imprecise, and one bad entry should not sink the whole search.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::tools::{ToolContext, ToolError};

/// Resolves search scopes for one tool session
pub struct FileSelector<'a> {
    ctx: &'a ToolContext,
}

impl<'a> FileSelector<'a> {
    pub fn new(ctx: &'a ToolContext) -> Self {
        Self { ctx }
    }

    /// Produce the deduplicated, sandbox-filtered candidate list
    ///
    /// `base` must already be resolved and guarded. Files resolving outside
    /// the sandbox are dropped rather than reported.
    pub fn select(&self, base: &Path, entries: &[String]) -> Result<Vec<PathBuf>, ToolError> {
        debug!(?base, entry_count = %entries.len(), "FileSelector::select: called");
        std::fs::metadata(base).map_err(|e| ToolError::io(format!("directory does not exist: {}", base.display()), e))?;

        let found = if entries.is_empty() {
            walk(base)
        } else {
            entries.iter().flat_map(|entry| resolve_entry(base, entry)).collect()
        };
        debug!(found = %found.len(), "FileSelector::select: raw candidates");

        let mut seen = HashSet::new();
        let mut candidates = Vec::with_capacity(found.len());
        for path in found {
            if is_hidden(&path) {
                debug!(?path, "FileSelector::select: skipping hidden file");
                continue;
            }

            let resolved = self.ctx.resolve(&path);
            if !self.ctx.permits(&resolved) {
                debug!(?resolved, "FileSelector::select: dropping file outside sandbox");
                continue;
            }

            if seen.insert(resolved.clone()) {
                candidates.push(resolved);
            }
        }

        debug!(candidates = %candidates.len(), "FileSelector::select: returning");
        Ok(candidates)
    }
}

/// Recursively collect regular files, skipping hidden entries (and everything under hidden dirs)
///
/// Links to files are kept; links to directories are not descended into.
fn walk(base: &Path) -> Vec<PathBuf> {
    debug!(?base, "walk: called");
    WalkDir::new(base)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !name_is_hidden(e.file_name()))
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(%err, "walk: skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() || (e.path_is_symlink() && e.path().is_file()))
        .map(|e| e.into_path())
        .collect()
}

/// One explicit entry: literal file if it exists, else a glob pattern
fn resolve_entry(base: &Path, entry: &str) -> Vec<PathBuf> {
    let literal = Path::new(entry);
    let candidate = if literal.is_absolute() {
        literal.to_path_buf()
    } else {
        base.join(literal)
    };

    if candidate.is_file() {
        debug!(?candidate, "resolve_entry: literal file");
        return vec![candidate];
    }

    let pattern = if literal.is_absolute() {
        entry.to_string()
    } else {
        // Escape the base so brackets in directory names are not read as pattern syntax
        let escaped_base = glob::Pattern::escape(&base.to_string_lossy());
        Path::new(&escaped_base).join(entry).to_string_lossy().into_owned()
    };

    match glob::glob(&pattern) {
        Ok(paths) => {
            let matches: Vec<PathBuf> = paths.filter_map(Result::ok).filter(|p| p.is_file()).collect();
            debug!(%pattern, matches = %matches.len(), "resolve_entry: glob expanded");
            matches
        }
        Err(e) => {
            debug!(%pattern, %e, "resolve_entry: invalid glob pattern, skipping");
            Vec::new()
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name().is_some_and(name_is_hidden)
}

fn name_is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}
