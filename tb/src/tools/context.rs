//! ToolContext - execution context for tools

use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{ToolError, guard};

/// Execution context for tools - built once per orchestration session
///
/// Relative paths supplied by the model are resolved against `working_dir`.
/// When `sandbox_root` is set every filesystem tool is confined to it;
/// when it is `None` containment checks are disabled entirely.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Directory relative paths are resolved against (commands run here too)
    pub working_dir: PathBuf,

    /// Sandbox root - all file ops constrained here when set
    pub sandbox_root: Option<PathBuf>,

    /// Session cancellation signal
    pub cancel: CancellationToken,

    /// Optional cap on the search worker pool
    pub max_search_workers: Option<usize>,
}

impl ToolContext {
    /// Create a sandboxed context rooted at `root`, working from the same directory
    pub fn new(root: PathBuf) -> Self {
        debug!(?root, "ToolContext::new: called");
        Self {
            working_dir: root.clone(),
            sandbox_root: Some(root),
            cancel: CancellationToken::new(),
            max_search_workers: None,
        }
    }

    /// Create a context with sandbox disabled
    pub fn new_unsandboxed(working_dir: PathBuf) -> Self {
        debug!(?working_dir, "ToolContext::new_unsandboxed: called");
        Self {
            working_dir,
            sandbox_root: None,
            cancel: CancellationToken::new(),
            max_search_workers: None,
        }
    }

    /// Use a caller-supplied cancellation token
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Cap the number of search workers
    pub fn with_max_search_workers(mut self, max: usize) -> Self {
        self.max_search_workers = Some(max);
        self
    }

    /// Whether containment checks are active
    pub fn is_sandboxed(&self) -> bool {
        self.sandbox_root.is_some()
    }

    /// Resolve a path to its absolute form without checking the sandbox
    pub fn resolve(&self, path: &Path) -> PathBuf {
        guard::resolve(&self.working_dir, path)
    }

    /// Whether `path` passes the sandbox check (always true when unsandboxed)
    pub fn permits(&self, path: &Path) -> bool {
        match &self.sandbox_root {
            Some(root) => guard::permitted_from(&self.working_dir, root, path),
            None => true,
        }
    }

    /// Resolve `path` and enforce the sandbox (must run before any IO)
    pub fn guard(&self, path: &Path) -> Result<PathBuf, ToolError> {
        debug!(?path, "ToolContext::guard: called");
        let resolved = self.resolve(path);

        if self.permits(&resolved) {
            debug!(?resolved, "ToolContext::guard: path permitted");
            return Ok(resolved);
        }

        debug!(?resolved, "ToolContext::guard: sandbox violation detected");
        Err(ToolError::SandboxViolation {
            path: resolved,
            root: self
                .sandbox_root
                .as_deref()
                .map(|root| self.resolve(root))
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_guard_path_within_root() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("test.txt"), "content").unwrap();

        let ctx = ToolContext::new(temp.path().to_path_buf());

        let result = ctx.guard(Path::new("test.txt"));
        assert!(result.is_ok());
        assert!(result.unwrap().is_absolute());
    }

    #[test]
    fn test_guard_path_outside_root() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::new(temp.path().to_path_buf());

        let result = ctx.guard(Path::new("/etc/passwd"));
        assert!(matches!(result, Err(ToolError::SandboxViolation { .. })));
    }

    #[test]
    fn test_guard_violation_names_both_paths() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("root");
        fs::create_dir_all(&root).unwrap();
        let ctx = ToolContext::new(root);

        let msg = ctx.guard(Path::new("../root2/file")).unwrap_err().to_string();
        assert!(msg.contains("root2"));
        assert!(msg.contains("root"));
    }

    #[test]
    fn test_guard_with_sandbox_disabled() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::new_unsandboxed(temp.path().to_path_buf());

        assert!(!ctx.is_sandboxed());
        assert!(ctx.guard(Path::new("/etc/passwd")).is_ok());
    }

    #[test]
    fn test_guard_new_file_path() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::new(temp.path().to_path_buf());

        assert!(ctx.guard(Path::new("new/dir/new_file.txt")).is_ok());
    }

    #[test]
    fn test_working_dir_separate_from_root() {
        let temp = tempdir().unwrap();
        let sub = temp.path().join("sub");
        fs::create_dir_all(&sub).unwrap();

        let mut ctx = ToolContext::new(temp.path().to_path_buf());
        ctx.working_dir = sub.clone();

        let resolved = ctx.guard(Path::new("a.txt")).unwrap();
        assert_eq!(resolved, sub.canonicalize().unwrap().join("a.txt"));
        assert!(ctx.guard(Path::new("../b.txt")).is_ok());
        assert!(ctx.guard(Path::new("../../c.txt")).is_err());
    }
}
