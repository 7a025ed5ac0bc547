//! Tool error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during tool execution
///
/// The `Display` text is relayed verbatim to the model as the tool's
/// failure message, so every variant names what went wrong and where.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Security error: path {path} is outside of sandbox root {root}")]
    SandboxViolation { path: PathBuf, root: PathBuf },

    #[error("IO error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Start line {start} out of range (file has {total} lines)")]
    LineOutOfRange { start: usize, total: usize },

    #[error("Failed to run command '{program}': {source}")]
    Execution {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{program}' terminated without an exit code")]
    Terminated { program: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Failed to serialize tool output: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    /// Wrap an IO error with a short description of the failed operation
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sandbox_violation_message() {
        let err = ToolError::SandboxViolation {
            path: PathBuf::from("/etc/passwd"),
            root: PathBuf::from("/tmp/project"),
        };

        let msg = err.to_string();
        assert!(msg.contains("/etc/passwd"));
        assert!(msg.contains("/tmp/project"));
        assert!(msg.starts_with("Security error"));
    }

    #[test]
    fn test_io_error_keeps_cause() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ToolError::io("reading /tmp/missing.txt", source);

        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing.txt"));
        assert!(msg.contains("no such file"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_line_out_of_range_message() {
        let err = ToolError::LineOutOfRange { start: 101, total: 100 };

        let msg = err.to_string();
        assert!(msg.contains("101"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn test_serialization_error_is_its_own_kind() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ToolError::from(source);

        assert!(matches!(err, ToolError::Serialization(_)));
        assert!(err.to_string().starts_with("Failed to serialize tool output"));
    }
}
