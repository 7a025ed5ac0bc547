//! Toolbelt - sandboxed tools for model-driven coding sessions
//!
//! An external orchestrator asks a [`ToolRegistry`] for the enabled tools,
//! shows their definitions to a language model, and dispatches the model's
//! calls back through the registry. Every filesystem tool consults the
//! session's [`ToolContext`] sandbox before touching disk.
//!
//! # Modules
//!
//! - [`tools`] - Tool trait, context, errors, path guard, registry and built-in tools
//! - [`search`] - File selection and the concurrent search engine
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface for the `tb` binary

pub mod cli;
pub mod config;
pub mod search;
pub mod tools;

// Re-export commonly used types
pub use config::Config;
pub use search::{FileSelector, SearchEngine, SearchQuery, SearchResponse, SearchResult};
pub use tools::{Tool, ToolContext, ToolDefinition, ToolError, ToolRegistry, ToolResult};
