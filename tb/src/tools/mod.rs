//! Tool system for model-driven coding sessions
//!
//! Tools provide file reading, file writing, command execution and text
//! search to an external orchestrator. Each session gets a `ToolContext`
//! that optionally confines every filesystem tool to a sandbox root.

mod context;
mod error;
mod registry;
mod traits;

pub mod builtin;
pub mod guard;

pub use context::ToolContext;
pub use error::ToolError;
pub use registry::ToolRegistry;
pub use traits::{Tool, ToolDefinition, ToolResult, parse_params};
