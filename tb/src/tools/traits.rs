//! Tool trait definition

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{ToolContext, ToolError};

/// A tool that can be called by the LLM
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (matches LLM tool_use name)
    fn name(&self) -> &str;

    /// Human-readable description presented to the model
    fn description(&self) -> &str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool, returning its structured success value
    async fn call(&self, input: Value, ctx: &ToolContext) -> Result<Value, ToolError>;
}

/// Deserialize tool input into its typed parameter struct
pub fn parse_params<T: DeserializeOwned>(tool: &str, input: Value) -> Result<T, ToolError> {
    serde_json::from_value(input).map_err(|e| {
        debug!(%tool, %e, "parse_params: invalid input");
        ToolError::Validation(format!("invalid parameters for {}: {}", tool, e))
    })
}

/// What the orchestrator shows the model for one tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Model-facing result of a tool execution
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(content: impl Into<String>) -> Self {
        debug!("ToolResult::success: called");
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    /// Create an error result
    pub fn error(content: impl Into<String>) -> Self {
        debug!("ToolResult::error: called");
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

impl From<Result<Value, ToolError>> for ToolResult {
    fn from(result: Result<Value, ToolError>) -> Self {
        match result {
            // Plain text results (ReadFile) go through unquoted
            Ok(Value::String(text)) => Self::success(text),
            Ok(value) => Self::success(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())),
            Err(e) => Self::error(e.to_string()),
        }
    }
}
