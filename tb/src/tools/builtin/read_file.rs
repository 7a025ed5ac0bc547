//! ReadFile tool - read an inclusive line range from a file

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::Path;
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolError, parse_params};

/// Parameters for [`ReadFileTool`]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadFileParams {
    pub file_path: String,

    /// Zero-based first line
    #[serde(alias = "startLineNumberBaseZero")]
    pub start_line: usize,

    /// Zero-based last line (inclusive); defaults to the end of the file
    #[serde(default, alias = "endLineNumberBaseZero")]
    pub end_line: Option<usize>,
}

/// Read specific lines from a file
pub struct ReadFileTool;

impl ReadFileTool {
    /// Read lines `[start_line, end_line]` of the file, clamping an overlong end
    pub async fn read(&self, params: &ReadFileParams, ctx: &ToolContext) -> Result<String, ToolError> {
        debug!(?params, "ReadFileTool::read: called");
        let full_path = ctx.guard(Path::new(&params.file_path))?;

        let data = tokio::fs::read(&full_path)
            .await
            .map_err(|e| ToolError::io(format!("reading {}", full_path.display()), e))?;
        let content = String::from_utf8_lossy(&data);

        slice_lines(&content, params.start_line, params.end_line)
    }
}

/// Join lines `[start, end]` of `content`; lines are the pieces between `\n`
fn slice_lines(content: &str, start: usize, end: Option<usize>) -> Result<String, ToolError> {
    let lines: Vec<&str> = content.split('\n').collect();
    let total = lines.len();

    if start >= total {
        debug!(%start, %total, "slice_lines: start out of range");
        return Err(ToolError::LineOutOfRange { start, total });
    }

    let last = end.map_or(total - 1, |end| end.min(total - 1));
    if last < start {
        debug!(%start, %last, "slice_lines: empty range");
        return Ok(String::new());
    }

    debug!(%start, %last, %total, "slice_lines: returning range");
    Ok(lines[start..=last].join("\n"))
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "ReadFile"
    }

    fn description(&self) -> &str {
        "Read specific lines from a file in the codebase. Use this tool when you know the file path and want \
         to inspect only a section of the file to avoid loading large files in full. This is useful for \
         reviewing implementations, extracting function or class definitions, or confirming assumptions \
         about code structure."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filePath": {
                    "type": "string",
                    "description": "Path to the file to read."
                },
                "startLine": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Start line number (0-based) to read from the file."
                },
                "endLine": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "End line number (0-based, inclusive). If not specified, reads until the end of the file."
                }
            },
            "required": ["filePath", "startLine"]
        })
    }

    async fn call(&self, input: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let params: ReadFileParams = parse_params(self.name(), input)?;
        Ok(Value::String(self.read(&params, ctx).await?))
    }
}
