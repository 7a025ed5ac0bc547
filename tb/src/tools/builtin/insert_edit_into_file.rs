//! InsertEditIntoFile tool - replace a file's entire contents

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::Path;
use tracing::{debug, info};

use crate::tools::{Tool, ToolContext, ToolError, parse_params};

/// Parameters for [`InsertEditIntoFileTool`]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertEditParams {
    pub file_path: String,
    pub content: String,

    /// Why the edit is made; recorded in logs only
    #[serde(default)]
    pub explanation: String,
}

/// Write content to a file, creating parent directories if needed
pub struct InsertEditIntoFileTool;

impl InsertEditIntoFileTool {
    /// Overwrite the file with `params.content`
    pub async fn write(&self, params: &InsertEditParams, ctx: &ToolContext) -> Result<(), ToolError> {
        debug!(path = %params.file_path, content_len = %params.content.len(), "InsertEditIntoFileTool::write: called");

        // Sandbox check happens before any directory is created
        let full_path = ctx.guard(Path::new(&params.file_path))?;

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ToolError::io(format!("creating directories for {}", full_path.display()), e))?;
        }
        debug!("InsertEditIntoFileTool::write: parent directories ensured");

        tokio::fs::write(&full_path, &params.content)
            .await
            .map_err(|e| ToolError::io(format!("writing to {}", full_path.display()), e))?;

        info!(
            path = %full_path.display(),
            bytes = %params.content.len(),
            explanation = %params.explanation,
            "InsertEditIntoFileTool::write: file written"
        );
        Ok(())
    }
}

#[async_trait]
impl Tool for InsertEditIntoFileTool {
    fn name(&self) -> &str {
        "InsertEditIntoFile"
    }

    fn description(&self) -> &str {
        "Insert or edit a file in the codebase. The provided content replaces the entire file, so always \
         supply the complete desired contents. Parent directories are created as needed. Use this tool for \
         code modifications, new files, or configuration updates."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "explanation": {
                    "type": "string",
                    "description": "A short explanation of the edit being made."
                },
                "filePath": {
                    "type": "string",
                    "description": "Path to the file to edit."
                },
                "content": {
                    "type": "string",
                    "description": "The new content that will replace the entire file."
                }
            },
            "required": ["filePath", "content"]
        })
    }

    async fn call(&self, input: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let params: InsertEditParams = parse_params(self.name(), input)?;
        self.write(&params, ctx).await?;
        Ok(json!({ "status": "completed" }))
    }
}
