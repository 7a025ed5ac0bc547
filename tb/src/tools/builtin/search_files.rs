//! SearchFiles tool - case-insensitive text search across many files

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::search::{FileSelector, SearchEngine, SearchQuery, SearchResponse};
use crate::tools::{Tool, ToolContext, ToolError, parse_params};

/// Parameters for [`SearchFilesTool`]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilesParams {
    pub query: String,

    #[serde(default = "default_directory")]
    pub directory: String,

    #[serde(default)]
    pub files: Vec<String>,
}

fn default_directory() -> String {
    ".".to_string()
}

impl From<SearchFilesParams> for SearchQuery {
    fn from(params: SearchFilesParams) -> Self {
        SearchQuery::new(params.query)
            .in_directory(params.directory)
            .with_files(params.files)
    }
}

/// Search files for the first line containing a query
pub struct SearchFilesTool;

impl SearchFilesTool {
    /// Resolve the scope, then scan it with the session's worker cap and cancellation token
    pub async fn search(&self, query: &SearchQuery, ctx: &ToolContext) -> Result<SearchResponse, ToolError> {
        debug!(query = %query.query, directory = ?query.directory, files = ?query.files, "SearchFilesTool::search: called");

        if query.query.is_empty() {
            return Err(ToolError::Validation("query cannot be empty".to_string()));
        }

        let base = ctx.guard(&query.directory)?;
        let candidates = FileSelector::new(ctx).select(&base, &query.files)?;
        debug!(candidates = %candidates.len(), "SearchFilesTool::search: scope resolved");

        let response = SearchEngine::with_max_workers(ctx.max_search_workers)
            .search(&query.query, candidates, &ctx.cancel)
            .await?;

        info!(
            query = %query.query,
            total_files = %response.total_files,
            files_matched = %response.files_matched,
            "SearchFilesTool::search: done"
        );
        Ok(response)
    }
}

#[async_trait]
impl Tool for SearchFilesTool {
    fn name(&self) -> &str {
        "SearchFiles"
    }

    fn description(&self) -> &str {
        "Search for text across files. Matching is case-insensitive and reports only the first matching \
         line of each file, with its line number, the byte offset of the match, file size and modification \
         time. Search a whole directory, or restrict the search to specific files and glob patterns. \
         Hidden files and directories are skipped."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search term to look for in files."
                },
                "directory": {
                    "type": "string",
                    "description": "The directory to search in. Defaults to current directory if not specified."
                },
                "files": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Optional list of specific file paths or glob patterns to search \
                                    (e.g., ['main.go', '**/*.md', 'src/**/*.js']). If specified, only these \
                                    files/patterns will be searched."
                }
            },
            "required": ["query"]
        })
    }

    async fn call(&self, input: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let params: SearchFilesParams = parse_params(self.name(), input)?;
        let response = self.search(&params.into(), ctx).await?;
        Ok(serde_json::to_value(response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn fixture() -> TempDir {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("a.txt"), "alpha\nBETA\n").unwrap();
        fs::write(root.join("b.txt"), "gamma\n").unwrap();
        fs::write(root.join("docs/guide.md"), "# Guide\nbeta testing notes\n").unwrap();
        fs::write(root.join(".hidden"), "beta").unwrap();
        temp
    }

    #[tokio::test]
    async fn test_search_directory() {
        let temp = fixture();
        let ctx = ToolContext::new(temp.path().to_path_buf());

        let value = SearchFilesTool.call(json!({"query": "beta"}), &ctx).await.unwrap();

        assert_eq!(value["totalFiles"], 3);
        assert_eq!(value["filesMatched"], 2);
        assert_eq!(value["results"].as_array().unwrap().len(), 2);
        assert!(value["duration"].is_string());
    }

    #[tokio::test]
    async fn test_search_restricted_to_files() {
        let temp = fixture();
        let ctx = ToolContext::new(temp.path().to_path_buf());

        let value = SearchFilesTool
            .call(json!({"query": "beta", "files": ["a.txt", "b.txt"]}), &ctx)
            .await
            .unwrap();

        assert_eq!(value["totalFiles"], 2);
        assert_eq!(value["filesMatched"], 1);
        let result = &value["results"][0];
        assert_eq!(result["lineNumber"], 2);
        assert_eq!(result["lineContent"], "BETA");
        assert_eq!(result["foundAt"], 0);
        assert_eq!(result["fileSize"], 11);
    }

    #[tokio::test]
    async fn test_search_with_glob() {
        let temp = fixture();
        let ctx = ToolContext::new(temp.path().to_path_buf());

        let query = SearchQuery::new("BETA").with_files(["**/*.md"]);
        let response = SearchFilesTool.search(&query, &ctx).await.unwrap();

        assert_eq!(response.total_files, 1);
        assert_eq!(response.results[0].line_number, 2);
        assert_eq!(response.results[0].found_at, 0);
        assert!(response.results[0].file_path.ends_with("docs/guide.md"));
    }

    #[tokio::test]
    async fn test_search_subdirectory() {
        let temp = fixture();
        let ctx = ToolContext::new(temp.path().to_path_buf());

        let value = SearchFilesTool
            .call(json!({"query": "notes", "directory": "docs"}), &ctx)
            .await
            .unwrap();

        assert_eq!(value["totalFiles"], 1);
        assert_eq!(value["filesMatched"], 1);
        assert_eq!(value["results"][0]["foundAt"], 13);
    }

    #[tokio::test]
    async fn test_empty_query_is_validation_error() {
        let temp = fixture();
        let ctx = ToolContext::new(temp.path().to_path_buf());

        let result = SearchFilesTool.call(json!({"query": ""}), &ctx).await;
        assert!(matches!(result, Err(ToolError::Validation(_))));

        let result = SearchFilesTool.call(json!({"directory": "."}), &ctx).await;
        assert!(matches!(result, Err(ToolError::Validation(_))));
    }

    #[tokio::test]
    async fn test_directory_outside_sandbox() {
        let temp = fixture();
        let ctx = ToolContext::new(temp.path().join("docs"));

        let result = SearchFilesTool.call(json!({"query": "beta", "directory": ".."}), &ctx).await;
        assert!(matches!(result, Err(ToolError::SandboxViolation { .. })));
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let temp = fixture();
        let ctx = ToolContext::new(temp.path().to_path_buf());

        let result = SearchFilesTool
            .call(json!({"query": "beta", "directory": "missing"}), &ctx)
            .await;
        assert!(matches!(result, Err(ToolError::Io { .. })));
    }

    #[tokio::test]
    async fn test_no_matches() {
        let temp = fixture();
        let ctx = ToolContext::new(temp.path().to_path_buf());

        let value = SearchFilesTool.call(json!({"query": "zeta"}), &ctx).await.unwrap();

        assert_eq!(value["totalFiles"], 3);
        assert_eq!(value["filesMatched"], 0);
        assert_eq!(value["results"], json!([]));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_non_utf8_file_name_does_not_fail_search() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = tempdir().unwrap();
        fs::write(temp.path().join("good.txt"), "needle").unwrap();
        fs::write(temp.path().join(OsStr::from_bytes(b"bad\xff.txt")), "needle").unwrap();
        let ctx = ToolContext::new(temp.path().to_path_buf());

        let value = SearchFilesTool.call(json!({"query": "needle"}), &ctx).await.unwrap();

        assert_eq!(value["totalFiles"], 2);
        assert_eq!(value["filesMatched"], 2);
        let names: Vec<&str> = value["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["filePath"].as_str().unwrap())
            .collect();
        assert!(names.iter().any(|n| n.ends_with("bad\u{fffd}.txt")));
        assert!(names.iter().any(|n| n.ends_with("good.txt")));
    }
}
