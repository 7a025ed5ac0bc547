//! ToolRegistry - ordered catalog of tools for a session

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::builtin::{InsertEditIntoFileTool, ReadFileTool, RunInTerminalTool, SearchFilesTool};
use super::{Tool, ToolContext, ToolDefinition, ToolError, ToolResult};

/// Ordered set of tools; lookups accept any casing of a tool's name
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create registry with the standard tools
    pub fn standard() -> Self {
        Self::with_terminal(RunInTerminalTool::new())
    }

    /// Standard tools, with RunInTerminal describing the runtimes found on this host
    pub fn standard_with_runtime_probe() -> Self {
        Self::with_terminal(RunInTerminalTool::with_runtime_probe())
    }

    fn with_terminal(terminal: RunInTerminalTool) -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(ReadFileTool));
        registry.register(Arc::new(terminal));
        registry.register(Arc::new(InsertEditIntoFileTool));
        registry.register(Arc::new(SearchFilesTool));
        registry
    }

    /// Create an empty registry (for testing)
    pub fn empty() -> Self {
        Self { tools: Vec::new() }
    }

    /// Append a tool, replacing any existing tool with the same name in place
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        debug!(name = %tool.name(), "ToolRegistry::register: called");
        match self.position(tool.name()) {
            Some(index) => self.tools[index] = tool,
            None => self.tools.push(tool),
        }
    }

    /// Subset of this registry, in registry order; empty `names` keeps everything
    ///
    /// Unknown names are ignored.
    pub fn select(&self, names: &[String]) -> Self {
        debug!(?names, "ToolRegistry::select: called");
        if names.is_empty() {
            return self.clone();
        }

        let wanted: Vec<String> = names.iter().map(|n| snake_case(n)).collect();
        for (name, normalized) in names.iter().zip(&wanted) {
            if self.position(normalized).is_none() {
                warn!(%name, "ToolRegistry::select: ignoring unknown tool");
            }
        }

        let tools = self
            .tools
            .iter()
            .filter(|t| wanted.contains(&snake_case(t.name())))
            .cloned()
            .collect();
        Self { tools }
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.position(name).map(|index| &self.tools[index])
    }

    /// Tool names in registry order
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get tool definitions for the model
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    /// Run a tool, returning its structured value or typed error
    pub async fn dispatch(&self, name: &str, input: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        debug!(%name, "ToolRegistry::dispatch: called");
        let Some(tool) = self.get(name) else {
            debug!(%name, "ToolRegistry::dispatch: unknown tool");
            return Err(ToolError::UnknownTool { name: name.to_string() });
        };

        let result = tool.call(input, ctx).await;
        match &result {
            Ok(_) => info!(tool = %tool.name(), "ToolRegistry::dispatch: succeeded"),
            Err(e) => info!(tool = %tool.name(), error = %e, "ToolRegistry::dispatch: failed"),
        }
        result
    }

    /// Run a tool and render the outcome for the model
    pub async fn execute(&self, name: &str, input: Value, ctx: &ToolContext) -> ToolResult {
        ToolResult::from(self.dispatch(name, input, ctx).await)
    }

    fn position(&self, name: &str) -> Option<usize> {
        let wanted = snake_case(name);
        self.tools.iter().position(|t| snake_case(t.name()) == wanted)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry").field("tools", &self.names()).finish()
    }
}

/// `ReadFile`, `readFile` and `read_file` all become `read_file`
fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c == '-' || c == ' ' {
            out.push('_');
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_standard_registry_order() {
        let registry = ToolRegistry::standard();
        assert_eq!(
            registry.names(),
            vec!["ReadFile", "RunInTerminal", "InsertEditIntoFile", "SearchFiles"]
        );
    }

    #[test]
    fn test_select_empty_returns_all() {
        let registry = ToolRegistry::standard();
        assert_eq!(registry.select(&[]).len(), 4);
    }

    #[test]
    fn test_select_keeps_registry_order() {
        let registry = ToolRegistry::standard();
        let selected = registry.select(&strings(&["SearchFiles", "ReadFile"]));
        assert_eq!(selected.names(), vec!["ReadFile", "SearchFiles"]);
    }

    #[test]
    fn test_select_ignores_unknown_and_normalizes_case() {
        let registry = ToolRegistry::standard();
        let selected = registry.select(&strings(&["read_file", "runInTerminal", "Bogus"]));
        assert_eq!(selected.names(), vec!["ReadFile", "RunInTerminal"]);

        let none = registry.select(&strings(&["Bogus"]));
        assert!(none.is_empty());
    }

    #[test]
    fn test_definitions_match_tools() {
        let registry = ToolRegistry::standard();
        let defs = registry.definitions();

        assert_eq!(defs.len(), 4);
        assert_eq!(defs[0].name, "ReadFile");
        assert_eq!(defs[0].input_schema["type"], "object");
        assert!(defs.iter().all(|d| !d.description.is_empty()));
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ToolRegistry::standard();
        registry.register(Arc::new(ReadFileTool));
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.names()[0], "ReadFile");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("ReadFile"), "read_file");
        assert_eq!(snake_case("readFile"), "read_file");
        assert_eq!(snake_case("read_file"), "read_file");
        assert_eq!(snake_case("InsertEditIntoFile"), "insert_edit_into_file");
        assert_eq!(snake_case("search-files"), "search_files");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::new(temp.path().to_path_buf());
        let registry = ToolRegistry::standard();

        let result = registry.dispatch("DeleteEverything", json!({}), &ctx).await;
        assert!(matches!(result, Err(ToolError::UnknownTool { .. })));

        let result = registry.execute("DeleteEverything", json!({}), &ctx).await;
        assert!(result.is_error);
        assert!(result.content.contains("DeleteEverything"));
    }

    #[tokio::test]
    async fn test_dispatch_not_in_selection() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::new(temp.path().to_path_buf());
        let registry = ToolRegistry::standard().select(&strings(&["ReadFile"]));

        let result = registry
            .dispatch("RunInTerminal", json!({"command": ["true"]}), &ctx)
            .await;
        assert!(matches!(result, Err(ToolError::UnknownTool { .. })));
    }

    #[tokio::test]
    async fn test_execute_read_file() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("notes.txt"), "zero\none\ntwo").unwrap();
        let ctx = ToolContext::new(temp.path().to_path_buf());
        let registry = ToolRegistry::standard();

        let result = registry
            .execute("ReadFile", json!({"filePath": "notes.txt", "startLine": 1, "endLine": 2}), &ctx)
            .await;

        assert!(!result.is_error);
        assert_eq!(result.content, "one\ntwo");
    }

    #[tokio::test]
    async fn test_execute_reports_sandbox_violation() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::new(temp.path().to_path_buf());
        let registry = ToolRegistry::standard();

        let result = registry
            .execute("InsertEditIntoFile", json!({"filePath": "/etc/evil", "content": "x"}), &ctx)
            .await;

        assert!(result.is_error);
        assert!(result.content.contains("outside of sandbox root"));
    }
}
