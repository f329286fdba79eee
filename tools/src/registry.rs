//! Tool registry used by the MCP server
//!
//! Tools are registered once at startup and looked up by name for every
//! `tools/call`.

use crate::tool::{Tool, ToolError, ToolExecutorFn, ToolResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

const POISONED: &str = "Tool registry lock poisoned - indicates a panic in another thread";

/// Thread-safe tool registry
///
/// ## Example
///
/// ```ignore
/// use slack_lists_tools::{ListsToolContext, ToolRegistry, register_list_tools};
///
/// let registry = ToolRegistry::new();
/// register_list_tools(&registry, &context);
///
/// let result = registry
///     .execute("get_list_items", r#"{"list_id": "F1234ABCD"}"#.to_string())
///     .await;
/// ```
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Arc<RwLock<HashMap<String, (Tool, ToolExecutorFn)>>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a tool with its executor
    ///
    /// Returns `true` if a tool with the same name was replaced.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[allow(clippy::expect_used)]
    pub fn register(&self, tool: Tool, executor: ToolExecutorFn) -> bool {
        let mut tools = self.tools.write().expect(POISONED);
        tools.insert(tool.name.clone(), (tool, executor)).is_some()
    }

    /// Execute a tool by name with raw JSON arguments
    ///
    /// # Errors
    ///
    /// Returns `ToolError` if the tool is not found or execution fails
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[allow(clippy::expect_used)]
    pub async fn execute(&self, name: &str, input: String) -> ToolResult {
        // Release the lock before awaiting the tool
        let executor = {
            let tools = self.tools.read().expect(POISONED);
            tools.get(name).map(|(_, executor)| executor.clone())
        };

        match executor {
            Some(executor) => executor(input).await,
            None => Err(ToolError::unknown_tool(name)),
        }
    }

    /// Names of all registered tools, sorted
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn list_tools(&self) -> Vec<String> {
        let tools = self.tools.read().expect(POISONED);
        let mut names: Vec<String> = tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// All registered tool definitions, sorted by name
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn get_tools(&self) -> Vec<Tool> {
        let tools = self.tools.read().expect(POISONED);
        let mut tool_list: Vec<Tool> = tools.values().map(|(tool, _)| tool.clone()).collect();
        tool_list.sort_by(|a, b| a.name.cmp(&b.name));
        tool_list
    }

    /// Whether a tool named `name` is registered
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.read().expect(POISONED).contains_key(name)
    }

    /// Number of registered tools
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn count(&self) -> usize {
        self.tools.read().expect(POISONED).len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
