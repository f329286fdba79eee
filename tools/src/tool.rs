//! Tool definitions and executor types

use serde::{Deserialize, Serialize};
use slack_lists_core::ListsError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Tool definition advertised to MCP hosts
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name
    pub name: String,
    /// What the tool does
    pub description: String,
    /// JSON Schema for the tool's arguments
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// Result of running a tool: JSON text on success
pub type ToolResult = Result<String, ToolError>;

/// Boxed future returned by a tool executor
pub type ToolFuture = Pin<Box<dyn Future<Output = ToolResult> + Send>>;

/// Tool executor: takes the raw JSON arguments
pub type ToolExecutorFn = Arc<dyn Fn(String) -> ToolFuture + Send + Sync>;

/// Tool execution error
///
/// Serializes as `{"error": kind, "message": message}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ToolError {
    /// Failure class, e.g. `validation_error`
    #[serde(rename = "error")]
    pub kind: String,
    /// Error message
    pub message: String,
}

impl ToolError {
    /// Arguments could not be parsed
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::from(ListsError::validation(message))
    }

    /// No tool is registered under `name`
    #[must_use]
    pub fn unknown_tool(name: &str) -> Self {
        Self {
            kind: "unknown_tool".to_string(),
            message: format!("Tool not found: {name}"),
        }
    }

    /// JSON body for an MCP `isError` result
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }
}

impl From<ListsError> for ToolError {
    fn from(err: ListsError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_body_shape() {
        let err = ToolError::from(ListsError::NotFound("list_not_found".to_string()));
        let body: serde_json::Value = serde_json::from_str(&err.to_json()).expect("valid JSON");
        assert_eq!(
            body,
            json!({"error": "not_found_error", "message": "Not found: list_not_found"})
        );
    }

    #[test]
    fn test_invalid_input_is_validation() {
        assert_eq!(ToolError::invalid_input("bad").kind, "validation_error");
    }

    #[test]
    fn test_tool_serializes_input_schema_camel_case() {
        let tool = Tool {
            name: "t".to_string(),
            description: "d".to_string(),
            input_schema: json!({"type": "object"}),
        };
        let value = serde_json::to_value(&tool).expect("serializable");
        assert!(value.get("inputSchema").is_some());
    }
}
