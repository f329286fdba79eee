//! Slack Lists tools for MCP hosts
//!
//! This crate exposes five tools as `(Tool, ToolExecutorFn)` pairs:
//!
//! - `create_list_item`: create one item with a title and typed fields
//! - `create_multiple_list_items`: paced, sequential bulk creation
//! - `get_list_items`: one page of items rendered as records
//! - `filter_list_items`: fetch and filter by one column
//! - `export_list_items`: export as JSON or CSV
//!
//! Every tool returns a JSON document on success and a [`ToolError`] with a
//! stable `kind` on failure.
//!
//! ## Modules
//!
//! - `tool`: tool definition, executor and error types
//! - `lists`: the list tools
//! - `input`: argument parsing helpers
//! - `registry`: tool registry for dispatch by name

pub mod input;
pub mod lists;
pub mod registry;
pub mod tool;

// Re-export commonly used types
pub use lists::{ListsToolContext, list_tools, register_list_tools};
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolError, ToolExecutorFn, ToolFuture, ToolResult};
