//! MCP server for the Slack Lists tools
//!
//! Speaks JSON-RPC 2.0 over one of two transports:
//!
//! - **stdio**: one message per line on stdin, one response per line on stdout
//! - **http**: `POST /mcp` with a single message body, plus `GET /health`
//!
//! Both transports share [`McpServer`], which answers `initialize`, `ping`,
//! `tools/list` and `tools/call` against a [`slack_lists_tools::ToolRegistry`].
//! Logs go to stderr so stdout stays reserved for protocol traffic.

pub mod config;
pub mod handler;
pub mod http;
pub mod protocol;
pub mod stdio;

pub use config::{ConfigError, DEFAULT_LOG_FILTER, ServerConfig, Transport};
pub use handler::McpServer;
pub use http::{router, serve_http};
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, ServerInfo};
pub use stdio::{run_stdio, serve_lines};
