//! MCP (Model Context Protocol) server for graphscout.
//!
//! Provides a JSON-RPC 2.0 interface over stdio so that AI assistants can
//! resolve element references and run hybrid searches interactively.

/// MCP server implementation.
pub mod server;

/// Tool definitions and dispatch.
pub mod tools;

/// JSON-RPC 2.0 transport types.
pub mod transport;

pub use server::McpServer;
pub use tools::{get_tool_definitions, handle_tool_call, outcome_json, ToolDefinition};
pub use transport::{ErrorCode, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
