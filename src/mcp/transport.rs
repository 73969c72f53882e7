//! JSON-RPC 2.0 message types for the MCP stdio server.

use serde::{Deserialize, Serialize};

use crate::errors::GraphScoutError;

/// A JSON-RPC 2.0 request received from the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version; must be `"2.0"`.
    pub jsonrpc: String,
    /// Request identifier: a number or a string. Null or absent for
    /// notifications.
    #[serde(default)]
    pub id: serde_json::Value,
    /// The RPC method name, e.g. `tools/call`.
    pub method: String,
    /// Method parameters; `tools/call` carries `name` and `arguments`.
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    /// Notifications carry no id and expect no response.
    pub fn is_notification(&self) -> bool {
        self.id.is_null()
    }
}

/// A JSON-RPC 2.0 response sent back to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version; always `"2.0"`.
    pub jsonrpc: String,
    /// Identifier of the request being answered.
    pub id: serde_json::Value,
    /// The method's result; absent on error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// The failure; absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Creates a successful JSON-RPC response.
    pub fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Creates an error JSON-RPC response.
    pub fn error(id: serde_json::Value, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: code.as_i32(),
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Creates an error response for a failed tool call.
    pub fn from_tool_error(id: serde_json::Value, err: &GraphScoutError) -> Self {
        Self::error(
            id,
            ErrorCode::for_error(err),
            format!("tool execution failed: {err}"),
        )
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Numeric error code, see [`ErrorCode`].
    pub code: i32,
    /// Human-readable error message.
    pub message: String,
    /// Optional structured detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Standard JSON-RPC 2.0 error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The line was not valid JSON.
    ParseError,
    /// The JSON was not a valid JSON-RPC request.
    InvalidRequest,
    /// No handler exists for the method.
    MethodNotFound,
    /// Missing or malformed method or tool parameters.
    InvalidParams,
    /// A tool failed for any other reason.
    InternalError,
}

impl ErrorCode {
    /// Returns the numeric error code as defined by JSON-RPC 2.0.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
        }
    }

    /// Picks the code a tool error is reported with.
    pub fn for_error(err: &GraphScoutError) -> Self {
        match err {
            GraphScoutError::InvalidArgument { .. } => Self::InvalidParams,
            _ => Self::InternalError,
        }
    }
}
