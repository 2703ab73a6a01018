//! Error types for the MCP adapter

use conductor_application::TransportError;
use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, McpError>;

/// Errors that can occur when talking to an MCP server
#[derive(Error, Debug)]
pub enum McpError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("JSON-RPC error (code {code}): {message}")]
    RpcError { code: i64, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Session expired")]
    SessionExpired,
}

impl From<McpError> for TransportError {
    fn from(err: McpError) -> Self {
        match err {
            McpError::Http(_) | McpError::SessionExpired => {
                TransportError::Unavailable(err.to_string())
            }
            McpError::Status { status, .. } if status >= 500 => {
                TransportError::Unavailable(err.to_string())
            }
            McpError::RpcError { .. } => TransportError::CallFailed(err.to_string()),
            McpError::Status { .. }
            | McpError::SerializationError(_)
            | McpError::UnexpectedResponse(_) => TransportError::Protocol(err.to_string()),
        }
    }
}
