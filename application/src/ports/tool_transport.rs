//! Tool Transport port
//!
//! Defines the interface to the remote tool host: discovery and invocation
//! over a session that the application creates lazily and reuses.

use async_trait::async_trait;
use conductor_domain::ToolDefinition;
use thiserror::Error;

/// Errors that can occur talking to the tool host
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The host could not be reached or the session broke
    #[error("Tool server unavailable: {0}")]
    Unavailable(String),

    /// The host answered with something we could not understand
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The host rejected a single call
    #[error("Tool call failed: {0}")]
    CallFailed(String),

    #[error("Cancelled")]
    Cancelled,
}

impl TransportError {
    /// Whether the session should be dropped and re-created on next use
    pub fn is_session_lost(&self) -> bool {
        matches!(self, TransportError::Unavailable(_))
    }
}

/// What the host returned for one tool call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolCallOutput {
    /// The host flagged the call as failed
    pub is_error: bool,
    /// Text content parts, in order
    pub text_parts: Vec<String>,
    /// Optional structured payload
    pub structured: Option<serde_json::Value>,
}

impl ToolCallOutput {
    pub fn text(parts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            is_error: false,
            text_parts: parts.into_iter().map(Into::into).collect(),
            structured: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            text_parts: vec![message.into()],
            structured: None,
        }
    }

    pub fn with_structured(mut self, structured: serde_json::Value) -> Self {
        self.structured = Some(structured);
        self
    }

    /// Text parts joined by a blank line
    pub fn joined_text(&self) -> String {
        self.text_parts.join("\n\n")
    }
}

/// Factory for sessions to one tool host
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolTransport: Send + Sync {
    /// Where the tool host lives, for logging
    fn endpoint(&self) -> &str;

    /// Open a new session
    async fn connect(&self) -> Result<Box<dyn TransportSession>, TransportError>;
}

/// An open session with the tool host
#[async_trait]
pub trait TransportSession: Send + Sync {
    /// List every tool the host advertises
    async fn list_tools(&self) -> Result<Vec<ToolDefinition>, TransportError>;

    /// Invoke one tool
    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> Result<ToolCallOutput, TransportError>;

    /// Release the session
    async fn close(&self) -> Result<(), TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_text() {
        let output = ToolCallOutput::text(["Title: Rust", "Body"]);
        assert_eq!(output.joined_text(), "Title: Rust\n\nBody");
        assert!(!output.is_error);
    }

    #[test]
    fn test_session_lost() {
        assert!(TransportError::Unavailable("reset".into()).is_session_lost());
        assert!(!TransportError::CallFailed("bad".into()).is_session_lost());
    }
}
