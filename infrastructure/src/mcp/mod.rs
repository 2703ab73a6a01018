//! MCP tool server adapter
//!
//! Implements the [`ToolTransport`](conductor_application::ToolTransport)
//! port over the streamable-HTTP flavour of the Model Context Protocol.

pub mod error;
pub mod protocol;
pub mod transport;

pub use error::McpError;
pub use transport::McpHttpTransport;
