//! Infrastructure layer for conductor
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod llm;
pub mod mcp;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLlmConfig, FileMcpConfig,
    FileOutputConfig, FilePostProcessConfig, FileReplConfig,
};
pub use llm::{OpenAiConfig, OpenAiGateway};
pub use mcp::{McpError, McpHttpTransport};
