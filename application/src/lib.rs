//! Application layer for conductor
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{AgentConfig, CompletionParams, RefreshPolicy};
pub use ports::{
    llm_gateway::{CompletionRequest, GatewayError, LlmGateway},
    progress::{NoProgress, ProcessProgressNotifier},
    tool_transport::{ToolCallOutput, ToolTransport, TransportError, TransportSession},
};
pub use use_cases::dispatch::{CallOutcome, DispatchReport, ToolDispatcher};
pub use use_cases::post_process::PostProcessor;
pub use use_cases::process_request::{ProcessError, ProcessOutput, ProcessRequestUseCase};
pub use use_cases::registry_cache::ToolRegistryCache;
pub use use_cases::resolve_intent::IntentResolver;
pub use use_cases::session::ToolSessionHandle;
