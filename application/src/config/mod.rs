//! Application-level configuration.
//!
//! - [`AgentConfig`]: completion parameters for the decision and
//!   post-process calls, plus the registry [`RefreshPolicy`]

pub mod agent_config;

pub use agent_config::{AgentConfig, CompletionParams, RefreshPolicy, min_non_zero};
