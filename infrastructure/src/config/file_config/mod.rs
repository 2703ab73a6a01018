//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use application types where appropriate.

mod llm;
mod mcp;
mod output;
mod repl;

pub use llm::{FileLlmConfig, FilePostProcessConfig};
pub use mcp::FileMcpConfig;
pub use output::FileOutputConfig;
pub use repl::FileReplConfig;

use conductor_application::AgentConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("llm.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("llm.model cannot be empty")]
    EmptyModelName,

    #[error("{section}.max_tokens must be greater than 0")]
    InvalidMaxTokens { section: &'static str },

    #[error("{section}.temperature must be between 0 and 2, got {value}")]
    InvalidTemperature { section: &'static str, value: f32 },

    #[error("llm.base_url cannot be empty")]
    EmptyBaseUrl,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Chat-completion provider
    pub llm: FileLlmConfig,
    /// Post-process call settings
    pub post_process: FilePostProcessConfig,
    /// Tool server
    pub mcp: FileMcpConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(0) = self.llm.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if self.llm.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }

        if self.llm.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }

        for (section, max_tokens, temperature) in [
            ("llm", self.llm.max_tokens, self.llm.temperature),
            (
                "post_process",
                self.post_process.max_tokens,
                self.post_process.temperature,
            ),
        ] {
            if max_tokens == 0 {
                return Err(ConfigValidationError::InvalidMaxTokens { section });
            }
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigValidationError::InvalidTemperature {
                    section,
                    value: temperature,
                });
            }
        }

        Ok(())
    }

    /// Pipeline parameters for the application layer
    pub fn to_agent_config(&self) -> AgentConfig {
        AgentConfig::new(
            self.llm.model.trim(),
            self.llm.max_tokens,
            self.llm.temperature,
        )
        .with_post_process(self.post_process.max_tokens, self.post_process.temperature)
        .with_refresh(self.mcp.refresh)
    }
}
