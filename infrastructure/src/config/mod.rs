//! Configuration file loading for conductor
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CONDUCTOR_*` environment variables
//! 2. `OPENAI_BASE_URL`, `OPENAI_MODEL`, `MCP_SERVER`
//! 3. `--config <path>` specified file
//! 4. Project root: `./conductor.toml` or `./.conductor.toml`
//! 5. Global: `$XDG_CONFIG_HOME/conductor/config.toml`
//! 6. Default values
//!
//! The API key is never read from the merged layers directly; see
//! [`FileLlmConfig::resolve_api_key`].

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileLlmConfig, FileMcpConfig, FileOutputConfig,
    FilePostProcessConfig, FileReplConfig,
};
pub use loader::ConfigLoader;
