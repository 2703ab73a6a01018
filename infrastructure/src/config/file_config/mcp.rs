//! Tool server configuration from TOML (`[mcp]` section)

use conductor_application::RefreshPolicy;
use serde::{Deserialize, Serialize};

/// MCP tool server configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMcpConfig {
    /// Endpoint URL of the streamable-HTTP server. No server means no tools.
    pub server: Option<String>,
    /// When to refresh the tool registry
    pub refresh: RefreshPolicy,
}

impl FileMcpConfig {
    /// The configured server, ignoring blank values
    pub fn server_url(&self) -> Option<&str> {
        self.server.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
