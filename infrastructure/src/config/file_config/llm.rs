//! LLM provider configuration from TOML (`[llm]` and `[post_process]` sections)

use conductor_application::config::agent_config::{
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_POST_PROCESS_MAX_TOKENS,
    DEFAULT_POST_PROCESS_TEMPERATURE, DEFAULT_TEMPERATURE,
};
use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat-completion provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    /// Base URL of the API (default: "https://api.openai.com/v1").
    pub base_url: String,
    /// Direct API key (prefer the env var).
    pub api_key: Option<String>,
    /// Environment variable holding the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Model used for the decision and post-process calls.
    pub model: String,
    /// Max tokens for the decision call.
    pub max_tokens: u32,
    /// Sampling temperature for the decision call.
    pub temperature: f32,
    /// HTTP timeout for one completion request.
    pub timeout_seconds: Option<u64>,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_seconds: None,
        }
    }
}

impl FileLlmConfig {
    /// The API key from the config file, or else from `api_key_env`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

/// Post-process call settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePostProcessConfig {
    /// Upper bound on tokens; the effective value is never above `llm.max_tokens`.
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for FilePostProcessConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_POST_PROCESS_MAX_TOKENS,
            temperature: DEFAULT_POST_PROCESS_TEMPERATURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_deserialize_partial() {
        let toml_str = r#"
[llm]
model = "gpt-4o"
base_url = "http://localhost:11434/v1"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.base_url, "http://localhost:11434/v1");
        assert_eq!(config.llm.max_tokens, 1000);
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_resolve_api_key_prefers_file_value() {
        let config = FileLlmConfig {
            api_key: Some("sk-from-file".to_string()),
            api_key_env: "CONDUCTOR_TEST_UNSET_KEY_VAR".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-from-file"));
    }

    #[test]
    fn test_resolve_api_key_missing() {
        let config = FileLlmConfig {
            api_key: Some("   ".to_string()),
            api_key_env: "CONDUCTOR_TEST_UNSET_KEY_VAR".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key(), None);
    }
}
