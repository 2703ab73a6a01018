//! Agent parameters: what the pipeline sends to the model and when it
//! refreshes the tool registry.
//!
//! [`AgentConfig`] is built by the infrastructure config loader and handed
//! to [`ProcessRequestUseCase`](crate::use_cases::process_request::ProcessRequestUseCase).

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_POST_PROCESS_MAX_TOKENS: u32 = 700;
pub const DEFAULT_POST_PROCESS_TEMPERATURE: f32 = 0.3;

/// Parameters for one chat-completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionParams {
    pub fn new(model: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            temperature,
        }
    }
}

/// When the tool registry is refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Refresh once when the agent starts; an unreachable server leaves
    /// the registry empty.
    #[default]
    Once,
    /// Refresh at the start of every request; an unreachable server fails
    /// that request.
    PerRequest,
}

impl RefreshPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshPolicy::Once => "once",
            RefreshPolicy::PerRequest => "per_request",
        }
    }
}

impl std::fmt::Display for RefreshPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RefreshPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "once" => Ok(RefreshPolicy::Once),
            "per_request" => Ok(RefreshPolicy::PerRequest),
            _ => Err(format!("unknown refresh policy: {}", s)),
        }
    }
}

/// Pipeline configuration.
///
/// # Post-process parameters
///
/// The post-process call uses the decision model with its own token budget
/// and temperature. Its effective `max_tokens` is the smaller non-zero value
/// of the decision budget and the post-process budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Parameters of the intent decision call
    pub decision: CompletionParams,
    /// Parameters of the post-process call
    pub post_process: CompletionParams,
    pub refresh: RefreshPolicy,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE)
    }
}

impl AgentConfig {
    pub fn new(model: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        let model = model.into();
        Self {
            post_process: CompletionParams::new(
                model.clone(),
                min_non_zero(max_tokens, DEFAULT_POST_PROCESS_MAX_TOKENS),
                DEFAULT_POST_PROCESS_TEMPERATURE,
            ),
            decision: CompletionParams::new(model, max_tokens, temperature),
            refresh: RefreshPolicy::default(),
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_post_process(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.post_process.max_tokens = min_non_zero(self.decision.max_tokens, max_tokens);
        self.post_process.temperature = temperature;
        self
    }

    pub fn with_refresh(mut self, refresh: RefreshPolicy) -> Self {
        self.refresh = refresh;
        self
    }
}

/// `b` when `a` is zero, otherwise the smaller of the two.
pub fn min_non_zero(a: u32, b: u32) -> u32 {
    if a == 0 { b } else { a.min(b) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = AgentConfig::default();
        assert_eq!(config.decision.model, "gpt-4o-mini");
        assert_eq!(config.decision.max_tokens, 1000);
        assert_eq!(config.post_process.model, "gpt-4o-mini");
        assert_eq!(config.post_process.max_tokens, 700);
        assert_eq!(config.post_process.temperature, 0.3);
        assert_eq!(config.refresh, RefreshPolicy::Once);
    }

    #[test]
    fn test_post_process_budget_is_min_non_zero() {
        let small = AgentConfig::new("m", 300, 0.2);
        assert_eq!(small.post_process.max_tokens, 300);

        let custom = AgentConfig::new("m", 2000, 0.2).with_post_process(900, 0.5);
        assert_eq!(custom.post_process.max_tokens, 900);
        assert_eq!(custom.post_process.temperature, 0.5);
    }

    #[test]
    fn test_min_non_zero() {
        assert_eq!(min_non_zero(0, 700), 700);
        assert_eq!(min_non_zero(500, 700), 500);
        assert_eq!(min_non_zero(1000, 700), 700);
    }

    #[test]
    fn test_refresh_policy_parse() {
        assert_eq!("once".parse::<RefreshPolicy>(), Ok(RefreshPolicy::Once));
        assert_eq!(
            "per-request".parse::<RefreshPolicy>(),
            Ok(RefreshPolicy::PerRequest)
        );
        assert!("hourly".parse::<RefreshPolicy>().is_err());
        assert_eq!(RefreshPolicy::PerRequest.to_string(), "per_request");
    }
}
