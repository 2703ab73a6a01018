//! The structured decision the model makes for one request

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};

/// Message shown when the model's reply could not be understood
pub const FALLBACK_MESSAGE: &str = "I understand your request, but I had trouble determining \
    the best approach. Could you please rephrase your request?";

/// Explanation attached to the fallback decision
pub const FALLBACK_EXPLANATION: &str = "failed to parse decision";

/// Confidence attached to the fallback decision
pub const FALLBACK_CONFIDENCE: f64 = 0.1;

/// What the model decided to do about a user request.
///
/// Mirrors the JSON reply contract:
///
/// ```json
/// {
///   "message": "string",
///   "tool_calls": [{"name": "string", "arguments": {}, "reasoning": "string"}],
///   "should_call": true,
///   "confidence": 0.9,
///   "explanation": "string",
///   "post_process": "Summarize"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentDecision {
    pub message: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    pub should_call: bool,
    /// Always within `[0, 1]`
    pub confidence: f64,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_process: Option<String>,
}

impl IntentDecision {
    /// A decision that proposes no tools.
    pub fn no_tools(message: impl Into<String>, confidence: f64) -> Self {
        Self {
            message: message.into(),
            tool_calls: Vec::new(),
            should_call: false,
            confidence: confidence.clamp(0.0, 1.0),
            explanation: String::new(),
            post_process: None,
        }
    }

    /// The fixed decision returned when the model's reply is malformed.
    pub fn fallback() -> Self {
        Self {
            message: FALLBACK_MESSAGE.to_string(),
            tool_calls: Vec::new(),
            should_call: false,
            confidence: FALLBACK_CONFIDENCE,
            explanation: FALLBACK_EXPLANATION.to_string(),
            post_process: None,
        }
    }

    pub fn with_call(mut self, call: ToolCall) -> Self {
        self.tool_calls.push(call);
        self.should_call = true;
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_post_process(mut self, verb: impl Into<String>) -> Self {
        self.post_process = Some(verb.into());
        self
    }

    /// Whether any tool should actually run.
    ///
    /// `should_call` with an empty call list is a no-op, not an error.
    pub fn wants_tools(&self) -> bool {
        self.should_call && !self.tool_calls.is_empty()
    }

    /// The post-process verb, trimmed; `None` when absent or blank.
    pub fn post_process_verb(&self) -> Option<&str> {
        self.post_process
            .as_deref()
            .map(str::trim)
            .filter(|verb| !verb.is_empty())
    }

    pub fn is_fallback(&self) -> bool {
        !self.should_call
            && self.explanation == FALLBACK_EXPLANATION
            && self.confidence == FALLBACK_CONFIDENCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_shape() {
        let decision = IntentDecision::fallback();
        assert!(!decision.should_call);
        assert_eq!(decision.confidence, 0.1);
        assert_eq!(decision.explanation, "failed to parse decision");
        assert!(decision.message.contains("rephrase"));
        assert!(decision.is_fallback());
    }

    #[test]
    fn test_should_call_without_calls_is_noop() {
        let mut decision = IntentDecision::no_tools("hi", 0.9);
        decision.should_call = true;
        assert!(!decision.wants_tools());

        let decision = decision.with_call(ToolCall::new("scrape_url"));
        assert!(decision.wants_tools());
    }

    #[test]
    fn test_post_process_verb_trimmed() {
        let decision = IntentDecision::no_tools("m", 1.0).with_post_process("  Summarize ");
        assert_eq!(decision.post_process_verb(), Some("Summarize"));

        let blank = IntentDecision::no_tools("m", 1.0).with_post_process("   ");
        assert_eq!(blank.post_process_verb(), None);
    }

    #[test]
    fn test_no_tools_clamps_confidence() {
        assert_eq!(IntentDecision::no_tools("m", 4.0).confidence, 1.0);
        assert_eq!(IntentDecision::no_tools("m", -1.0).confidence, 0.0);
    }
}
