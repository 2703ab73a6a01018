//! Tool domain value objects: execution results, failures and aggregation
//!
//! Every attempted [`ToolCall`](super::entities::ToolCall) produces exactly one
//! [`ToolExecutionResult`], whether it was rejected by validation, failed at
//! the transport, or succeeded. Results keep the order the calls were
//! proposed in.

use serde::{Deserialize, Serialize};

/// Why a single tool call did not succeed.
///
/// | Code | Raised by |
/// |------|-----------|
/// | `UNKNOWN_TOOL` | Validator: name not in the catalog |
/// | `MISSING_PARAMETER` | Validator: required argument absent |
/// | `TYPE_MISMATCH` | Validator: argument of the wrong kind |
/// | `EXECUTION_FAILED` | Dispatcher: transport error or tool-reported error |
/// | `CANCELLED` | Dispatcher: the request was cancelled mid-call |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolFailure {
    pub code: String,
    pub message: String,
}

impl ToolFailure {
    pub const UNKNOWN_TOOL: &'static str = "UNKNOWN_TOOL";
    pub const MISSING_PARAMETER: &'static str = "MISSING_PARAMETER";
    pub const TYPE_MISMATCH: &'static str = "TYPE_MISMATCH";
    pub const EXECUTION_FAILED: &'static str = "EXECUTION_FAILED";
    pub const CANCELLED: &'static str = "CANCELLED";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(Self::EXECUTION_FAILED, message)
    }

    pub fn cancelled() -> Self {
        Self::new(Self::CANCELLED, "Operation cancelled")
    }

    /// Whether the call was rejected before reaching the transport.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.code.as_str(),
            Self::UNKNOWN_TOOL | Self::MISSING_PARAMETER | Self::TYPE_MISMATCH
        )
    }
}

impl std::fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolFailure {}

/// Outcome of one attempted tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolExecutionResult {
    /// Name of the tool that was called
    pub tool_name: String,
    /// Whether the call succeeded
    pub success: bool,
    /// Text parts returned by the tool, joined with blank lines
    #[serde(default)]
    pub content: String,
    /// Structured payload, when the tool returned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured: Option<serde_json::Value>,
    /// Error detail for failed calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolFailure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ToolExecutionResult {
    pub fn success(tool_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            content: content.into(),
            structured: None,
            error: None,
            duration_ms: None,
        }
    }

    pub fn failure(tool_name: impl Into<String>, error: ToolFailure) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            content: String::new(),
            structured: None,
            error: Some(error),
            duration_ms: None,
        }
    }

    pub fn with_structured(mut self, structured: serde_json::Value) -> Self {
        self.structured = Some(structured);
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn error(&self) -> Option<&ToolFailure> {
        self.error.as_ref()
    }
}

/// Merge the text of every successful result, in call order.
///
/// Entries are separated by one blank line. Failed calls contribute nothing,
/// and neither do successes with empty content, so no stray separators appear.
pub fn aggregate_content(results: &[ToolExecutionResult]) -> String {
    results
        .iter()
        .filter(|r| r.success && !r.content.is_empty())
        .map(|r| r.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_skips_failures() {
        let results = vec![
            ToolExecutionResult::success("scrape_url", "A"),
            ToolExecutionResult::failure("scrape_url", ToolFailure::execution_failed("timeout")),
            ToolExecutionResult::success("summarize_content", "B"),
        ];

        assert_eq!(aggregate_content(&results), "A\n\nB");
    }

    #[test]
    fn test_aggregate_all_failed_is_empty() {
        let results = vec![ToolExecutionResult::failure(
            "scrape_url",
            ToolFailure::execution_failed("boom"),
        )];
        assert_eq!(aggregate_content(&results), "");
        assert_eq!(aggregate_content(&[]), "");
    }

    #[test]
    fn test_aggregate_ignores_empty_success() {
        let results = vec![
            ToolExecutionResult::success("a", "first"),
            ToolExecutionResult::success("b", ""),
            ToolExecutionResult::success("c", "third"),
        ];
        assert_eq!(aggregate_content(&results), "first\n\nthird");
    }

    #[test]
    fn test_failure_result() {
        let result = ToolExecutionResult::failure(
            "scrape_url",
            ToolFailure::new(ToolFailure::MISSING_PARAMETER, "missing 'url'"),
        );

        assert!(!result.is_success());
        assert!(result.content.is_empty());
        assert!(result.error().unwrap().is_validation());
        assert_eq!(result.error().unwrap().to_string(), "[MISSING_PARAMETER] missing 'url'");
    }

    #[test]
    fn test_execution_failure_is_not_validation() {
        assert!(!ToolFailure::execution_failed("down").is_validation());
        assert!(!ToolFailure::cancelled().is_validation());
    }
}
