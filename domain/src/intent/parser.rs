//! Decision parsing from model replies.
//!
//! The model is asked for a bare JSON object, but its reply is untrusted
//! text. [`parse_decision`] is the single fallible boundary: it strips one
//! surrounding code fence, parses JSON, checks required fields, and
//! normalizes the result. Callers that must never fail use
//! [`IntentDecision::fallback`] on `Err`.

use super::decision::IntentDecision;
use crate::tool::entities::ToolCall;
use crate::tool::value::ArgValue;
use thiserror::Error;

/// Why a model reply could not be turned into a decision
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionParseError {
    #[error("reply is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("reply is not a JSON object")]
    NotAnObject,

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' {reason}")]
    InvalidField { field: String, reason: &'static str },
}

/// Strip exactly one leading and one trailing code fence.
///
/// The opening fence may carry an info string (` ```json `). Replies
/// without a fence are returned trimmed.
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string up to the end of the fence line
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        // Single-line fence: the info string ends at the first non-word char
        None => rest
            .trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
    };

    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a model reply into an [`IntentDecision`].
pub fn parse_decision(reply: &str) -> Result<IntentDecision, DecisionParseError> {
    let body = strip_code_fence(reply);
    let json: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| DecisionParseError::InvalidJson(e.to_string()))?;
    parse_decision_json(&json)
}

/// Parse a decision from an already-decoded JSON value.
///
/// Required: `message` (string), `should_call` (bool), `confidence`
/// (number). Optional: `tool_calls` (array, absent or null means none),
/// `explanation` (string), `post_process` (string). Confidence is clamped
/// into `[0, 1]`; a blank `post_process` becomes `None`.
pub fn parse_decision_json(json: &serde_json::Value) -> Result<IntentDecision, DecisionParseError> {
    let object = json.as_object().ok_or(DecisionParseError::NotAnObject)?;

    let message = required_str(object, "message")?;
    let should_call = object
        .get("should_call")
        .ok_or(DecisionParseError::MissingField("should_call"))?
        .as_bool()
        .ok_or_else(|| invalid("should_call", "must be a boolean"))?;
    let confidence = object
        .get("confidence")
        .ok_or(DecisionParseError::MissingField("confidence"))?
        .as_f64()
        .ok_or_else(|| invalid("confidence", "must be a number"))?;
    let explanation = optional_str(object, "explanation")?.unwrap_or_default();
    let post_process = optional_str(object, "post_process")?.filter(|p| !p.trim().is_empty());

    let tool_calls = match object.get("tool_calls") {
        None | Some(serde_json::Value::Null) => Vec::new(),
        Some(serde_json::Value::Array(calls)) => calls
            .iter()
            .enumerate()
            .map(|(index, call)| parse_tool_call(index, call))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(invalid("tool_calls", "must be an array")),
    };

    Ok(IntentDecision {
        message,
        tool_calls,
        should_call,
        confidence: if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        },
        explanation,
        post_process,
    })
}

fn parse_tool_call(index: usize, json: &serde_json::Value) -> Result<ToolCall, DecisionParseError> {
    let field = |name: &str| format!("tool_calls[{}].{}", index, name);

    let object = json.as_object().ok_or_else(|| DecisionParseError::InvalidField {
        field: format!("tool_calls[{}]", index),
        reason: "must be an object",
    })?;

    let name = object
        .get("name")
        .and_then(|v| v.as_str())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| DecisionParseError::InvalidField {
            field: field("name"),
            reason: "must be a non-empty string",
        })?;

    let mut call = ToolCall::new(name);

    match object.get("arguments") {
        None | Some(serde_json::Value::Null) => {}
        Some(serde_json::Value::Object(arguments)) => {
            for (key, value) in arguments {
                call.arguments
                    .insert(key.clone(), ArgValue::from(value.clone()));
            }
        }
        Some(_) => {
            return Err(DecisionParseError::InvalidField {
                field: field("arguments"),
                reason: "must be an object",
            });
        }
    }

    if let Some(reasoning) = object.get("reasoning").and_then(|v| v.as_str()) {
        call.reasoning = reasoning.to_string();
    }

    Ok(call)
}

fn invalid(field: &str, reason: &'static str) -> DecisionParseError {
    DecisionParseError::InvalidField {
        field: field.to_string(),
        reason,
    }
}

fn required_str(
    object: &serde_json::Map<String, serde_json::Value>,
    field: &'static str,
) -> Result<String, DecisionParseError> {
    object
        .get(field)
        .ok_or(DecisionParseError::MissingField(field))?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(field, "must be a string"))
}

fn optional_str(
    object: &serde_json::Map<String, serde_json::Value>,
    field: &'static str,
) -> Result<Option<String>, DecisionParseError> {
    match object.get(field) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(field, "must be a string")),
    }
}
