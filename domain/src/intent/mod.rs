//! Intent domain module
//!
//! An [`IntentDecision`] is the model's answer to "which tools, if any,
//! does this request need?". [`parse_decision`] turns the model's raw reply
//! into one, and [`IntentDecision::fallback`] is the fixed value used when
//! that reply is malformed.

pub mod decision;
pub mod parser;

pub use decision::{FALLBACK_CONFIDENCE, FALLBACK_EXPLANATION, FALLBACK_MESSAGE, IntentDecision};
pub use parser::{DecisionParseError, parse_decision, parse_decision_json, strip_code_fence};
