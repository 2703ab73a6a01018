//! Domain layer for conductor
//!
//! This crate contains the core types and pure logic of the tool
//! orchestration pipeline. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tool catalog
//!
//! The tools a remote server advertises are held in an immutable
//! [`ToolCatalog`] snapshot. Proposed [`ToolCall`]s are checked against it
//! by a [`ToolValidator`] before anything is dispatched.
//!
//! ## Intent decision
//!
//! One LLM call per request yields an [`IntentDecision`]. The model's reply
//! is untrusted text; [`parse_decision`] is the only way in, and a reply it
//! rejects is replaced by [`IntentDecision::fallback`].

pub mod intent;
pub mod prompt;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use intent::{DecisionParseError, IntentDecision, parse_decision, parse_decision_json};
pub use prompt::{IntentPromptTemplate, PostProcessPromptTemplate};
pub use tool::{
    entities::{ToolCall, ToolCatalog, ToolDefinition},
    schema::{ParameterSchema, PropertyKind, PropertySchema},
    traits::{SchemaValidator, ToolValidator, ValidationError},
    value::{ArgValue, ValueKind},
    value_objects::{ToolExecutionResult, ToolFailure, aggregate_content},
};
