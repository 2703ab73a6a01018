//! Tool domain traits
//!
//! Validation of proposed tool calls against the catalog snapshot. Pure
//! logic, no I/O; the async dispatch port lives in the application layer.

use super::entities::{ToolCall, ToolCatalog};
use super::schema::PropertyKind;
use super::value::ValueKind;
use super::value_objects::ToolFailure;
use thiserror::Error;

/// Why a proposed call was rejected before dispatch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Missing required parameter '{parameter}' for tool '{tool}'")]
    MissingParameter { tool: String, parameter: String },

    #[error("Parameter '{parameter}' of tool '{tool}' must be {expected}, got {actual}")]
    TypeMismatch {
        tool: String,
        parameter: String,
        expected: PropertyKind,
        actual: ValueKind,
    },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::UnknownTool(_) => ToolFailure::UNKNOWN_TOOL,
            ValidationError::MissingParameter { .. } => ToolFailure::MISSING_PARAMETER,
            ValidationError::TypeMismatch { .. } => ToolFailure::TYPE_MISMATCH,
        }
    }
}

impl From<ValidationError> for ToolFailure {
    fn from(error: ValidationError) -> Self {
        ToolFailure::new(error.code(), error.to_string())
    }
}

/// Validator for proposed tool calls
pub trait ToolValidator {
    /// Validate a call against the catalog it will be dispatched with
    fn validate(&self, call: &ToolCall, catalog: &ToolCatalog) -> Result<(), ValidationError>;
}

/// Schema-driven validator.
///
/// Checks, in order: the tool exists, every required parameter is present,
/// and every supplied argument that the schema declares as
/// string/integer/number/boolean has that kind. Arguments the schema does
/// not mention pass through unchecked.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator;

impl ToolValidator for SchemaValidator {
    fn validate(&self, call: &ToolCall, catalog: &ToolCatalog) -> Result<(), ValidationError> {
        let definition = catalog
            .get(&call.name)
            .ok_or_else(|| ValidationError::UnknownTool(call.name.clone()))?;

        let schema = &definition.parameters;

        for parameter in &schema.required {
            if !call.arguments.contains_key(parameter) {
                return Err(ValidationError::MissingParameter {
                    tool: call.name.clone(),
                    parameter: parameter.clone(),
                });
            }
        }

        for (name, value) in &call.arguments {
            let Some(expected) = schema.kind_of(name) else {
                continue;
            };
            if !expected.accepts(value) {
                return Err(ValidationError::TypeMismatch {
                    tool: call.name.clone(),
                    parameter: name.clone(),
                    expected,
                    actual: value.kind(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolDefinition;
    use crate::tool::schema::ParameterSchema;

    fn catalog() -> ToolCatalog {
        ToolCatalog::new().register(
            ToolDefinition::new("summarize_content", "Summarize text").with_parameters(
                ParameterSchema::new()
                    .with_property("content", PropertyKind::String, true)
                    .with_property("max_length", PropertyKind::Integer, false)
                    .with_property("verbose", PropertyKind::Boolean, false)
                    .with_property("options", PropertyKind::Object, false),
            ),
        )
    }

    #[test]
    fn test_validator_unknown_tool() {
        let result = SchemaValidator.validate(&ToolCall::new("delete_everything"), &catalog());
        assert_eq!(
            result,
            Err(ValidationError::UnknownTool("delete_everything".into()))
        );
    }

    #[test]
    fn test_validator_missing_required() {
        let call = ToolCall::new("summarize_content").with_arg("max_length", 100);
        let result = SchemaValidator.validate(&call, &catalog());

        let err = result.unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingParameter {
                tool: "summarize_content".into(),
                parameter: "content".into(),
            }
        );
        assert!(err.to_string().contains("content"));
        assert!(err.to_string().contains("summarize_content"));
    }

    #[test]
    fn test_validator_accepts_extra_params() {
        let call = ToolCall::new("summarize_content")
            .with_arg("content", "Rust is a systems language.")
            .with_arg("style", "concise")
            .with_arg("unrelated", 42);

        assert!(SchemaValidator.validate(&call, &catalog()).is_ok());
    }

    #[test]
    fn test_validator_type_mismatch() {
        let call = ToolCall::new("summarize_content")
            .with_arg("content", "text")
            .with_arg("max_length", "two hundred");

        let err = SchemaValidator.validate(&call, &catalog()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                tool: "summarize_content".into(),
                parameter: "max_length".into(),
                expected: PropertyKind::Integer,
                actual: ValueKind::String,
            }
        );
        assert_eq!(err.code(), ToolFailure::TYPE_MISMATCH);
    }

    #[test]
    fn test_validator_integer_accepts_float_representation() {
        let call = ToolCall::new("summarize_content")
            .with_arg("content", "text")
            .with_arg("max_length", 200.0);

        assert!(SchemaValidator.validate(&call, &catalog()).is_ok());
    }

    #[test]
    fn test_validator_boolean_and_unchecked_object() {
        let bad_bool = ToolCall::new("summarize_content")
            .with_arg("content", "text")
            .with_arg("verbose", "yes");
        assert!(matches!(
            SchemaValidator.validate(&bad_bool, &catalog()),
            Err(ValidationError::TypeMismatch { .. })
        ));

        let loose_object = ToolCall::new("summarize_content")
            .with_arg("content", "text")
            .with_arg("options", "not an object");
        assert!(SchemaValidator.validate(&loose_object, &catalog()).is_ok());
    }

    #[test]
    fn test_validation_error_into_failure() {
        let failure: ToolFailure = ValidationError::UnknownTool("x".into()).into();
        assert_eq!(failure.code, ToolFailure::UNKNOWN_TOOL);
        assert!(failure.is_validation());
    }
}
