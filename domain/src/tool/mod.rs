//! Tool domain module
//!
//! Defines how remote tools are described, proposed, validated and reported.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌─────────────────────┐
//! │ ToolCatalog  │───▶│ ToolCall     │───▶│ ToolExecutionResult │
//! │ (snapshot)   │    │ (proposed)   │    │ (one per attempt)   │
//! └──────────────┘    └──────────────┘    └─────────────────────┘
//!        │                   │
//!        └── ParameterSchema ┴── ArgValue  → SchemaValidator
//! ```
//!
//! - [`ToolCatalog`]: immutable snapshot of every known [`ToolDefinition`],
//!   replaced wholesale on refresh
//! - [`ToolCall`]: a call proposed by the model; arguments are [`ArgValue`]s
//! - [`SchemaValidator`]: checks a call against the catalog snapshot
//! - [`ToolExecutionResult`]: outcome of one attempted call
//! - [`aggregate_content`]: merges successful outputs in call order

pub mod entities;
pub mod schema;
pub mod traits;
pub mod value;
pub mod value_objects;

pub use entities::{ToolCall, ToolCatalog, ToolDefinition};
pub use schema::{ParameterSchema, PropertyKind, PropertySchema};
pub use traits::{SchemaValidator, ToolValidator, ValidationError};
pub use value::{ArgValue, ValueKind};
pub use value_objects::{ToolExecutionResult, ToolFailure, aggregate_content};
