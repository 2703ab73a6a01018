//! Parameter schemas
//!
//! Tool servers describe parameters with JSON Schema. Only the subset the
//! validator needs is modelled here: a kind per property and the required
//! set. Anything richer stays in the raw schema on
//! [`ToolDefinition`](super::entities::ToolDefinition).

use super::value::ArgValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared kind of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
    /// No `type`, several types, or a type we do not model
    Any,
}

impl PropertyKind {
    /// Map a JSON Schema `type` name to a kind.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "string" => PropertyKind::String,
            "integer" => PropertyKind::Integer,
            "number" => PropertyKind::Number,
            "boolean" => PropertyKind::Boolean,
            "object" => PropertyKind::Object,
            "array" => PropertyKind::Array,
            _ => PropertyKind::Any,
        }
    }

    /// Resolve the `type` keyword of a property schema.
    ///
    /// `["string", "null"]` counts as `string`; any other union is `Any`.
    fn from_type_keyword(keyword: Option<&serde_json::Value>) -> Self {
        match keyword {
            Some(serde_json::Value::String(name)) => Self::from_type_name(name),
            Some(serde_json::Value::Array(names)) => {
                let non_null: Vec<&str> = names
                    .iter()
                    .filter_map(|n| n.as_str())
                    .filter(|n| *n != "null")
                    .collect();
                match non_null.as_slice() {
                    [single] => Self::from_type_name(single),
                    _ => PropertyKind::Any,
                }
            }
            _ => PropertyKind::Any,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::String => "string",
            PropertyKind::Integer => "integer",
            PropertyKind::Number => "number",
            PropertyKind::Boolean => "boolean",
            PropertyKind::Object => "object",
            PropertyKind::Array => "array",
            PropertyKind::Any => "any",
        }
    }

    /// Whether values for this kind are type-checked at all.
    pub fn is_checked(&self) -> bool {
        matches!(
            self,
            PropertyKind::String
                | PropertyKind::Integer
                | PropertyKind::Number
                | PropertyKind::Boolean
        )
    }

    /// Whether `value` satisfies this kind.
    ///
    /// Integer and number accept any numeric value. Unchecked kinds accept
    /// everything.
    pub fn accepts(&self, value: &ArgValue) -> bool {
        match self {
            PropertyKind::String => matches!(value, ArgValue::String(_)),
            PropertyKind::Integer | PropertyKind::Number => matches!(value, ArgValue::Number(_)),
            PropertyKind::Boolean => matches!(value, ArgValue::Bool(_)),
            PropertyKind::Object | PropertyKind::Array | PropertyKind::Any => true,
        }
    }
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema of a single property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    pub kind: PropertyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Parameter schema of a tool: typed properties plus the required set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    pub properties: BTreeMap<String, PropertySchema>,
    /// Required property names, in declaration order
    pub required: Vec<String>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property (builder pattern)
    pub fn with_property(
        mut self,
        name: impl Into<String>,
        kind: PropertyKind,
        required: bool,
    ) -> Self {
        let name = name.into();
        if required && !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(
            name,
            PropertySchema {
                kind,
                description: None,
            },
        );
        self
    }

    /// Attach a description to an existing property (builder pattern)
    pub fn with_description(mut self, name: &str, description: impl Into<String>) -> Self {
        if let Some(property) = self.properties.get_mut(name) {
            property.description = Some(description.into());
        }
        self
    }

    /// Derive a typed schema from a JSON Schema object.
    ///
    /// Malformed pieces are skipped rather than rejected: a schema the
    /// server sends is never a reason to drop the tool.
    pub fn from_json_schema(schema: &serde_json::Value) -> Self {
        let mut parsed = Self::new();

        if let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) {
            for (name, property) in properties {
                parsed.properties.insert(
                    name.clone(),
                    PropertySchema {
                        kind: PropertyKind::from_type_keyword(property.get("type")),
                        description: property
                            .get("description")
                            .and_then(|d| d.as_str())
                            .map(str::to_string),
                    },
                );
            }
        }

        if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
            for name in required.iter().filter_map(|n| n.as_str()) {
                if !parsed.required.iter().any(|r| r == name) {
                    parsed.required.push(name.to_string());
                }
            }
        }

        parsed
    }

    /// Render as a JSON Schema object.
    pub fn to_json_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        for (name, property) in &self.properties {
            let mut prop = serde_json::Map::new();
            if property.kind != PropertyKind::Any {
                prop.insert("type".to_string(), serde_json::json!(property.kind.as_str()));
            }
            if let Some(description) = &property.description {
                prop.insert("description".to_string(), serde_json::json!(description));
            }
            properties.insert(name.clone(), serde_json::Value::Object(prop));
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": self.required,
        })
    }

    pub fn kind_of(&self, name: &str) -> Option<PropertyKind> {
        self.properties.get(name).map(|p| p.kind)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_schema() {
        let schema = ParameterSchema::from_json_schema(&serde_json::json!({
            "type": "object",
            "properties": {
                "url": {"type": "string", "description": "Page to fetch"},
                "max_length": {"type": "integer"},
                "ratio": {"type": "number"},
                "verbose": {"type": "boolean"},
                "headers": {"type": "object"},
                "tags": {"type": "array", "items": {"type": "string"}},
                "anything": {}
            },
            "required": ["url"]
        }));

        assert_eq!(schema.kind_of("url"), Some(PropertyKind::String));
        assert_eq!(schema.kind_of("max_length"), Some(PropertyKind::Integer));
        assert_eq!(schema.kind_of("ratio"), Some(PropertyKind::Number));
        assert_eq!(schema.kind_of("verbose"), Some(PropertyKind::Boolean));
        assert_eq!(schema.kind_of("headers"), Some(PropertyKind::Object));
        assert_eq!(schema.kind_of("tags"), Some(PropertyKind::Array));
        assert_eq!(schema.kind_of("anything"), Some(PropertyKind::Any));
        assert_eq!(schema.required, vec!["url".to_string()]);
        assert_eq!(
            schema.properties["url"].description.as_deref(),
            Some("Page to fetch")
        );
    }

    #[test]
    fn test_nullable_type_union() {
        let schema = ParameterSchema::from_json_schema(&serde_json::json!({
            "properties": {
                "selector": {"type": ["string", "null"]},
                "mixed": {"type": ["string", "integer"]}
            }
        }));

        assert_eq!(schema.kind_of("selector"), Some(PropertyKind::String));
        assert_eq!(schema.kind_of("mixed"), Some(PropertyKind::Any));
    }

    #[test]
    fn test_missing_sections_yield_empty_schema() {
        let schema = ParameterSchema::from_json_schema(&serde_json::json!({"type": "object"}));
        assert!(schema.properties.is_empty());
        assert!(schema.required.is_empty());
    }

    #[test]
    fn test_kind_accepts() {
        assert!(PropertyKind::String.accepts(&ArgValue::from("x")));
        assert!(!PropertyKind::String.accepts(&ArgValue::from(1)));
        assert!(!PropertyKind::String.accepts(&ArgValue::Null));
        assert!(PropertyKind::Integer.accepts(&ArgValue::from(2.5)));
        assert!(PropertyKind::Number.accepts(&ArgValue::from(7)));
        assert!(!PropertyKind::Boolean.accepts(&ArgValue::from("true")));
        assert!(PropertyKind::Object.accepts(&ArgValue::from("not checked")));
        assert!(PropertyKind::Any.accepts(&ArgValue::Null));
    }

    #[test]
    fn test_to_json_schema() {
        let schema = ParameterSchema::new()
            .with_property("content", PropertyKind::String, true)
            .with_property("max_length", PropertyKind::Integer, false)
            .with_description("content", "Text to summarize");

        let json = schema.to_json_schema();
        assert_eq!(json["properties"]["content"]["type"], "string");
        assert_eq!(json["properties"]["content"]["description"], "Text to summarize");
        assert_eq!(json["properties"]["max_length"]["type"], "integer");
        assert_eq!(json["required"], serde_json::json!(["content"]));
    }
}
