//! Tool domain entities

use super::schema::ParameterSchema;
use super::value::ArgValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Definition of a remote tool advertised by the tool server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "scrape_url")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Typed view of the parameter schema, used for validation
    pub parameters: ParameterSchema,
    /// The schema exactly as the server sent it, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<serde_json::Value>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ParameterSchema::default(),
            input_schema: None,
        }
    }

    /// Build a definition from a raw JSON Schema object.
    ///
    /// The raw schema is kept verbatim for prompt rendering; the typed
    /// [`ParameterSchema`] is derived from it.
    pub fn from_input_schema(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ParameterSchema::from_json_schema(&input_schema),
            input_schema: Some(input_schema),
        }
    }

    pub fn with_parameters(mut self, parameters: ParameterSchema) -> Self {
        self.parameters = parameters;
        self
    }

    /// JSON Schema for this tool: the server's original if present,
    /// otherwise one rendered from the typed schema.
    pub fn schema_json(&self) -> serde_json::Value {
        self.input_schema
            .clone()
            .unwrap_or_else(|| self.parameters.to_json_schema())
    }

    /// Name, description and schema as a single JSON object.
    pub fn to_prompt_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.schema_json(),
        })
    }
}

/// Immutable snapshot of every known tool.
///
/// A catalog is never patched: a registry refresh builds a new one and
/// swaps it in wholesale. Tools keep the order the server listed them in.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: Vec<ToolDefinition>,
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from discovered definitions.
    ///
    /// On duplicate names the first definition wins; the skipped names are
    /// returned so the caller can report them.
    pub fn from_definitions(definitions: Vec<ToolDefinition>) -> (Self, Vec<String>) {
        let mut catalog = Self::new();
        let mut duplicates = Vec::new();
        for definition in definitions {
            if catalog.index.contains_key(&definition.name) {
                duplicates.push(definition.name);
                continue;
            }
            catalog
                .index
                .insert(definition.name.clone(), catalog.tools.len());
            catalog.tools.push(definition);
        }
        (catalog, duplicates)
    }

    /// Register a tool (builder pattern). Replaces an existing tool of the same name.
    pub fn register(mut self, tool: ToolDefinition) -> Self {
        match self.index.get(&tool.name) {
            Some(&position) => self.tools[position] = tool,
            None => {
                self.index.insert(tool.name.clone(), self.tools.len());
                self.tools.push(tool);
            }
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&position| &self.tools[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A tool call proposed by the intent resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub name: String,
    /// Arguments passed to the tool
    #[serde(default)]
    pub arguments: BTreeMap<String, ArgValue>,
    /// Why the model proposed this call
    #[serde(default)]
    pub reasoning: String,
}

impl ToolCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: BTreeMap::new(),
            reasoning: String::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Arguments as a JSON object, ready for the wire.
    pub fn arguments_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.arguments
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::from(v.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::schema::PropertyKind;

    fn scrape_url() -> ToolDefinition {
        ToolDefinition::new("scrape_url", "Scrape a web page").with_parameters(
            ParameterSchema::new()
                .with_property("url", PropertyKind::String, true)
                .with_property("selector", PropertyKind::String, false),
        )
    }

    #[test]
    fn test_from_input_schema_keeps_raw_schema() {
        let raw = serde_json::json!({
            "type": "object",
            "properties": {"url": {"type": "string", "format": "uri"}},
            "required": ["url"]
        });
        let tool = ToolDefinition::from_input_schema("scrape_url", "Scrape", raw.clone());

        assert_eq!(tool.schema_json(), raw);
        assert!(tool.parameters.is_required("url"));
        assert_eq!(tool.parameters.kind_of("url"), Some(PropertyKind::String));
    }

    #[test]
    fn test_schema_json_rendered_when_no_raw_schema() {
        let schema = scrape_url().schema_json();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["url"]["type"], "string");
        assert_eq!(schema["required"], serde_json::json!(["url"]));
    }

    #[test]
    fn test_catalog_preserves_discovery_order() {
        let (catalog, duplicates) = ToolCatalog::from_definitions(vec![
            ToolDefinition::new("b_tool", "B"),
            ToolDefinition::new("a_tool", "A"),
        ]);

        assert!(duplicates.is_empty());
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["b_tool", "a_tool"]);
    }

    #[test]
    fn test_catalog_first_duplicate_wins() {
        let (catalog, duplicates) = ToolCatalog::from_definitions(vec![
            ToolDefinition::new("scrape_url", "first"),
            ToolDefinition::new("scrape_url", "second"),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("scrape_url").unwrap().description, "first");
        assert_eq!(duplicates, vec!["scrape_url".to_string()]);
    }

    #[test]
    fn test_catalog_register_replaces() {
        let catalog = ToolCatalog::new()
            .register(ToolDefinition::new("scrape_url", "old"))
            .register(ToolDefinition::new("scrape_url", "new"));

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("scrape_url").unwrap().description, "new");
        assert!(catalog.get("unknown").is_none());
    }

    #[test]
    fn test_tool_call_arguments_json() {
        let call = ToolCall::new("summarize_content")
            .with_arg("content", "some text")
            .with_arg("max_length", 120)
            .with_reasoning("User asked for a summary");

        let args = call.arguments_json();
        assert_eq!(args["content"], "some text");
        assert_eq!(args["max_length"], 120);
        assert_eq!(call.get_string("content"), Some("some text"));
        assert_eq!(call.reasoning, "User asked for a summary");
    }
}
