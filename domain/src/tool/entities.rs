//! Tool domain entities

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Routing key identifying the origin (document) that exposes a tool.
///
/// Origins are addressed by the host's frame numbering: `0` is always the
/// top-level document, every other value names an embedded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OriginKey(u64);

impl OriginKey {
    /// The top-level document of the active page.
    pub const TOP_LEVEL: OriginKey = OriginKey(0);

    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn is_top_level(&self) -> bool {
        *self == Self::TOP_LEVEL
    }
}

impl Default for OriginKey {
    fn default() -> Self {
        Self::TOP_LEVEL
    }
}

impl std::fmt::Display for OriginKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "origin#{}", self.0)
    }
}

/// A tool exactly as an origin's bridge reports it, before annotation.
///
/// `input_schema` is kept as raw JSON: pages may expose it either as an
/// object or as a JSON-encoded string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        rename = "inputSchema",
        alias = "input_schema",
        skip_serializing_if = "Option::is_none"
    )]
    pub input_schema: Option<Value>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            input_schema: None,
        }
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }
}

/// A callable tool discovered on the active page.
///
/// Produced fresh on every discovery and never mutated; the agent loop only
/// ever holds a read-only snapshot for the current iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name, unique within its origin
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON-Schema-like description of the arguments (object or encoded string)
    pub input_schema: Value,
    /// Where calls to this tool must be routed
    pub origin: OriginKey,
    /// URL of the exposing document, if the bridge reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_url: Option<String>,
    /// True only for tools exposed by the top-level document
    pub is_trusted_origin: bool,
}

impl Tool {
    /// Annotate a raw descriptor with its routing information.
    pub fn from_descriptor(
        descriptor: ToolDescriptor,
        origin: OriginKey,
        origin_url: Option<String>,
        is_trusted_origin: bool,
    ) -> Self {
        Self {
            name: descriptor.name,
            description: descriptor.description.unwrap_or_default(),
            input_schema: descriptor.input_schema.unwrap_or(Value::Null),
            origin,
            origin_url,
            is_trusted_origin,
        }
    }

    /// The schema rendered as text for the instructions block.
    pub fn schema_text(&self) -> String {
        match &self.input_schema {
            Value::Null => "{}".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// The schema as a JSON object suitable for a function-calling API.
    ///
    /// String schemas are parsed; anything that is not an object afterwards
    /// falls back to an empty object schema.
    pub fn parameters(&self) -> Value {
        let parsed = match &self.input_schema {
            Value::String(s) => serde_json::from_str(s).unwrap_or(Value::Null),
            other => other.clone(),
        };
        if parsed.is_object() {
            parsed
        } else {
            empty_object_schema()
        }
    }

    /// Label describing the tool's origin, e.g. `top frame` or `iframe: <url>`.
    pub fn origin_label(&self) -> String {
        if self.is_trusted_origin {
            "top frame".to_string()
        } else {
            format!(
                "iframe: {}",
                self.origin_url.as_deref().unwrap_or("unknown")
            )
        }
    }

    pub fn to_function_tool(&self) -> FunctionTool {
        FunctionTool {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters(),
        }
    }
}

/// A tool as offered to the model backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionTool {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

pub(crate) fn empty_object_schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool_with_schema(schema: Option<Value>) -> Tool {
        let mut descriptor = ToolDescriptor::new("add-to-cart", "Add an item to the cart");
        descriptor.input_schema = schema;
        Tool::from_descriptor(descriptor, OriginKey::TOP_LEVEL, None, true)
    }

    #[test]
    fn test_origin_key_top_level() {
        assert!(OriginKey::TOP_LEVEL.is_top_level());
        assert!(OriginKey::default().is_top_level());
        assert!(!OriginKey::new(3).is_top_level());
        assert_eq!(OriginKey::new(3).to_string(), "origin#3");
    }

    #[test]
    fn test_parameters_passes_object_through() {
        let schema = json!({"type": "object", "properties": {"sku": {"type": "string"}}});
        let tool = tool_with_schema(Some(schema.clone()));
        assert_eq!(tool.parameters(), schema);
    }

    #[test]
    fn test_parameters_parses_string_schema() {
        let tool = tool_with_schema(Some(json!(r#"{"type":"object","properties":{"qty":{"type":"integer"}}}"#)));
        assert_eq!(tool.parameters()["properties"]["qty"]["type"], "integer");
    }

    #[test]
    fn test_parameters_falls_back_for_garbage() {
        let tool = tool_with_schema(Some(json!("not json at all")));
        assert_eq!(tool.parameters(), empty_object_schema());

        let tool = tool_with_schema(None);
        assert_eq!(tool.parameters(), empty_object_schema());
        assert_eq!(tool.schema_text(), "{}");
    }

    #[test]
    fn test_origin_label() {
        let top = tool_with_schema(None);
        assert_eq!(top.origin_label(), "top frame");

        let framed = Tool::from_descriptor(
            ToolDescriptor::new("pay", "Pay"),
            OriginKey::new(7),
            Some("https://pay.example/widget".to_string()),
            false,
        );
        assert_eq!(framed.origin_label(), "iframe: https://pay.example/widget");

        let anonymous = Tool::from_descriptor(ToolDescriptor::new("pay", "Pay"), OriginKey::new(7), None, false);
        assert_eq!(anonymous.origin_label(), "iframe: unknown");
    }

    #[test]
    fn test_descriptor_deserializes_camel_case_schema() {
        let descriptor: ToolDescriptor = serde_json::from_value(json!({
            "name": "search",
            "inputSchema": "{\"type\":\"object\"}"
        }))
        .unwrap();
        assert_eq!(descriptor.name, "search");
        assert!(descriptor.description.is_none());
        assert_eq!(descriptor.input_schema, Some(json!("{\"type\":\"object\"}")));
    }
}
