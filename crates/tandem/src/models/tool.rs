use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool advertised by the tool session, in provider-neutral shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDescriptor {
    /// The name of the tool
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// JSON Schema describing the arguments the tool accepts
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDescriptor {
    pub fn new<N, D>(name: N, description: D, input_schema: Value) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        ToolDescriptor {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// A request to invoke a named tool, extracted from a model response.
///
/// At most one intent is acted on per response; if a provider returns
/// several tool-use entries, only the first is ever extracted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallIntent {
    /// The name of the tool to execute
    pub name: String,
    /// The arguments for the execution
    pub arguments: Value,
    /// Provider-assigned id linking the call to its eventual result
    pub call_id: String,
}

impl ToolCallIntent {
    pub fn new<N, I>(name: N, arguments: Value, call_id: I) -> Self
    where
        N: Into<String>,
        I: Into<String>,
    {
        ToolCallIntent {
            name: name.into(),
            arguments,
            call_id: call_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_serialization_uses_wire_field_name() {
        let descriptor = ToolDescriptor::new(
            "get_station_info",
            "Look up a weather station",
            json!({"type": "object", "properties": {"id": {"type": "string"}}}),
        );

        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["name"], "get_station_info");
        assert!(value["inputSchema"]["properties"]["id"].is_object());
    }

    #[test]
    fn test_intent_roundtrip() {
        let intent = ToolCallIntent::new("get_station_info", json!({"id": "KJFK"}), "call_1");
        let serialized = serde_json::to_string(&intent).unwrap();
        let deserialized: ToolCallIntent = serde_json::from_str(&serialized).unwrap();
        assert_eq!(intent, deserialized);
    }
}
