use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use tandem::models::content::ToolResult;
use tandem::models::tool::ToolDescriptor;
use tandem::registry::ToolSession;

/// In-process demo tool session backed by a small set of weather
/// monitoring stations. Stands in for a real remote session so the chat
/// loop works out of the box.
pub struct StationToolSession;

fn stations() -> Value {
    json!([
        {
            "id": "KJFK",
            "name": "John F. Kennedy International Airport",
            "location": "New York, NY",
            "latitude": 40.6386,
            "longitude": -73.7622,
            "elevation": 13,
            "type": "ASOS"
        },
        {
            "id": "KLAX",
            "name": "Los Angeles International Airport",
            "location": "Los Angeles, CA",
            "latitude": 33.9425,
            "longitude": -118.4081,
            "elevation": 125,
            "type": "ASOS"
        },
        {
            "id": "KORD",
            "name": "O'Hare International Airport",
            "location": "Chicago, IL",
            "latitude": 41.9786,
            "longitude": -87.9048,
            "elevation": 672,
            "type": "ASOS"
        }
    ])
}

#[async_trait]
impl ToolSession for StationToolSession {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        Ok(vec![
            ToolDescriptor::new(
                "get_station_info",
                "Get details for a weather monitoring station by its id",
                json!({
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "string",
                            "description": "Station identifier, e.g. KJFK"
                        }
                    },
                    "required": ["id"]
                }),
            ),
            ToolDescriptor::new(
                "list_stations",
                "List all known weather monitoring stations",
                json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            ),
        ])
    }

    async fn call_tool(&self, name: &str, arguments: &Value) -> Result<ToolResult> {
        match name {
            "get_station_info" => {
                let id = arguments
                    .get("id")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| anyhow!("missing required argument 'id'"))?;
                let station = stations()
                    .as_array()
                    .unwrap()
                    .iter()
                    .find(|s| s["id"] == id)
                    .cloned()
                    .ok_or_else(|| anyhow!("unknown station: {}", id))?;
                Ok(ToolResult::text(station.to_string()))
            }
            "list_stations" => Ok(ToolResult::text(stations().to_string())),
            other => Err(anyhow!("unknown tool: {}", other)),
        }
    }
}
