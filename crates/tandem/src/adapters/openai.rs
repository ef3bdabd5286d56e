use anyhow::{anyhow, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::de::Error as _;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

use super::base::{ModelAdapter, ModelResponse};
use super::configs::OpenAiAdapterConfig;
use crate::errors::{ChatError, ChatResult};
use crate::models::content::ToolResult;
use crate::models::tool::{ToolCallIntent, ToolDescriptor};

pub const OPENAI_PROVIDER_NAME: &str = "openai";

/// Adapter for the OpenAI responses API.
///
/// This API keeps history as a flat list of items rather than nested
/// content: the assistant turn is committed as its raw output items
/// (message and `function_call` items alike) and the tool result goes back
/// as a `function_call_output` item echoing the originating `call_id`.
/// Committing the `function_call` item verbatim is what guarantees the
/// call-id pairing the API requires.
pub struct OpenAiAdapter {
    client: Client,
    config: OpenAiAdapterConfig,
    tools: Vec<Value>,
}

impl OpenAiAdapter {
    pub fn new(config: OpenAiAdapterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self {
            client,
            config,
            tools: Vec::new(),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(OpenAiAdapterConfig::from_env()?)
    }

    async fn post(&self, payload: Value) -> Result<Value> {
        let url = format!("{}/v1/responses", self.config.host.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&payload)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() >= 500 => {
                Err(anyhow!("Server error: {}", status))
            }
            _ => {
                let status = response.status();
                let error_text = response.text().await?;
                Err(anyhow!("Request failed: {} - {}", status, error_text))
            }
        }
    }

    fn output_items(response: &ModelResponse) -> &[Value] {
        response
            .raw
            .get("output")
            .and_then(|o| o.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

fn sanitize_function_name(name: &str) -> String {
    let re = Regex::new(r"[^a-zA-Z0-9_-]").unwrap();
    re.replace_all(name, "_").to_string()
}

#[async_trait]
impl ModelAdapter for OpenAiAdapter {
    fn provider(&self) -> &'static str {
        OPENAI_PROVIDER_NAME
    }

    fn set_available_tools(&mut self, tools: &[ToolDescriptor]) {
        self.tools = tools
            .iter()
            .map(|tool| {
                // The responses API wants the schema flattened into a
                // top-level parameters object.
                let schema_type = tool
                    .input_schema
                    .get("type")
                    .cloned()
                    .unwrap_or(json!("object"));
                let properties = tool
                    .input_schema
                    .get("properties")
                    .cloned()
                    .unwrap_or(json!({}));
                let required = tool
                    .input_schema
                    .get("required")
                    .cloned()
                    .unwrap_or(json!([]));

                json!({
                    "type": "function",
                    "name": sanitize_function_name(&tool.name),
                    "description": tool.description,
                    "parameters": {
                        "type": schema_type,
                        "properties": properties,
                        "required": required,
                    },
                })
            })
            .collect();
    }

    async fn complete(
        &self,
        history: &[Value],
        steering: Option<&str>,
    ) -> ChatResult<ModelResponse> {
        let mut payload = json!({
            "model": self.config.model,
            "max_output_tokens": self.config.max_tokens,
            "input": history,
        });
        if !self.tools.is_empty() {
            payload
                .as_object_mut()
                .unwrap()
                .insert("tools".to_string(), json!(self.tools));
        }
        if let Some(instruction) = steering {
            // Request-scoped instruction; keeps the input list (and thus the
            // committed history) untouched.
            payload
                .as_object_mut()
                .unwrap()
                .insert("instructions".to_string(), json!(instruction));
        }

        let response = self
            .post(payload)
            .await
            .map_err(|e| ChatError::Completion {
                provider: OPENAI_PROVIDER_NAME,
                source: e,
            })?;

        Ok(ModelResponse::new(response))
    }

    fn user_message(&self, text: &str) -> Value {
        json!({"role": "user", "content": text})
    }

    fn assistant_turn(&self, response: &ModelResponse) -> Vec<Value> {
        Self::output_items(response).to_vec()
    }

    fn tool_result_message(&self, call_id: &str, result: &ToolResult) -> Value {
        json!({
            "type": "function_call_output",
            "call_id": call_id,
            "output": result.first_text(),
        })
    }

    fn extract_tool_call_intent(
        &self,
        response: &ModelResponse,
    ) -> ChatResult<Option<ToolCallIntent>> {
        for item in Self::output_items(response) {
            let (Some(name), Some(arguments)) = (
                item.get("name").and_then(|n| n.as_str()),
                item.get("arguments"),
            ) else {
                continue;
            };
            // Without an id the result could never be paired with its call,
            // so this is a malformed request from the model, not a usable
            // intent.
            let Some(call_id) = item
                .get("call_id")
                .or_else(|| item.get("id"))
                .and_then(|i| i.as_str())
                .map(String::from)
            else {
                return Err(ChatError::MalformedToolArguments {
                    call_id: "(missing)".to_string(),
                    source: serde_json::Error::custom(format!(
                        "function_call item for tool '{}' has no call id",
                        name
                    )),
                });
            };

            // Arguments arrive as a JSON-encoded string; a decode failure is
            // a per-turn error, never silently swallowed.
            let arguments = match arguments.as_str() {
                Some(encoded) => serde_json::from_str::<Value>(encoded).map_err(|e| {
                    ChatError::MalformedToolArguments {
                        call_id: call_id.clone(),
                        source: e,
                    }
                })?,
                None => arguments.clone(),
            };

            return Ok(Some(ToolCallIntent::new(name, arguments, call_id)));
        }
        Ok(None)
    }

    fn extract_text(&self, response: &ModelResponse) -> Vec<String> {
        Self::output_items(response)
            .iter()
            .filter(|item| item.get("type").and_then(|t| t.as_str()) == Some("message"))
            .filter_map(|item| item.get("content").and_then(|c| c.as_array()))
            .flatten()
            .filter(|part| part.get("type").and_then(|t| t.as_str()) == Some("output_text"))
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .map(String::from)
            .collect()
    }
}
