use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

use super::base::{ModelAdapter, ModelResponse};
use super::configs::AnthropicAdapterConfig;
use crate::errors::{ChatError, ChatResult};
use crate::models::content::ToolResult;
use crate::models::tool::{ToolCallIntent, ToolDescriptor};

pub const ANTHROPIC_PROVIDER_NAME: &str = "anthropic";

/// Adapter for the Anthropic messages API.
///
/// Anthropic keeps tool traffic inside `content` arrays: the assistant turn
/// carries `tool_use` blocks and the tool result goes back as a user message
/// holding a `tool_result` block. Tool schemas pass through unchanged under
/// `input_schema`.
pub struct AnthropicAdapter {
    client: Client,
    config: AnthropicAdapterConfig,
    tools: Vec<Value>,
}

impl AnthropicAdapter {
    pub fn new(config: AnthropicAdapterConfig) -> Result<Self> {
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
        Self::new(AnthropicAdapterConfig::from_env()?)
    }

    async fn post(&self, payload: Value) -> Result<Value> {
        let url = format!("{}/v1/messages", self.config.host.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
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

    fn content_blocks(response: &ModelResponse) -> &[Value] {
        response
            .raw
            .get("content")
            .and_then(|c| c.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[async_trait]
impl ModelAdapter for AnthropicAdapter {
    fn provider(&self) -> &'static str {
        ANTHROPIC_PROVIDER_NAME
    }

    fn set_available_tools(&mut self, tools: &[ToolDescriptor]) {
        self.tools = tools
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name,
                    "description": tool.description,
                    "input_schema": tool.input_schema,
                })
            })
            .collect();
    }

    async fn complete(
        &self,
        history: &[Value],
        steering: Option<&str>,
    ) -> ChatResult<ModelResponse> {
        let mut messages = history.to_vec();
        if let Some(instruction) = steering {
            // Request-scoped: shapes this call but is never committed to
            // the conversation history.
            messages.push(json!({"role": "user", "content": instruction}));
        }

        let mut payload = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": messages,
        });
        if !self.tools.is_empty() {
            payload
                .as_object_mut()
                .unwrap()
                .insert("tools".to_string(), json!(self.tools));
        }

        let response = self
            .post(payload)
            .await
            .map_err(|e| ChatError::Completion {
                provider: ANTHROPIC_PROVIDER_NAME,
                source: e,
            })?;

        Ok(ModelResponse::new(response))
    }

    fn user_message(&self, text: &str) -> Value {
        json!({"role": "user", "content": text})
    }

    fn assistant_turn(&self, response: &ModelResponse) -> Vec<Value> {
        let content = response.raw.get("content").cloned().unwrap_or(json!([]));
        vec![json!({"role": "assistant", "content": content})]
    }

    fn tool_result_message(&self, call_id: &str, result: &ToolResult) -> Value {
        json!({
            "role": "user",
            "content": [{
                "type": "tool_result",
                "tool_use_id": call_id,
                "content": result.first_text(),
            }],
        })
    }

    fn extract_tool_call_intent(
        &self,
        response: &ModelResponse,
    ) -> ChatResult<Option<ToolCallIntent>> {
        for block in Self::content_blocks(response) {
            if block.get("type").and_then(|t| t.as_str()) != Some("tool_use") {
                continue;
            }
            let (Some(name), Some(id)) = (
                block.get("name").and_then(|n| n.as_str()),
                block.get("id").and_then(|i| i.as_str()),
            ) else {
                continue;
            };
            // `input` is already structured JSON on this API, so there is
            // no decode step that could fail.
            let arguments = block.get("input").cloned().unwrap_or(json!({}));
            return Ok(Some(ToolCallIntent::new(name, arguments, id)));
        }
        Ok(None)
    }

    fn extract_text(&self, response: &ModelResponse) -> Vec<String> {
        Self::content_blocks(response)
            .iter()
            .filter(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))
            .filter_map(|block| block.get("text").and_then(|t| t.as_str()))
            .map(String::from)
            .collect()
    }
}
