use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use super::base::{ModelAdapter, ModelResponse};
use crate::errors::{ChatError, ChatResult};
use crate::models::content::ToolResult;
use crate::models::tool::{ToolCallIntent, ToolDescriptor};

/// A scripted adapter for orchestrator tests. Replies are consumed in
/// order; the wire shape is a private mock format that still exercises the
/// full append/extract surface. The recorder handles are shared so tests
/// can keep a clone after the adapter moves into the orchestrator.
pub struct MockAdapter {
    responses: Mutex<Vec<ChatResult<ModelResponse>>>,
    pub completions: Arc<Mutex<Vec<Option<String>>>>,
    pub tool_sets: Arc<Mutex<Vec<Vec<ToolDescriptor>>>>,
}

impl MockAdapter {
    pub fn new(responses: Vec<ChatResult<ModelResponse>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            completions: Arc::new(Mutex::new(Vec::new())),
            tool_sets: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A scripted plain-text reply.
    pub fn text_reply(text: &str) -> ChatResult<ModelResponse> {
        Ok(ModelResponse::new(json!({"text": [text]})))
    }

    /// A scripted reply that requests a tool call alongside optional text.
    pub fn tool_reply(
        text: Option<&str>,
        name: &str,
        arguments: Value,
        call_id: &str,
    ) -> ChatResult<ModelResponse> {
        let texts: Vec<&str> = text.into_iter().collect();
        Ok(ModelResponse::new(json!({
            "text": texts,
            "tool_call": {"name": name, "arguments": arguments, "call_id": call_id},
        })))
    }

    pub fn failed_reply() -> ChatResult<ModelResponse> {
        Err(ChatError::Completion {
            provider: "mock",
            source: anyhow::anyhow!("transport error"),
        })
    }
}

#[async_trait]
impl ModelAdapter for MockAdapter {
    fn provider(&self) -> &'static str {
        "mock"
    }

    fn set_available_tools(&mut self, tools: &[ToolDescriptor]) {
        self.tool_sets.lock().unwrap().push(tools.to_vec());
    }

    async fn complete(
        &self,
        _history: &[Value],
        steering: Option<&str>,
    ) -> ChatResult<ModelResponse> {
        self.completions
            .lock()
            .unwrap()
            .push(steering.map(String::from));

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(ModelResponse::new(json!({"text": []})))
        } else {
            responses.remove(0)
        }
    }

    fn user_message(&self, text: &str) -> Value {
        json!({"role": "user", "content": text})
    }

    fn assistant_turn(&self, response: &ModelResponse) -> Vec<Value> {
        vec![json!({"role": "assistant", "content": response.raw.clone()})]
    }

    fn tool_result_message(&self, call_id: &str, result: &ToolResult) -> Value {
        json!({
            "role": "tool",
            "call_id": call_id,
            "content": result.first_text(),
        })
    }

    fn extract_tool_call_intent(
        &self,
        response: &ModelResponse,
    ) -> ChatResult<Option<ToolCallIntent>> {
        let Some(call) = response.raw.get("tool_call") else {
            return Ok(None);
        };
        Ok(Some(ToolCallIntent::new(
            call["name"].as_str().unwrap_or_default(),
            call["arguments"].clone(),
            call["call_id"].as_str().unwrap_or_default(),
        )))
    }

    fn extract_text(&self, response: &ModelResponse) -> Vec<String> {
        response
            .raw
            .get("text")
            .and_then(|t| t.as_array())
            .map(|texts| {
                texts
                    .iter()
                    .filter_map(|t| t.as_str())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}
