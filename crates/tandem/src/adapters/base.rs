use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ChatResult;
use crate::models::content::ToolResult;
use crate::models::tool::{ToolCallIntent, ToolDescriptor};

/// One raw completion response. The adapter that produced it is the only
/// code that knows its shape; the orchestrator only ever looks at it through
/// the extraction methods below.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub raw: Value,
}

impl ModelResponse {
    pub fn new(raw: Value) -> Self {
        ModelResponse { raw }
    }
}

/// Translation layer between the neutral conversation data and one
/// completion API's wire format.
///
/// The orchestrator holds a `Box<dyn ModelAdapter>` and never branches on
/// which provider is behind it; adding a provider means implementing this
/// trait, nothing else.
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Provider identity, used in error reports.
    fn provider(&self) -> &'static str;

    /// Replace the tool set offered to the model. Idempotent: calling again
    /// with the same descriptors produces the same provider-formatted list.
    fn set_available_tools(&mut self, tools: &[ToolDescriptor]);

    /// Issue one completion call over the given history. `steering` is an
    /// out-of-band per-request instruction (e.g. "narrate the tool result");
    /// it shapes this request only and is never part of the history.
    ///
    /// Transport and API failures are not retried here; they surface as
    /// [`ChatError::Completion`](crate::errors::ChatError::Completion) with
    /// this adapter's provider name attached.
    async fn complete(&self, history: &[Value], steering: Option<&str>)
        -> ChatResult<ModelResponse>;

    /// A user utterance in this provider's history shape.
    fn user_message(&self, text: &str) -> Value;

    /// The history entries that record this response as the assistant's
    /// turn. One entry for most providers; the OpenAI responses API commits
    /// each raw output item separately.
    fn assistant_turn(&self, response: &ModelResponse) -> Vec<Value>;

    /// A tool result in this provider's history shape, echoing `call_id`
    /// so the provider can pair it with the originating call.
    fn tool_result_message(&self, call_id: &str, result: &ToolResult) -> Value;

    /// The first tool-call intent in the response, if any. Absence is the
    /// normal no-tool branch, not an error; undecodable arguments are.
    fn extract_tool_call_intent(&self, response: &ModelResponse)
        -> ChatResult<Option<ToolCallIntent>>;

    /// Plain-text segments of the response. An empty list is valid.
    fn extract_text(&self, response: &ModelResponse) -> Vec<String>;
}
