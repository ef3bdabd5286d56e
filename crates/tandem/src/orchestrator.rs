use serde_json::Value;

use crate::adapters::base::ModelAdapter;
use crate::conversation::ConversationState;
use crate::errors::ChatResult;
use crate::models::tool::ToolCallIntent;
use crate::registry::ToolRegistry;

/// Per-request instruction sent with the follow-up completion so the model
/// narrates the tool result instead of calling more tools.
const NARRATION_STEERING: &str = "Narrate the result of the tool call for the user.";

/// Drives one user turn: first completion, at most one tool round-trip,
/// then the final human-readable answer.
///
/// The orchestrator is the only writer of the conversation state it is
/// handed. Turns run strictly sequentially per conversation; the `&mut`
/// borrows make interleaved turns on one state impossible.
pub struct Orchestrator {
    adapter: Box<dyn ModelAdapter>,
    registry: ToolRegistry,
}

impl Orchestrator {
    pub fn new(adapter: Box<dyn ModelAdapter>, registry: ToolRegistry) -> Self {
        Self { adapter, registry }
    }

    /// Release the underlying tool session.
    pub async fn disconnect(&mut self) -> ChatResult<()> {
        self.registry.disconnect().await
    }

    /// Process one user utterance through to its final answer.
    ///
    /// History mutations are atomic per turn: on any failure the protocol
    /// history is rolled back to its pre-turn state, so no partial turn is
    /// ever visible to later turns.
    pub async fn process_user_query(
        &mut self,
        state: &mut ConversationState,
        query: &str,
    ) -> ChatResult<String> {
        // Tools may change between turns, so re-fetch every time.
        let tools = self.registry.list_tools().await?;
        self.adapter.set_available_tools(&tools);

        state.begin_turn();
        let baseline = state.protocol_len();
        let result = self.run_turn(state, query).await;
        if result.is_err() {
            state.rollback_to(baseline);
        }
        result
    }

    async fn run_turn(
        &mut self,
        state: &mut ConversationState,
        query: &str,
    ) -> ChatResult<String> {
        state.append_protocol(self.adapter.user_message(query));

        let response = self.adapter.complete(state.protocol(), None).await?;
        self.commit_assistant_turn(state, self.adapter.assistant_turn(&response));
        for text in self.adapter.extract_text(&response) {
            state.push_transcript(text);
        }

        if let Some(intent) = self.adapter.extract_tool_call_intent(&response)? {
            self.resolve_tool_call(state, &intent).await?;
        }

        Ok(state.snapshot_transcript().join("\n"))
    }

    /// Execute the requested tool and run the follow-up completion. Exactly
    /// one tool call is resolved per turn: a further tool request in the
    /// follow-up response is not executed.
    async fn resolve_tool_call(
        &mut self,
        state: &mut ConversationState,
        intent: &ToolCallIntent,
    ) -> ChatResult<()> {
        let result = self
            .registry
            .call(Some(&intent.name), &intent.arguments)
            .await?;
        state.append_protocol(
            self.adapter
                .tool_result_message(&intent.call_id, &result),
        );

        let followup = self
            .adapter
            .complete(state.protocol(), Some(NARRATION_STEERING))
            .await?;
        self.commit_assistant_turn(state, self.adapter.assistant_turn(&followup));

        for text in self.adapter.extract_text(&followup) {
            state.push_transcript(text);
        }
        state.push_transcript(format!(
            "[Called tool {} with args {}]",
            intent.name, intent.arguments
        ));

        Ok(())
    }

    fn commit_assistant_turn(&self, state: &mut ConversationState, messages: Vec<Value>) {
        for message in messages {
            state.append_protocol(message);
        }
    }
}
