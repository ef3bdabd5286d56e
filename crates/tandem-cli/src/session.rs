use tandem::conversation::ConversationState;
use tandem::orchestrator::Orchestrator;

/// What one line of user input produced.
pub enum TurnOutcome {
    /// The user asked to leave; no completion call was made.
    Quit,
    /// The turn ran to completion.
    Answer(String),
    /// The turn failed; the loop keeps accepting input.
    Failed(String),
}

/// One interactive chat session: the conversation state plus the
/// orchestrator driving it. Input and output stay with the caller so the
/// loop can be exercised without a terminal.
pub struct ChatSession {
    orchestrator: Orchestrator,
    state: ConversationState,
}

impl ChatSession {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            state: ConversationState::new(),
        }
    }

    /// Process one line of user input. `quit` (case-insensitive) ends the
    /// session before any completion call; turn failures are reported, not
    /// propagated, so the read loop never dies on a bad turn.
    pub async fn handle_line(&mut self, line: &str) -> TurnOutcome {
        let query = line.trim();
        if query.eq_ignore_ascii_case("quit") {
            return TurnOutcome::Quit;
        }

        match self
            .orchestrator
            .process_user_query(&mut self.state, query)
            .await
        {
            Ok(answer) => TurnOutcome::Answer(answer),
            Err(e) => TurnOutcome::Failed(e.to_string()),
        }
    }

    /// Tear down the tool session. Called on every exit path.
    pub async fn close(&mut self) {
        if let Err(e) = self.orchestrator.disconnect().await {
            eprintln!("Error closing tool session: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use tandem::adapters::base::{ModelAdapter, ModelResponse};
    use tandem::errors::{ChatError, ChatResult};
    use tandem::models::content::ToolResult;
    use tandem::models::tool::{ToolCallIntent, ToolDescriptor};
    use tandem::registry::ToolRegistry;

    /// Fails the test if any completion is ever attempted.
    struct UnreachableAdapter;

    #[async_trait]
    impl ModelAdapter for UnreachableAdapter {
        fn provider(&self) -> &'static str {
            "unreachable"
        }

        fn set_available_tools(&mut self, _tools: &[ToolDescriptor]) {}

        async fn complete(
            &self,
            _history: &[Value],
            _steering: Option<&str>,
        ) -> ChatResult<ModelResponse> {
            panic!("complete must not be called");
        }

        fn user_message(&self, _text: &str) -> Value {
            panic!("user_message must not be called");
        }

        fn assistant_turn(&self, _response: &ModelResponse) -> Vec<Value> {
            unreachable!()
        }

        fn tool_result_message(&self, _call_id: &str, _result: &ToolResult) -> Value {
            unreachable!()
        }

        fn extract_tool_call_intent(
            &self,
            _response: &ModelResponse,
        ) -> ChatResult<Option<ToolCallIntent>> {
            unreachable!()
        }

        fn extract_text(&self, _response: &ModelResponse) -> Vec<String> {
            unreachable!()
        }
    }

    /// Always fails the completion call.
    struct FailingAdapter;

    #[async_trait]
    impl ModelAdapter for FailingAdapter {
        fn provider(&self) -> &'static str {
            "failing"
        }

        fn set_available_tools(&mut self, _tools: &[ToolDescriptor]) {}

        async fn complete(
            &self,
            _history: &[Value],
            _steering: Option<&str>,
        ) -> ChatResult<ModelResponse> {
            Err(ChatError::Completion {
                provider: "failing",
                source: anyhow::anyhow!("connection refused"),
            })
        }

        fn user_message(&self, text: &str) -> Value {
            serde_json::json!({"role": "user", "content": text})
        }

        fn assistant_turn(&self, _response: &ModelResponse) -> Vec<Value> {
            Vec::new()
        }

        fn tool_result_message(&self, _call_id: &str, _result: &ToolResult) -> Value {
            Value::Null
        }

        fn extract_tool_call_intent(
            &self,
            _response: &ModelResponse,
        ) -> ChatResult<Option<ToolCallIntent>> {
            Ok(None)
        }

        fn extract_text(&self, _response: &ModelResponse) -> Vec<String> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn test_quit_skips_completion() {
        let orchestrator =
            Orchestrator::new(Box::new(UnreachableAdapter), ToolRegistry::disconnected());
        let mut session = ChatSession::new(orchestrator);

        assert!(matches!(session.handle_line("quit").await, TurnOutcome::Quit));
        assert!(matches!(session.handle_line("QUIT").await, TurnOutcome::Quit));
        assert!(matches!(
            session.handle_line("  Quit  ").await,
            TurnOutcome::Quit
        ));
    }

    #[tokio::test]
    async fn test_failed_turn_is_reported_not_fatal() {
        let orchestrator =
            Orchestrator::new(Box::new(FailingAdapter), ToolRegistry::disconnected());
        let mut session = ChatSession::new(orchestrator);

        match session.handle_line("hello").await {
            TurnOutcome::Failed(message) => assert!(message.contains("failing")),
            _ => panic!("expected Failed outcome"),
        }

        // The loop keeps going: the next line is still accepted.
        assert!(matches!(session.handle_line("quit").await, TurnOutcome::Quit));
    }
}
