use anyhow::Result as AnyhowResult;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::errors::{ChatError, ChatResult};
use crate::models::content::ToolResult;
use crate::models::tool::ToolDescriptor;

/// The external tool session: discovery plus invocation over some transport
/// (stdio, SSE, in-process). The transport itself is opaque to the rest of
/// the crate.
#[async_trait]
pub trait ToolSession: Send + Sync {
    /// Perform the session handshake. Called once before any turn runs.
    async fn initialize(&self) -> AnyhowResult<()> {
        Ok(())
    }

    /// Discover the tools currently exposed by the session.
    async fn list_tools(&self) -> AnyhowResult<Vec<ToolDescriptor>>;

    /// Invoke a named tool with the given arguments.
    async fn call_tool(&self, name: &str, arguments: &Value) -> AnyhowResult<ToolResult>;

    /// Release session resources. Must be invoked on every exit path.
    async fn shutdown(&self) -> AnyhowResult<()> {
        Ok(())
    }
}

/// Wraps the tool session behind the narrow surface the orchestrator needs.
///
/// A registry without a session is a valid, quiet state: it lists no tools
/// and rejects invocations, but listing never fails on it.
pub struct ToolRegistry {
    session: Option<Arc<dyn ToolSession>>,
}

impl ToolRegistry {
    pub fn new(session: Arc<dyn ToolSession>) -> Self {
        ToolRegistry {
            session: Some(session),
        }
    }

    pub fn disconnected() -> Self {
        ToolRegistry { session: None }
    }

    /// Connect the registry's session, running its handshake.
    pub async fn connect(session: Arc<dyn ToolSession>) -> ChatResult<Self> {
        session
            .initialize()
            .await
            .map_err(|e| ChatError::Connection(e.to_string()))?;
        Ok(ToolRegistry::new(session))
    }

    /// Release the underlying session, if any.
    pub async fn disconnect(&mut self) -> ChatResult<()> {
        if let Some(session) = self.session.take() {
            session
                .shutdown()
                .await
                .map_err(|e| ChatError::Connection(e.to_string()))?;
        }
        Ok(())
    }

    /// Tools currently available. Empty when no session is connected;
    /// a discovery failure on a live session is a connection error.
    pub async fn list_tools(&self) -> ChatResult<Vec<ToolDescriptor>> {
        let Some(session) = &self.session else {
            return Ok(Vec::new());
        };
        session
            .list_tools()
            .await
            .map_err(|e| ChatError::Connection(e.to_string()))
    }

    /// Invoke a tool by name. `None` is a defined no-op branch that yields
    /// the sentinel "no tool was called" result rather than an error.
    pub async fn call(&self, name: Option<&str>, arguments: &Value) -> ChatResult<ToolResult> {
        let Some(name) = name else {
            return Ok(ToolResult::no_tool_called());
        };

        let Some(session) = &self.session else {
            return Err(ChatError::ToolInvocation {
                tool: name.to_string(),
                reason: "no tool session is connected".to_string(),
            });
        };

        session
            .call_tool(name, arguments)
            .await
            .map_err(|e| ChatError::ToolInvocation {
                tool: name.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoSession {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ToolSession for EchoSession {
        async fn list_tools(&self) -> AnyhowResult<Vec<ToolDescriptor>> {
            Ok(vec![ToolDescriptor::new(
                "echo",
                "Echo the input back",
                json!({"type": "object", "properties": {}, "required": []}),
            )])
        }

        async fn call_tool(&self, name: &str, arguments: &Value) -> AnyhowResult<ToolResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if name == "echo" {
                Ok(ToolResult::text(arguments.to_string()))
            } else {
                Err(anyhow!("unknown tool: {}", name))
            }
        }
    }

    fn echo_registry() -> ToolRegistry {
        ToolRegistry::new(Arc::new(EchoSession {
            calls: AtomicUsize::new(0),
        }))
    }

    #[tokio::test]
    async fn test_list_tools_without_session_is_empty() {
        let registry = ToolRegistry::disconnected();
        let tools = registry.list_tools().await.unwrap();
        assert!(tools.is_empty());
    }

    #[tokio::test]
    async fn test_call_without_name_returns_sentinel() {
        let registry = echo_registry();
        let result = registry.call(None, &json!({})).await.unwrap();
        assert_eq!(result, ToolResult::no_tool_called());
    }

    #[tokio::test]
    async fn test_call_without_name_never_reaches_session() {
        // Even on a disconnected registry the None branch stays quiet.
        let registry = ToolRegistry::disconnected();
        let result = registry.call(None, &json!({})).await.unwrap();
        assert_eq!(result.first_text(), "No tool was called. Missing tool name.");
    }

    #[tokio::test]
    async fn test_call_known_tool() {
        let registry = echo_registry();
        let result = registry
            .call(Some("echo"), &json!({"msg": "hi"}))
            .await
            .unwrap();
        assert_eq!(result.first_text(), r#"{"msg":"hi"}"#);
    }

    #[tokio::test]
    async fn test_call_rejected_by_session() {
        let registry = echo_registry();
        let err = registry.call(Some("missing"), &json!({})).await.unwrap_err();
        match err {
            ChatError::ToolInvocation { tool, reason } => {
                assert_eq!(tool, "missing");
                assert!(reason.contains("unknown tool"));
            }
            other => panic!("expected ToolInvocation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_call_on_disconnected_registry_fails() {
        let registry = ToolRegistry::disconnected();
        let err = registry.call(Some("echo"), &json!({})).await.unwrap_err();
        assert!(matches!(err, ChatError::ToolInvocation { .. }));
    }
}
