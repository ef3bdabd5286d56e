use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ChatError {
    /// The tool session is unreachable or its handshake failed. Fatal to the
    /// whole session, surfaced before any turn runs.
    #[error("Could not connect to tool session: {0}")]
    Connection(String),

    /// The completion call to the model provider failed. Fatal to the current
    /// turn; never retried here.
    #[error("Completion request to {provider} failed: {source}")]
    Completion {
        provider: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// The tool session rejected or failed the requested call.
    #[error("Tool call '{tool}' failed: {reason}")]
    ToolInvocation { tool: String, reason: String },

    /// The model requested a tool but its arguments could not be decoded.
    /// Distinct from `ToolInvocation`: the fault is in the model output,
    /// not the tool.
    #[error("Could not decode arguments for tool call {call_id}: {source}")]
    MalformedToolArguments {
        call_id: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type ChatResult<T> = Result<T, ChatError>;
