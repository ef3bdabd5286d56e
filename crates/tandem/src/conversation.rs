use serde_json::Value;

/// The two parallel histories of one conversation.
///
/// `protocol` holds provider-shaped messages and is sent verbatim to the
/// model on every completion call. It is append-only for the life of the
/// session; the single exception is [`rollback_to`](Self::rollback_to),
/// which restores the pre-turn state after a failed turn so no partial
/// mutation is ever visible to later turns.
///
/// The transcript is turn-scoped: it is cleared by
/// [`begin_turn`](Self::begin_turn) and rebuilt as the turn progresses.
/// Callers that want a cross-turn transcript accumulate the returned
/// answers themselves.
#[derive(Debug, Default)]
pub struct ConversationState {
    protocol: Vec<Value>,
    transcript: Vec<String>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn protocol(&self) -> &[Value] {
        &self.protocol
    }

    pub fn protocol_len(&self) -> usize {
        self.protocol.len()
    }

    pub fn append_protocol(&mut self, message: Value) {
        self.protocol.push(message);
    }

    /// Discard any protocol messages appended after `len`. Used only to
    /// unwind a failed turn back to its baseline.
    pub(crate) fn rollback_to(&mut self, len: usize) {
        self.protocol.truncate(len);
    }

    /// Start a fresh turn: the transcript from the previous turn is dropped.
    pub fn begin_turn(&mut self) {
        self.transcript.clear();
    }

    pub fn push_transcript<S: Into<String>>(&mut self, line: S) {
        self.transcript.push(line.into());
    }

    pub fn snapshot_transcript(&self) -> Vec<String> {
        self.transcript.clone()
    }

    /// Explicit full reset, for reconnecting a session.
    pub fn reset(&mut self) {
        self.protocol.clear();
        self.transcript.clear();
    }
}
