//! Tandem pairs an LLM with a session of remotely exposed tools.
//!
//! A turn of conversation flows through a handful of pieces:
//! - [`registry::ToolRegistry`] wraps the external tool session and exposes
//!   its tools in a provider-neutral shape
//! - [`adapters::ModelAdapter`] translates between that neutral shape and a
//!   specific completion API's wire format (Anthropic messages, OpenAI
//!   responses)
//! - [`conversation::ConversationState`] owns the provider-formatted message
//!   history plus the turn-scoped human transcript
//! - [`orchestrator::Orchestrator`] drives one user turn end to end,
//!   resolving at most one tool call before producing the final answer
pub mod adapters;
pub mod conversation;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod registry;
