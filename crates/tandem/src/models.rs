//! Objects passed between the orchestrator, the tool registry and the
//! model adapters.
//!
//! The wire formats on either side differ: tool sessions speak a
//! JSON-Schema-flavored discovery format, while each completion API has its
//! own message and tool shapes. Everything is converted into these neutral
//! structs at the boundary; only the adapters ever see provider wire shapes.
pub mod content;
pub mod tool;
