use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
}

/// Content carried inside a tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text(TextContent),
}

impl Content {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Content::Text(TextContent { text: text.into() })
    }

    /// Get the text content if this is a Text variant
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(&text.text),
        }
    }
}

/// What a tool call produced, as returned by the tool session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<Content>,
}

impl ToolResult {
    pub fn new(content: Vec<Content>) -> Self {
        ToolResult { content }
    }

    pub fn text<S: Into<String>>(text: S) -> Self {
        ToolResult {
            content: vec![Content::text(text)],
        }
    }

    /// The sentinel result for a call with no tool name. A defined quiet
    /// branch, not an error.
    pub fn no_tool_called() -> Self {
        ToolResult::text("No tool was called. Missing tool name.")
    }

    /// First text segment of the result, the part reinjected into the
    /// conversation. Empty string when the tool returned no text.
    pub fn first_text(&self) -> &str {
        self.content
            .iter()
            .find_map(|content| content.as_text())
            .unwrap_or_default()
    }
}
