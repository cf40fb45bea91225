//! Provider-neutral message types
//!
//! The agent loop and tool dispatch speak these types; translation to a
//! concrete provider's wire format happens inside that provider.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single conversation message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// "user" or "assistant"
    pub role: String,
    /// Ordered content blocks
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Create a user message with plain text content
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// Create a user message from content blocks (tool results)
    pub fn user_blocks(content: Vec<ContentBlock>) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }

    /// Create an assistant message from content blocks
    pub fn assistant_blocks(content: Vec<ContentBlock>) -> Self {
        Self {
            role: "assistant".to_string(),
            content,
        }
    }
}

/// One block of message content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text
    Text { text: String },
    /// The model requests a tool invocation
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    /// The result of a tool invocation, fed back to the model
    ToolResult {
        tool_use_id: String,
        content: String,
        is_error: bool,
    },
}

/// A tool advertised to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name the model invokes the tool by
    pub name: String,
    /// Purpose string the model selects tools from; names allowed
    /// enumeration values where arguments are constrained
    pub description: String,
    /// JSON Schema for the tool's arguments
    pub input_schema: Value,
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    ToolUse,
    Refusal,
}

/// Token accounting for one request
#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A complete model response
#[derive(Debug, Clone)]
pub struct MessageResponse {
    /// Model that produced the response
    pub model: String,
    /// Ordered content blocks
    pub content: Vec<ContentBlock>,
    /// Why generation stopped, when the provider reported it
    pub stop_reason: Option<StopReason>,
    /// Token usage
    pub usage: Usage,
}

impl MessageResponse {
    /// Concatenated text blocks of the response
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
