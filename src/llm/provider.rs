//! LLM provider trait
//!
//! The agent loop is provider-agnostic; anything that can answer a
//! conversation with optional tool definitions plugs in here.

use async_trait::async_trait;

use super::types::{Message, MessageResponse, ToolDefinition};
use crate::error::Result;

/// A language-model backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a conversation and the advertised tools, returning the model's
    /// next message
    async fn send_with_tools(
        &self,
        messages: &[Message],
        system_prompt: Option<&str>,
        tools: &[ToolDefinition],
    ) -> Result<MessageResponse>;
}
