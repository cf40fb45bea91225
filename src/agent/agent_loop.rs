//! Agent loop with tool calling support
//!
//! The agent operates in two loops:
//! - Outer loop: the caller feeds user turns via `run_turn`
//! - Inner loop: tool execution (model requests tool → execute → continue)
//!
//! The loop makes no assumption about the model's selection strategy; it
//! only executes the calls the model asks for, feeds the results back, and
//! stops when the model stops asking.

use std::sync::Arc;

use crate::client::ToolDispatch;
use crate::error::Result;
use crate::llm::{ContentBlock, LlmProvider, Message, MessageResponse, StopReason};

use super::system_prompt::default_system_prompt;

/// Maximum number of tool rounds in a single turn
const MAX_TOOL_ITERATIONS: usize = 10;

/// Orchestrates the conversation between a provider and a tool set
pub struct Agent {
    provider: Box<dyn LlmProvider>,
    tools: Arc<dyn ToolDispatch>,
    system_prompt: String,
    history: Vec<Message>,
}

impl Agent {
    /// Create an agent over a provider and a tool dispatcher
    pub fn new(provider: Box<dyn LlmProvider>, tools: Arc<dyn ToolDispatch>) -> Self {
        Self {
            provider,
            tools,
            system_prompt: default_system_prompt().to_string(),
            history: Vec::new(),
        }
    }

    /// Replace the default system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Conversation history so far
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Process a single user turn (may involve multiple tool calls) and
    /// return the assistant's final text
    pub async fn run_turn(&mut self, user_text: &str) -> Result<String> {
        tracing::debug!("Processing turn: {}", user_text);
        self.history.push(Message::user(user_text));

        let tools = self.tools.definitions();
        let mut final_text: Vec<String> = Vec::new();

        let mut iteration = 0;
        loop {
            iteration += 1;
            if iteration > MAX_TOOL_ITERATIONS {
                tracing::warn!("Maximum tool iterations reached, stopping turn");
                break;
            }

            let response = self
                .provider
                .send_with_tools(&self.history, Some(&self.system_prompt), &tools)
                .await?;

            let (should_continue, text_parts) = self.process_response(&response).await;
            final_text.extend(text_parts);

            if !should_continue {
                break;
            }
        }

        Ok(final_text.join("\n"))
    }

    /// Process one model response
    ///
    /// Returns (should_continue, text_parts)
    async fn process_response(&mut self, response: &MessageResponse) -> (bool, Vec<String>) {
        let mut text_parts = Vec::new();
        let mut tool_results: Vec<ContentBlock> = Vec::new();
        let mut has_tool_use = false;

        for block in &response.content {
            match block {
                ContentBlock::Text { text } => {
                    if !text.is_empty() {
                        text_parts.push(text.clone());
                    }
                }
                ContentBlock::ToolUse { id, name, input } => {
                    has_tool_use = true;
                    tracing::info!("Tool use requested: {} ({})", name, id);

                    let result = match self.tools.call(name, input).await {
                        Ok(output) => {
                            tracing::debug!(
                                "Tool '{}' returned (is_error={}): {}",
                                name,
                                output.is_error,
                                output.text
                            );
                            ContentBlock::ToolResult {
                                tool_use_id: id.clone(),
                                content: output.text,
                                is_error: output.is_error,
                            }
                        }
                        Err(e) => {
                            tracing::warn!("Tool '{}' failed: {}", name, e);
                            ContentBlock::ToolResult {
                                tool_use_id: id.clone(),
                                content: format!("Tool execution failed: {}", e),
                                is_error: true,
                            }
                        }
                    };
                    tool_results.push(result);
                }
                ContentBlock::ToolResult { .. } => {
                    // Tool results never appear in assistant output
                    tracing::warn!("Unexpected ToolResult in assistant response");
                }
            }
        }

        self.history
            .push(Message::assistant_blocks(response.content.clone()));
        if !tool_results.is_empty() {
            self.history.push(Message::user_blocks(tool_results));
        }

        let should_continue =
            has_tool_use && matches!(response.stop_reason, Some(StopReason::ToolUse));
        (should_continue, text_parts)
    }
}
