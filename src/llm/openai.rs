//! OpenAI-compatible chat-completions client
//!
//! Works against any endpoint speaking the OpenAI Chat Completions API;
//! Groq's endpoint is the default when `GROQ_API_KEY` is set. Translation
//! between the provider-neutral types and the wire format happens here and
//! nowhere else.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;

use super::provider::LlmProvider;
use super::types::{ContentBlock, Message, MessageResponse, StopReason, ToolDefinition, Usage};
use crate::error::{Error, Result};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_GROQ_MODEL: &str = "qwen/qwen3-32b";

const DEFAULT_MAX_TOKENS: u32 = 4096;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAiTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiToolCall {
    id: String,
    #[serde(rename = "type")]
    tool_type: String,
    function: OpenAiFunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiFunctionCall {
    name: String,
    arguments: String, // JSON string
}

#[derive(Debug, Serialize)]
struct OpenAiTool {
    #[serde(rename = "type")]
    tool_type: String,
    function: OpenAiFunctionDefinition,
}

#[derive(Debug, Serialize)]
struct OpenAiFunctionDefinition {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    model: String,
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

// ============================================================================
// OpenAiProvider
// ============================================================================

/// OpenAI-compatible LLM provider
///
/// ```ignore
/// // Groq (preferred) or OpenAI, whichever key is set
/// let llm = OpenAiProvider::from_env()?;
///
/// // Explicit configuration
/// let llm = OpenAiProvider::new("sk-...").with_model("gpt-4o-mini");
/// ```
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiProvider {
    /// Create a provider from environment variables
    ///
    /// `GROQ_API_KEY` selects the Groq endpoint; otherwise `OPENAI_API_KEY`
    /// selects the OpenAI endpoint. `LLM_MODEL` overrides the per-endpoint
    /// default model.
    pub fn from_env() -> Result<Self> {
        let (api_key, api_base, default_model) = if let Ok(key) = env::var("GROQ_API_KEY") {
            (key, GROQ_API_BASE, DEFAULT_GROQ_MODEL)
        } else if let Ok(key) = env::var("OPENAI_API_KEY") {
            (key, OPENAI_API_BASE, DEFAULT_OPENAI_MODEL)
        } else {
            return Err(Error::Llm(
                "neither GROQ_API_KEY nor OPENAI_API_KEY is set".to_string(),
            ));
        };

        let model = env::var("LLM_MODEL").unwrap_or_else(|_| default_model.to_string());
        tracing::info!("Using model {} at {}", model, api_base);

        Ok(Self::new(api_key).with_base_url(api_base).with_model(model))
    }

    /// Create a provider with an explicit API key against the OpenAI endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_base: OPENAI_API_BASE.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the API base URL
    pub fn with_base_url(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the max tokens for responses
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    // ========================================================================
    // Format conversion: neutral -> OpenAI
    // ========================================================================

    fn convert_messages(
        &self,
        messages: &[Message],
        system_prompt: Option<&str>,
    ) -> Vec<OpenAiMessage> {
        let mut openai_messages = Vec::new();

        if let Some(system) = system_prompt {
            openai_messages.push(OpenAiMessage {
                role: "system".to_string(),
                content: Some(system.to_string()),
                tool_calls: None,
                tool_call_id: None,
            });
        }

        for msg in messages {
            self.convert_blocks(&msg.content, &msg.role, &mut openai_messages);
        }

        openai_messages
    }

    fn convert_blocks(
        &self,
        blocks: &[ContentBlock],
        role: &str,
        openai_messages: &mut Vec<OpenAiMessage>,
    ) {
        let mut text_parts: Vec<String> = Vec::new();
        let mut tool_calls: Vec<OpenAiToolCall> = Vec::new();
        let mut tool_results: Vec<(String, String)> = Vec::new();

        for block in blocks {
            match block {
                ContentBlock::Text { text } => {
                    if !text.is_empty() {
                        text_parts.push(text.clone());
                    }
                }
                ContentBlock::ToolUse { id, name, input } => {
                    let arguments =
                        serde_json::to_string(input).unwrap_or_else(|_| "{}".to_string());
                    tool_calls.push(OpenAiToolCall {
                        id: id.clone(),
                        tool_type: "function".to_string(),
                        function: OpenAiFunctionCall {
                            name: name.clone(),
                            arguments,
                        },
                    });
                }
                ContentBlock::ToolResult {
                    tool_use_id,
                    content,
                    is_error,
                } => {
                    // Tool results are separate messages with role "tool"
                    let formatted = if *is_error {
                        format!("Error: {}", content)
                    } else {
                        content.clone()
                    };
                    tool_results.push((tool_use_id.clone(), formatted));
                }
            }
        }

        if role == "assistant" {
            // Assistant messages can carry both text and tool calls
            let content = if text_parts.is_empty() {
                None
            } else {
                Some(text_parts.join("\n"))
            };
            openai_messages.push(OpenAiMessage {
                role: role.to_string(),
                content,
                tool_calls: if tool_calls.is_empty() {
                    None
                } else {
                    Some(tool_calls)
                },
                tool_call_id: None,
            });
        } else if !text_parts.is_empty() {
            openai_messages.push(OpenAiMessage {
                role: "user".to_string(),
                content: Some(text_parts.join("\n")),
                tool_calls: None,
                tool_call_id: None,
            });
        }

        for (tool_call_id, content) in tool_results {
            openai_messages.push(OpenAiMessage {
                role: "tool".to_string(),
                content: Some(content),
                tool_calls: None,
                tool_call_id: Some(tool_call_id),
            });
        }
    }

    fn convert_tools(&self, tools: &[ToolDefinition]) -> Option<Vec<OpenAiTool>> {
        if tools.is_empty() {
            return None;
        }
        Some(
            tools
                .iter()
                .map(|tool| OpenAiTool {
                    tool_type: "function".to_string(),
                    function: OpenAiFunctionDefinition {
                        name: tool.name.clone(),
                        description: tool.description.clone(),
                        parameters: tool.input_schema.clone(),
                    },
                })
                .collect(),
        )
    }

    // ========================================================================
    // Format conversion: OpenAI -> neutral
    // ========================================================================

    fn convert_response(&self, response: OpenAiResponse) -> Result<MessageResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Llm("no choices in response".to_string()))?;

        let mut content = Vec::new();
        if let Some(text) = &choice.message.content {
            if !text.is_empty() {
                content.push(ContentBlock::Text { text: text.clone() });
            }
        }
        if let Some(tool_calls) = &choice.message.tool_calls {
            for call in tool_calls {
                let input: Value = serde_json::from_str(&call.function.arguments)
                    .unwrap_or_else(|_| serde_json::json!({}));
                content.push(ContentBlock::ToolUse {
                    id: call.id.clone(),
                    name: call.function.name.clone(),
                    input,
                });
            }
        }

        let stop_reason = choice.finish_reason.as_deref().map(|reason| match reason {
            "length" => StopReason::MaxTokens,
            "tool_calls" => StopReason::ToolUse,
            "content_filter" => StopReason::Refusal,
            _ => StopReason::EndTurn,
        });

        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(MessageResponse {
            model: response.model,
            content,
            stop_reason,
            usage,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn send_with_tools(
        &self,
        messages: &[Message],
        system_prompt: Option<&str>,
        tools: &[ToolDefinition],
    ) -> Result<MessageResponse> {
        let request = OpenAiRequest {
            model: self.model.clone(),
            messages: self.convert_messages(messages, system_prompt),
            max_tokens: Some(self.max_tokens),
            tools: self.convert_tools(tools),
            tool_choice: if tools.is_empty() {
                None
            } else {
                Some("auto".to_string())
            },
        };

        let url = format!("{}/chat/completions", self.api_base);
        tracing::debug!("Sending chat-completions request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Llm(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Llm(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            tracing::error!("Chat-completions API error: {} - {}", status, body);
            return Err(Error::Llm(format!("API error ({}): {}", status, body)));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Llm(format!("failed to parse response: {}", e)))?;

        self.convert_response(openai_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new("test-key")
    }

    #[test]
    fn test_convert_response_with_tool_call() {
        let raw = json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 0,
            "model": "test-model",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "add_todo",
                            "arguments": "{\"task\":\"Review PR #102\",\"status\":\"in_progress\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
        });

        let response: OpenAiResponse = serde_json::from_value(raw).unwrap();
        let converted = provider().convert_response(response).unwrap();

        assert_eq!(converted.stop_reason, Some(StopReason::ToolUse));
        assert_eq!(converted.usage.input_tokens, 12);
        match &converted.content[0] {
            ContentBlock::ToolUse { name, input, .. } => {
                assert_eq!(name, "add_todo");
                assert_eq!(input["task"], "Review PR #102");
                assert_eq!(input["status"], "in_progress");
            }
            other => panic!("expected tool use, got {:?}", other),
        }
    }

    #[test]
    fn test_convert_response_with_text() {
        let raw = json!({
            "model": "test-model",
            "choices": [{
                "message": {"role": "assistant", "content": "All done."},
                "finish_reason": "stop"
            }]
        });

        let response: OpenAiResponse = serde_json::from_value(raw).unwrap();
        let converted = provider().convert_response(response).unwrap();

        assert_eq!(converted.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(converted.text(), "All done.");
    }

    #[test]
    fn test_tool_results_become_tool_role_messages() {
        let messages = vec![
            Message::user("list my todos"),
            Message::assistant_blocks(vec![ContentBlock::ToolUse {
                id: "call_1".to_string(),
                name: "list_todos".to_string(),
                input: json!({}),
            }]),
            Message::user_blocks(vec![ContentBlock::ToolResult {
                tool_use_id: "call_1".to_string(),
                content: "1: Review PR #102 [in_progress]".to_string(),
                is_error: false,
            }]),
        ];

        let converted = provider().convert_messages(&messages, Some("You are helpful."));

        assert_eq!(converted.len(), 4);
        assert_eq!(converted[0].role, "system");
        assert_eq!(converted[1].role, "user");
        assert_eq!(converted[2].role, "assistant");
        assert!(converted[2].tool_calls.is_some());
        assert_eq!(converted[3].role, "tool");
        assert_eq!(converted[3].tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn test_error_tool_result_is_prefixed() {
        let messages = vec![Message::user_blocks(vec![ContentBlock::ToolResult {
            tool_use_id: "call_9".to_string(),
            content: "Invalid status: cancelled. Allowed: pending, in_progress, done.".to_string(),
            is_error: true,
        }])];

        let converted = provider().convert_messages(&messages, None);
        assert_eq!(converted.len(), 1);
        assert!(converted[0]
            .content
            .as_deref()
            .unwrap()
            .starts_with("Error: Invalid status"));
    }
}
