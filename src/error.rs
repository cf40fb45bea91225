//! Error types for the taskdesk library
//!
//! Domain outcomes that the agent is expected to read (invalid status,
//! not found) are rendered as descriptive strings at the tool boundary;
//! the variants here carry enough context to produce those strings.

use thiserror::Error;

use crate::todo::{ALLOWED_STATUS_TOKENS, MAX_TASK_LEN};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the taskdesk library
#[derive(Debug, Error)]
pub enum Error {
    /// A status token outside the fixed enumeration was supplied
    #[error("Invalid status: {value}. Allowed: {allowed}.", allowed = ALLOWED_STATUS_TOKENS)]
    InvalidStatus {
        /// The offending token, verbatim
        value: String,
    },

    /// Task text failed validation (empty or over the length bound)
    #[error("Invalid task: {reason} (tasks must be non-empty and at most {max} characters)", max = MAX_TASK_LEN)]
    InvalidTask {
        /// What was wrong with the task text
        reason: String,
    },

    /// Underlying persistence failure; fatal for the current request only
    #[error("Storage error: {0}")]
    Storage(String),

    /// A tool server could not be reached during discovery or invocation
    #[error("Server '{server}' unreachable: {message}")]
    Unreachable {
        /// Endpoint id of the server that failed
        server: String,
        /// Transport-level failure description
        message: String,
    },

    /// A tool server did not answer within the bounded wait
    #[error("Server '{server}' timed out after {seconds}s")]
    Timeout {
        /// Endpoint id of the server that failed
        server: String,
        /// The bound that was exceeded
        seconds: u64,
    },

    /// A tool invocation failed at the protocol level
    #[error("Tool call '{tool}' failed: {message}")]
    ToolCall {
        /// Name of the tool that was invoked
        tool: String,
        /// Failure description from the transport or server
        message: String,
    },

    /// No tool with the requested name exists in the aggregated set
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// LLM provider request or response handling failed
    #[error("LLM provider error: {0}")]
    Llm(String),

    /// Configuration could not be loaded or parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Storage(e.to_string())
    }
}
