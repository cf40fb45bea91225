//! Todo status enumeration
//!
//! A closed sum type: no status outside the three variants is
//! representable, and invalid wire tokens are rejected at the parse
//! boundary rather than inside store logic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The allowed wire tokens, in the order they are advertised to callers
pub const ALLOWED_STATUS_TOKENS: &str = "pending, in_progress, done";

/// Lifecycle status of a todo record
///
/// Wire tokens are the exact lowercase strings `pending`, `in_progress`
/// and `done`; matching is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Pending,
    InProgress,
    Done,
}

impl TodoStatus {
    /// The wire token for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Pending => "pending",
            TodoStatus::InProgress => "in_progress",
            TodoStatus::Done => "done",
        }
    }
}

impl Default for TodoStatus {
    fn default() -> Self {
        TodoStatus::Pending
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TodoStatus::Pending),
            "in_progress" => Ok(TodoStatus::InProgress),
            "done" => Ok(TodoStatus::Done),
            other => Err(Error::InvalidStatus {
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_tokens_round_trip() {
        for token in ["pending", "in_progress", "done"] {
            let status: TodoStatus = token.parse().unwrap();
            assert_eq!(status.to_string(), token);
        }
    }

    #[test]
    fn test_invalid_tokens_rejected() {
        for token in ["cancelled", "PENDING", "In_Progress", "", "done "] {
            let err = TodoStatus::from_str(token).unwrap_err();
            let message = err.to_string();
            assert!(message.contains(token.trim_end()) || token.is_empty());
            assert!(message.contains("pending, in_progress, done"));
        }
    }

    #[test]
    fn test_serde_uses_wire_tokens() {
        let json = serde_json::to_string(&TodoStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");

        let status: TodoStatus = serde_json::from_str("\"done\"").unwrap();
        assert_eq!(status, TodoStatus::Done);

        assert!(serde_json::from_str::<TodoStatus>("\"cancelled\"").is_err());
    }

    #[test]
    fn test_default_is_pending() {
        assert_eq!(TodoStatus::default(), TodoStatus::Pending);
    }
}
