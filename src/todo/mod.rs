//! Todo records and their storage
//!
//! The todo store is the only stateful part of the system. It owns every
//! `Todo` record, assigns ids, and guards the status lifecycle. Nothing
//! outside this module touches the backing state directly.

mod status;
mod storage;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use status::{TodoStatus, ALLOWED_STATUS_TOKENS};
pub use storage::{JsonFileTodoStorage, MemoryTodoStorage, TodoStorage};

use crate::error::Result;

/// Maximum task text length in characters
pub const MAX_TASK_LEN: usize = 256;

/// A single todo record
///
/// `id` and `task` are write-once; only `status` is mutable, and every
/// successful mutation refreshes `last_updated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    /// Store-assigned id, unique and never reused
    pub id: u64,
    /// The task description
    pub task: String,
    /// Current lifecycle status
    pub status: TodoStatus,
    /// Time of the most recent successful mutation (creation counts)
    pub last_updated: DateTime<Utc>,
}

impl Todo {
    /// Render this record in the listing line format consumed by callers:
    /// `"{id}: {task} [{status}] (Last updated: {timestamp})"`
    pub fn format_line(&self) -> String {
        format!(
            "{}: {} [{}] (Last updated: {})",
            self.id,
            self.task,
            self.status,
            self.last_updated.format("%Y-%m-%d %H:%M:%S"),
        )
    }
}

/// Seed the two sample records into an empty store
///
/// A store that already holds records is left alone, so restarting a server
/// never duplicates the samples. Returns whether seeding happened.
pub async fn seed_sample_todos(storage: &dyn TodoStorage) -> Result<bool> {
    if !storage.list().await?.is_empty() {
        tracing::debug!("Existing todos found, skipping initial population");
        return Ok(false);
    }

    storage
        .create("Review PR #102".to_string(), TodoStatus::InProgress)
        .await?;
    storage
        .create("Update documentation".to_string(), TodoStatus::Done)
        .await?;
    tracing::info!("Sample todos added");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_line() {
        let todo = Todo {
            id: 7,
            task: "Review PR #102".to_string(),
            status: TodoStatus::InProgress,
            last_updated: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        };
        assert_eq!(
            todo.format_line(),
            "7: Review PR #102 [in_progress] (Last updated: 2024-03-01 09:30:00)"
        );
    }

    #[tokio::test]
    async fn test_seed_sample_todos_once() {
        let storage = MemoryTodoStorage::new();

        assert!(seed_sample_todos(&storage).await.unwrap());
        let todos = storage.list().await.unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].task, "Review PR #102");
        assert_eq!(todos[0].status, TodoStatus::InProgress);
        assert_eq!(todos[1].task, "Update documentation");
        assert_eq!(todos[1].status, TodoStatus::Done);

        // A second pass must not duplicate the samples
        assert!(!seed_sample_todos(&storage).await.unwrap());
        assert_eq!(storage.list().await.unwrap().len(), 2);
    }
}
