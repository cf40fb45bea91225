//! Storage backends for todo records
//!
//! `TodoStorage` is the interface the rest of the system programs against;
//! the engine behind it is swappable. Two implementations are provided: an
//! in-memory store and a JSON-file-backed store. Both serialize mutations
//! under a write lock, so each operation is atomic with respect to the
//! record it targets.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{Todo, TodoStatus, MAX_TASK_LEN};
use crate::error::{Error, Result};

/// Interface the core needs from a persistence engine
#[async_trait]
pub trait TodoStorage: Send + Sync {
    /// Create a new record with a fresh id and `last_updated` = now
    ///
    /// Fails with `Error::InvalidTask` when the task text is empty or over
    /// the length bound; nothing is persisted in that case.
    async fn create(&self, task: String, status: TodoStatus) -> Result<Todo>;

    /// All current records in insertion (id) order; empty when the store is empty
    async fn list(&self) -> Result<Vec<Todo>>;

    /// Set the status of a record and refresh its `last_updated`
    ///
    /// Returns `Ok(None)` when no record has the given id. That is a normal
    /// outcome, not a fault.
    async fn update_status(&self, id: u64, status: TodoStatus) -> Result<Option<Todo>>;

    /// Remove a record permanently; the id is never reassigned
    ///
    /// Returns `Ok(false)` when no record has the given id.
    async fn delete(&self, id: u64) -> Result<bool>;
}

/// In-memory state shared by both storage implementations
///
/// `next_id` only ever grows, so deleted ids are never handed out again.
#[derive(Debug, Serialize, Deserialize)]
struct StoreState {
    next_id: u64,
    todos: BTreeMap<u64, Todo>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            next_id: 1,
            todos: BTreeMap::new(),
        }
    }
}

impl StoreState {
    fn create(&mut self, task: String, status: TodoStatus) -> Result<Todo> {
        validate_task(&task)?;

        let todo = Todo {
            id: self.next_id,
            task,
            status,
            last_updated: Utc::now(),
        };
        self.next_id += 1;
        self.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    fn list(&self) -> Vec<Todo> {
        // BTreeMap iteration is id order, which is insertion order here
        self.todos.values().cloned().collect()
    }

    fn update_status(&mut self, id: u64, status: TodoStatus) -> Option<Todo> {
        let todo = self.todos.get_mut(&id)?;
        todo.status = status;
        // last_updated must never go backwards, even across clock steps
        todo.last_updated = Utc::now().max(todo.last_updated);
        Some(todo.clone())
    }

    fn delete(&mut self, id: u64) -> bool {
        self.todos.remove(&id).is_some()
    }
}

fn validate_task(task: &str) -> Result<()> {
    if task.is_empty() {
        return Err(Error::InvalidTask {
            reason: "task is empty".to_string(),
        });
    }
    if task.chars().count() > MAX_TASK_LEN {
        return Err(Error::InvalidTask {
            reason: format!("task is {} characters long", task.chars().count()),
        });
    }
    Ok(())
}

/// In-memory todo store
///
/// Used by tests and anywhere a zero-setup store is good enough.
#[derive(Debug, Default)]
pub struct MemoryTodoStorage {
    state: RwLock<StoreState>,
}

impl MemoryTodoStorage {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStorage for MemoryTodoStorage {
    async fn create(&self, task: String, status: TodoStatus) -> Result<Todo> {
        self.state.write().await.create(task, status)
    }

    async fn list(&self) -> Result<Vec<Todo>> {
        Ok(self.state.read().await.list())
    }

    async fn update_status(&self, id: u64, status: TodoStatus) -> Result<Option<Todo>> {
        Ok(self.state.write().await.update_status(id, status))
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        Ok(self.state.write().await.delete(id))
    }
}

/// JSON-file-backed todo store
///
/// The whole state (records plus the id counter) lives in one JSON file,
/// rewritten after every successful mutation while the write lock is still
/// held. Disk failures surface as `Error::Storage` and fail only the
/// request that hit them.
#[derive(Debug)]
pub struct JsonFileTodoStorage {
    path: PathBuf,
    state: RwLock<StoreState>,
}

impl JsonFileTodoStorage {
    /// Open the store at `path`, loading existing state if the file exists
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let state = if tokio::fs::try_exists(&path).await? {
            let raw = tokio::fs::read_to_string(&path).await?;
            serde_json::from_str(&raw)
                .map_err(|e| Error::Storage(format!("corrupt store file {}: {}", path.display(), e)))?
        } else {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
            StoreState::default()
        };

        tracing::info!(
            "Opened todo store at {} ({} records)",
            path.display(),
            state.todos.len()
        );

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, state: &StoreState) -> Result<()> {
        let raw = serde_json::to_string_pretty(state)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

#[async_trait]
impl TodoStorage for JsonFileTodoStorage {
    async fn create(&self, task: String, status: TodoStatus) -> Result<Todo> {
        let mut state = self.state.write().await;
        let todo = state.create(task, status)?;
        self.flush(&state).await?;
        Ok(todo)
    }

    async fn list(&self) -> Result<Vec<Todo>> {
        Ok(self.state.read().await.list())
    }

    async fn update_status(&self, id: u64, status: TodoStatus) -> Result<Option<Todo>> {
        let mut state = self.state.write().await;
        match state.update_status(id, status) {
            Some(todo) => {
                self.flush(&state).await?;
                Ok(Some(todo))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.delete(id) {
            self.flush(&state).await?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let storage = MemoryTodoStorage::new();

        let a = storage
            .create("Review PR #102".to_string(), TodoStatus::InProgress)
            .await
            .unwrap();
        let b = storage
            .create("Update documentation".to_string(), TodoStatus::Done)
            .await
            .unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);

        let todos = storage.list().await.unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].status, TodoStatus::InProgress);
        assert_eq!(todos[1].status, TodoStatus::Done);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_tasks() {
        let storage = MemoryTodoStorage::new();

        assert!(matches!(
            storage.create(String::new(), TodoStatus::Pending).await,
            Err(Error::InvalidTask { .. })
        ));
        assert!(matches!(
            storage.create("x".repeat(257), TodoStatus::Pending).await,
            Err(Error::InvalidTask { .. })
        ));
        // A rejected create must not leave partial state behind
        assert!(storage.list().await.unwrap().is_empty());

        // Exactly at the bound is fine
        assert!(storage
            .create("x".repeat(256), TodoStatus::Pending)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_update_status_refreshes_timestamp() {
        let storage = MemoryTodoStorage::new();
        let created = storage
            .create("Prepare the monthly SRE report".to_string(), TodoStatus::Pending)
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let updated = storage
            .update_status(created.id, TodoStatus::Done)
            .await
            .unwrap()
            .expect("record exists");
        assert_eq!(updated.status, TodoStatus::Done);
        assert!(updated.last_updated > created.last_updated);
    }

    #[tokio::test]
    async fn test_update_status_missing_id_is_not_found() {
        let storage = MemoryTodoStorage::new();
        storage
            .create("only one".to_string(), TodoStatus::Pending)
            .await
            .unwrap();

        let outcome = storage.update_status(999, TodoStatus::Done).await.unwrap();
        assert!(outcome.is_none());
        // Store size is unchanged by the not-found outcome
        assert_eq!(storage.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let storage = MemoryTodoStorage::new();
        let todo = storage
            .create("short-lived".to_string(), TodoStatus::Pending)
            .await
            .unwrap();

        assert!(storage.delete(todo.id).await.unwrap());
        assert!(!storage.delete(todo.id).await.unwrap());
        assert!(storage.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let storage = MemoryTodoStorage::new();
        let first = storage
            .create("first".to_string(), TodoStatus::Pending)
            .await
            .unwrap();
        storage.delete(first.id).await.unwrap();

        let second = storage
            .create("second".to_string(), TodoStatus::Pending)
            .await
            .unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_list_is_stable_without_mutation() {
        let storage = MemoryTodoStorage::new();
        storage
            .create("a".to_string(), TodoStatus::Pending)
            .await
            .unwrap();
        storage
            .create("b".to_string(), TodoStatus::Done)
            .await
            .unwrap();

        let first = storage.list().await.unwrap();
        let second = storage.list().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");

        {
            let storage = JsonFileTodoStorage::open(&path).await.unwrap();
            storage
                .create("persist me".to_string(), TodoStatus::InProgress)
                .await
                .unwrap();
        }

        let storage = JsonFileTodoStorage::open(&path).await.unwrap();
        let todos = storage.list().await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].task, "persist me");
        assert_eq!(todos[0].status, TodoStatus::InProgress);
    }

    #[tokio::test]
    async fn test_file_store_id_counter_survives_delete_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");

        {
            let storage = JsonFileTodoStorage::open(&path).await.unwrap();
            let todo = storage
                .create("gone soon".to_string(), TodoStatus::Pending)
                .await
                .unwrap();
            assert_eq!(todo.id, 1);
            storage.delete(todo.id).await.unwrap();
        }

        let storage = JsonFileTodoStorage::open(&path).await.unwrap();
        let todo = storage
            .create("newcomer".to_string(), TodoStatus::Pending)
            .await
            .unwrap();
        assert_eq!(todo.id, 2);
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");
        tokio::fs::write(&path, "not json at all").await.unwrap();

        let err = JsonFileTodoStorage::open(&path).await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}
