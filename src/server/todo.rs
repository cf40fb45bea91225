//! Todo tool server
//!
//! Exposes each todo store operation as an independently invocable MCP
//! tool. Tool descriptions name the exact allowed status tokens; the
//! caller is an agent and builds its arguments from those strings.
//!
//! Precondition violations come back as descriptive failure values; a
//! missing record is a normal outcome with a success-shaped message, the
//! same way the second delete of an id reports "no todo found" instead of
//! erroring.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::error::Error;
use crate::todo::{TodoStatus, TodoStorage};

/// Arguments for `add_todo`
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddTodoRequest {
    /// The task description
    pub task: String,
    /// Status token for the new task: pending, in_progress or done.
    /// Defaults to pending.
    #[serde(default)]
    pub status: Option<String>,
}

/// Arguments for `update_todo_status`
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateTodoStatusRequest {
    /// Id of the todo to update
    pub todo_id: u64,
    /// New status token: pending, in_progress or done
    pub status: String,
}

/// Arguments for `delete_todo`
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteTodoRequest {
    /// Id of the todo to delete
    pub todo_id: u64,
}

/// MCP server for the todo store
#[derive(Clone)]
pub struct TodoServer {
    storage: Arc<dyn TodoStorage>,
    tool_router: ToolRouter<Self>,
}

fn text_result(message: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(message.into())])
}

fn failure_result(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.into())])
}

/// Storage failures are fatal for the request only; the message carries no
/// internal identifiers.
fn storage_error(error: Error) -> McpError {
    tracing::error!("Todo storage failure: {}", error);
    McpError::internal_error(error.to_string(), None)
}

#[tool_router]
impl TodoServer {
    /// Create a server over the given storage backend
    pub fn new(storage: Arc<dyn TodoStorage>) -> Self {
        Self {
            storage,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Add a new todo task with status (default: pending). Allowed statuses: pending, in_progress, done."
    )]
    pub async fn add_todo(
        &self,
        Parameters(request): Parameters<AddTodoRequest>,
    ) -> Result<CallToolResult, McpError> {
        let token = request
            .status
            .as_deref()
            .unwrap_or(TodoStatus::Pending.as_str());
        let status: TodoStatus = match token.parse() {
            Ok(status) => status,
            // Rejected before any state change
            Err(e) => return Ok(failure_result(e.to_string())),
        };

        match self.storage.create(request.task, status).await {
            Ok(todo) => Ok(text_result(format!(
                "Added todo: {} with status: {}",
                todo.task, todo.status
            ))),
            Err(e @ Error::InvalidTask { .. }) => Ok(failure_result(e.to_string())),
            Err(e) => Err(storage_error(e)),
        }
    }

    #[tool(description = "List all todos with their status and last updated timestamp.")]
    pub async fn list_todos(&self) -> Result<CallToolResult, McpError> {
        let todos = self.storage.list().await.map_err(storage_error)?;
        let lines: Vec<Content> = todos
            .iter()
            .map(|todo| Content::text(todo.format_line()))
            .collect();
        Ok(CallToolResult::success(lines))
    }

    #[tool(
        description = "Update the status of a todo by ID. Allowed statuses: pending, in_progress, done."
    )]
    pub async fn update_todo_status(
        &self,
        Parameters(request): Parameters<UpdateTodoStatusRequest>,
    ) -> Result<CallToolResult, McpError> {
        let status: TodoStatus = match request.status.parse() {
            Ok(status) => status,
            Err(e) => return Ok(failure_result(e.to_string())),
        };

        match self
            .storage
            .update_status(request.todo_id, status)
            .await
            .map_err(storage_error)?
        {
            Some(todo) => Ok(text_result(format!(
                "Updated todo ID {} to status: {}",
                todo.id, todo.status
            ))),
            None => Ok(text_result(format!(
                "No todo found with ID {}",
                request.todo_id
            ))),
        }
    }

    #[tool(description = "Delete a todo by ID.")]
    pub async fn delete_todo(
        &self,
        Parameters(request): Parameters<DeleteTodoRequest>,
    ) -> Result<CallToolResult, McpError> {
        if self
            .storage
            .delete(request.todo_id)
            .await
            .map_err(storage_error)?
        {
            Ok(text_result(format!(
                "Deleted todo with ID {}",
                request.todo_id
            )))
        } else {
            Ok(text_result(format!(
                "No todo found with ID {}",
                request.todo_id
            )))
        }
    }
}

#[tool_handler]
impl ServerHandler for TodoServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Manages a todo list. Each todo has an integer id, task text, a status \
                 (pending, in_progress or done) and a last-updated timestamp."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}
