//! Todo tool server over streamable HTTP
//!
//! State lives in a JSON file (`TODO_DB_PATH`, default `todos.json`). An
//! empty store is seeded with two sample records on first start.

use std::sync::Arc;

use anyhow::Result;

use taskdesk::logging::init_logging;
use taskdesk::server::{serve_streamable_http, TodoServer};
use taskdesk::todo::{seed_sample_todos, JsonFileTodoStorage, TodoStorage};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("todo-server")?;

    let db_path =
        std::env::var("TODO_DB_PATH").unwrap_or_else(|_| "todos.json".to_string());
    let bind = std::env::var("TODO_BIND").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

    let storage: Arc<dyn TodoStorage> = Arc::new(JsonFileTodoStorage::open(&db_path).await?);
    seed_sample_todos(storage.as_ref()).await?;

    serve_streamable_http(move || TodoServer::new(storage.clone()), &bind).await
}
