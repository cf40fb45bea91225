// End-to-end scenarios for the todo tool server, run against both storage
// backends through the same tool methods an MCP client would hit.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rmcp::handler::server::wrapper::Parameters;
    use rmcp::model::CallToolResult;
    use taskdesk::server::{
        AddTodoRequest, DeleteTodoRequest, TodoServer, UpdateTodoStatusRequest,
    };
    use taskdesk::todo::{JsonFileTodoStorage, MemoryTodoStorage, TodoStorage};

    fn lines(result: &CallToolResult) -> Vec<String> {
        result
            .content
            .iter()
            .filter_map(|content| content.as_text())
            .map(|text| text.text.clone())
            .collect()
    }

    fn first_line(result: &CallToolResult) -> String {
        lines(result).into_iter().next().expect("text content")
    }

    async fn add(server: &TodoServer, task: &str, status: Option<&str>) -> CallToolResult {
        server
            .add_todo(Parameters(AddTodoRequest {
                task: task.to_string(),
                status: status.map(str::to_string),
            }))
            .await
            .unwrap()
    }

    /// Scenario: two creates with explicit statuses, then a listing
    async fn check_create_and_list(storage: Arc<dyn TodoStorage>) {
        let server = TodoServer::new(storage);

        add(&server, "Review PR #102", Some("in_progress")).await;
        add(&server, "Update documentation", Some("done")).await;

        let listed = server.list_todos().await.unwrap();
        let listed = lines(&listed);
        assert_eq!(listed.len(), 2);
        assert!(listed[0].starts_with("1: Review PR #102 [in_progress] (Last updated: "));
        assert!(listed[1].starts_with("2: Update documentation [done] (Last updated: "));
    }

    #[tokio::test]
    async fn test_create_and_list_memory() {
        check_create_and_list(Arc::new(MemoryTodoStorage::new())).await;
    }

    #[tokio::test]
    async fn test_create_and_list_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileTodoStorage::open(dir.path().join("todos.json"))
            .await
            .unwrap();
        check_create_and_list(Arc::new(storage)).await;
    }

    #[tokio::test]
    async fn test_update_refreshes_listing_and_timestamp() {
        let server = TodoServer::new(Arc::new(MemoryTodoStorage::new()));
        add(&server, "Review PR #102", Some("in_progress")).await;

        let before = first_line(&server.list_todos().await.unwrap());
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        let updated = server
            .update_todo_status(Parameters(UpdateTodoStatusRequest {
                todo_id: 1,
                status: "done".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(first_line(&updated), "Updated todo ID 1 to status: done");

        let after = first_line(&server.list_todos().await.unwrap());
        assert!(after.contains("[done]"));
        // The second-resolution timestamp in the line must have moved
        assert_ne!(before, after.replace("[done]", "[in_progress]"));
    }

    #[tokio::test]
    async fn test_default_status_is_pending() {
        let server = TodoServer::new(Arc::new(MemoryTodoStorage::new()));
        add(&server, "Prepare the monthly SRE report", None).await;

        let listed = lines(&server.list_todos().await.unwrap());
        assert_eq!(listed.len(), 1);
        assert!(listed[0].contains("Prepare the monthly SRE report [pending]"));
    }

    #[tokio::test]
    async fn test_delete_missing_id_keeps_store_intact() {
        let server = TodoServer::new(Arc::new(MemoryTodoStorage::new()));
        add(&server, "survivor", None).await;

        let result = server
            .delete_todo(Parameters(DeleteTodoRequest { todo_id: 999 }))
            .await
            .unwrap();
        assert_ne!(result.is_error, Some(true));
        assert_eq!(first_line(&result), "No todo found with ID 999");

        assert_eq!(lines(&server.list_todos().await.unwrap()).len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_status_never_reaches_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");
        let server = TodoServer::new(Arc::new(
            JsonFileTodoStorage::open(&path).await.unwrap(),
        ));

        let result = add(&server, "never stored", Some("cancelled")).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            first_line(&result),
            "Invalid status: cancelled. Allowed: pending, in_progress, done."
        );

        // The store file was never even created
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_listing_is_idempotent() {
        let server = TodoServer::new(Arc::new(MemoryTodoStorage::new()));
        add(&server, "a", Some("pending")).await;
        add(&server, "b", Some("done")).await;

        let first = lines(&server.list_todos().await.unwrap());
        let second = lines(&server.list_todos().await.unwrap());
        assert_eq!(first, second);
    }
}
