//! Math tool server
//!
//! Two integer operations over stdio; the smallest possible MCP server,
//! used to exercise the child-process transport.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;

/// Arguments for the binary math operations
#[derive(Debug, Deserialize, JsonSchema)]
pub struct BinaryOpRequest {
    /// Left operand
    pub a: i64,
    /// Right operand
    pub b: i64,
}

/// MCP server exposing integer arithmetic
#[derive(Clone)]
pub struct MathServer {
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl MathServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Add two numbers.")]
    pub fn add(
        &self,
        Parameters(request): Parameters<BinaryOpRequest>,
    ) -> Result<CallToolResult, McpError> {
        match request.a.checked_add(request.b) {
            Some(sum) => Ok(CallToolResult::success(vec![Content::text(
                sum.to_string(),
            )])),
            None => Ok(CallToolResult::error(vec![Content::text(
                "Result out of range".to_string(),
            )])),
        }
    }

    #[tool(description = "Multiply two numbers.")]
    pub fn multiply(
        &self,
        Parameters(request): Parameters<BinaryOpRequest>,
    ) -> Result<CallToolResult, McpError> {
        match request.a.checked_mul(request.b) {
            Some(product) => Ok(CallToolResult::success(vec![Content::text(
                product.to_string(),
            )])),
            None => Ok(CallToolResult::error(vec![Content::text(
                "Result out of range".to_string(),
            )])),
        }
    }
}

#[tool_handler]
impl ServerHandler for MathServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some("Performs integer addition and multiplication.".to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(result: &CallToolResult) -> String {
        result
            .content
            .first()
            .and_then(|content| content.as_text())
            .map(|text| text.text.clone())
            .unwrap()
    }

    #[test]
    fn test_add() {
        let server = MathServer::new();
        let result = server
            .add(Parameters(BinaryOpRequest { a: 40, b: 2 }))
            .unwrap();
        assert_eq!(text(&result), "42");
    }

    #[test]
    fn test_multiply() {
        let server = MathServer::new();
        let result = server
            .multiply(Parameters(BinaryOpRequest { a: 6, b: 7 }))
            .unwrap();
        assert_eq!(text(&result), "42");
    }

    #[test]
    fn test_overflow_is_a_failure_value() {
        let server = MathServer::new();
        let result = server
            .add(Parameters(BinaryOpRequest {
                a: i64::MAX,
                b: 1,
            }))
            .unwrap();
        assert_eq!(result.is_error, Some(true));
    }
}
