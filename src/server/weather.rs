//! Weather tool server
//!
//! A stub: every location gets the same forecast. Exists to exercise the
//! multi-server discovery path with a second HTTP endpoint.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;

/// Arguments for `get_weather`
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetWeatherRequest {
    /// Location to report the weather for
    pub location: String,
}

/// MCP server answering weather lookups
#[derive(Clone)]
pub struct WeatherServer {
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WeatherServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Get the current weather for a location.")]
    pub async fn get_weather(
        &self,
        Parameters(request): Parameters<GetWeatherRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(format!(
            "It's always raining in {}",
            request.location
        ))]))
    }
}

#[tool_handler]
impl ServerHandler for WeatherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some("Answers weather lookups for a named location.".to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_weather() {
        let server = WeatherServer::new();
        let result = server
            .get_weather(Parameters(GetWeatherRequest {
                location: "Rotterdam".to_string(),
            }))
            .await
            .unwrap();

        let text = result
            .content
            .first()
            .and_then(|content| content.as_text())
            .map(|text| text.text.clone())
            .unwrap();
        assert_eq!(text, "It's always raining in Rotterdam");
    }
}
