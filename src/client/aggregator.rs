//! Tool discovery and aggregation
//!
//! Connects to every configured tool server, fetches its tool descriptors,
//! and flattens them into a single name-addressable set the agent loop can
//! call into. Discovery is fan-out with a bounded wait per server; an
//! unreachable server is reported as a failure entry and never blocks the
//! rest (partial success with warning).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use rmcp::model::CallToolRequestParam;
use rmcp::service::RunningService;
use rmcp::transport::{ConfigureCommandExt, StreamableHttpClientTransport, TokioChildProcess};
use rmcp::{RoleClient, ServiceExt};
use serde_json::Value;
use tokio::process::Command;

use super::config::{ServerEndpoint, TransportKind};
use super::ToolDispatch;
use crate::error::{Error, Result};
use crate::llm::ToolDefinition;

/// Default bounded wait for a single server during discovery
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Live connection to one tool server
pub struct ServerConnection {
    id: String,
    service: RunningService<RoleClient, ()>,
}

impl ServerConnection {
    /// Connect to an endpoint and complete the MCP handshake
    pub async fn connect(endpoint: &ServerEndpoint) -> Result<Self> {
        let connect_err = |message: String| Error::Unreachable {
            server: endpoint.id.clone(),
            message,
        };

        let service = match &endpoint.transport {
            TransportKind::StreamableHttp { url } => {
                let transport = StreamableHttpClientTransport::from_uri(url.clone());
                ().serve(transport)
                    .await
                    .map_err(|e| connect_err(e.to_string()))?
            }
            TransportKind::Stdio { command, args } => {
                let transport = TokioChildProcess::new(Command::new(command).configure(|cmd| {
                    for arg in args {
                        cmd.arg(arg);
                    }
                }))
                .map_err(|e| connect_err(e.to_string()))?;
                ().serve(transport)
                    .await
                    .map_err(|e| connect_err(e.to_string()))?
            }
        };

        tracing::debug!("Connected to MCP server '{}'", endpoint.id);
        Ok(Self {
            id: endpoint.id.clone(),
            service,
        })
    }

    /// Endpoint id this connection belongs to
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// One tool advertised by a connected server
pub struct RemoteTool {
    /// Endpoint id of the owning server
    pub server_id: String,
    /// Name the tool is addressed by in the aggregated set; qualified with
    /// the server id only when two servers advertise the same bare name
    pub name: String,
    /// The descriptor as advertised by the server
    pub descriptor: rmcp::model::Tool,
    connection: Arc<ServerConnection>,
}

/// Result of invoking a remote tool
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Concatenated text content of the result
    pub text: String,
    /// Whether the server flagged the result as a failure value
    pub is_error: bool,
}

/// A server that could not be discovered
pub struct DiscoveryFailure {
    /// Endpoint id of the server that failed
    pub server_id: String,
    /// What went wrong
    pub error: Error,
}

/// Outcome of a discovery pass: the aggregated tools plus any per-server
/// failures
pub struct Discovery {
    pub tools: ToolSet,
    pub failures: Vec<DiscoveryFailure>,
}

/// Discovers tools from configured endpoints
pub struct ToolClient {
    endpoints: Vec<ServerEndpoint>,
    timeout: Duration,
}

impl ToolClient {
    /// Create a client over the given endpoints
    pub fn new(endpoints: Vec<ServerEndpoint>) -> Self {
        Self {
            endpoints,
            timeout: DEFAULT_DISCOVERY_TIMEOUT,
        }
    }

    /// Override the per-server discovery timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Connect to every enabled endpoint concurrently and aggregate tools
    ///
    /// Never fails as a whole: servers that cannot be reached within the
    /// bounded wait are returned as failure entries alongside the tools
    /// that were discovered.
    pub async fn discover(&self) -> Discovery {
        let fetches = self
            .endpoints
            .iter()
            .filter(|endpoint| {
                if !endpoint.enabled {
                    tracing::info!("Skipping disabled server '{}'", endpoint.id);
                }
                endpoint.enabled
            })
            .map(|endpoint| async move {
                match tokio::time::timeout(self.timeout, Self::fetch_tools(endpoint)).await {
                    Ok(Ok(fetched)) => Ok(fetched),
                    Ok(Err(error)) => Err(DiscoveryFailure {
                        server_id: endpoint.id.clone(),
                        error,
                    }),
                    Err(_) => Err(DiscoveryFailure {
                        server_id: endpoint.id.clone(),
                        error: Error::Timeout {
                            server: endpoint.id.clone(),
                            seconds: self.timeout.as_secs(),
                        },
                    }),
                }
            });

        let mut servers = Vec::new();
        let mut failures = Vec::new();
        for outcome in join_all(fetches).await {
            match outcome {
                Ok((connection, tools)) => {
                    tracing::info!(
                        "Got {} tools from server '{}'",
                        tools.len(),
                        connection.id()
                    );
                    servers.push((connection, tools));
                }
                Err(failure) => {
                    tracing::warn!(
                        "Failed to get tools from server '{}': {}",
                        failure.server_id,
                        failure.error
                    );
                    failures.push(failure);
                }
            }
        }

        Discovery {
            tools: ToolSet::build(servers),
            failures,
        }
    }

    async fn fetch_tools(
        endpoint: &ServerEndpoint,
    ) -> Result<(Arc<ServerConnection>, Vec<rmcp::model::Tool>)> {
        let connection = Arc::new(ServerConnection::connect(endpoint).await?);
        let tools = connection
            .service
            .list_all_tools()
            .await
            .map_err(|e| Error::Unreachable {
                server: endpoint.id.clone(),
                message: e.to_string(),
            })?;
        Ok((connection, tools))
    }
}

/// Flat, name-addressable collection of tools across all reachable servers
pub struct ToolSet {
    tools: Vec<RemoteTool>,
    by_name: HashMap<String, usize>,
}

/// Bare tool names stay bare unless two servers advertise the same one;
/// colliding names are qualified as `{server_id}__{name}`.
fn assign_names(pairs: &[(&str, &str)]) -> Vec<String> {
    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    for &(_, bare) in pairs {
        *name_counts.entry(bare).or_default() += 1;
    }

    pairs
        .iter()
        .map(|(server_id, bare)| {
            if name_counts[bare] > 1 {
                format!("{}__{}", server_id, bare)
            } else {
                (*bare).to_string()
            }
        })
        .collect()
}

impl ToolSet {
    fn build(servers: Vec<(Arc<ServerConnection>, Vec<rmcp::model::Tool>)>) -> Self {
        let pairs: Vec<(&str, &str)> = servers
            .iter()
            .flat_map(|(connection, tools)| {
                tools
                    .iter()
                    .map(move |tool| (connection.id(), tool.name.as_ref()))
            })
            .collect();
        let names = assign_names(&pairs);

        let mut tools = Vec::new();
        let mut by_name = HashMap::new();
        let flat = servers
            .iter()
            .flat_map(|(connection, descriptors)| {
                descriptors.iter().map(move |descriptor| (connection, descriptor))
            });
        for ((connection, descriptor), name) in flat.zip(names) {
            by_name.insert(name.clone(), tools.len());
            tools.push(RemoteTool {
                server_id: connection.id().to_string(),
                name,
                descriptor: descriptor.clone(),
                connection: connection.clone(),
            });
        }

        Self { tools, by_name }
    }

    /// Number of tools in the set
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the set holds no tools
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Iterate over the tools
    pub fn iter(&self) -> impl Iterator<Item = &RemoteTool> {
        self.tools.iter()
    }

    /// Look up a tool by its aggregated name
    pub fn get(&self, name: &str) -> Option<&RemoteTool> {
        self.by_name.get(name).map(|idx| &self.tools[*idx])
    }
}

#[async_trait::async_trait]
impl ToolDispatch for ToolSet {
    fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name.clone(),
                description: tool
                    .descriptor
                    .description
                    .as_deref()
                    .unwrap_or_default()
                    .to_string(),
                input_schema: Value::Object((*tool.descriptor.input_schema).clone()),
            })
            .collect()
    }

    async fn call(&self, name: &str, arguments: &Value) -> Result<ToolOutput> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::UnknownTool(name.to_string()))?;

        tracing::debug!("Calling tool '{}' on server '{}'", name, tool.server_id);

        let result = tool
            .connection
            .service
            .call_tool(CallToolRequestParam {
                name: tool.descriptor.name.clone(),
                arguments: arguments.as_object().cloned(),
                meta: None,
                task: None,
            })
            .await
            .map_err(|e| Error::ToolCall {
                tool: name.to_string(),
                message: e.to_string(),
            })?;

        let text = result
            .content
            .iter()
            .filter_map(|content| content.as_text())
            .map(|text| text.text.clone())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(ToolOutput {
            text,
            is_error: result.is_error.unwrap_or(false),
        })
    }
}
