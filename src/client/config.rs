//! Tool server endpoint configuration
//!
//! Endpoints are listed in a JSON file (by default `endpoints.json`), one
//! entry per server with an id and a transport.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How to reach a tool server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportKind {
    /// Spawn a child process and speak MCP over its stdin/stdout
    Stdio {
        command: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Connect to a streamable-HTTP MCP endpoint
    StreamableHttp { url: String },
}

/// A configured tool server endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerEndpoint {
    /// Identifier used in diagnostics and qualified tool names
    pub id: String,
    /// Transport used to reach the server
    pub transport: TransportKind,
    /// Disabled endpoints are skipped at discovery
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl ServerEndpoint {
    /// Endpoint reached over streamable HTTP
    pub fn streamable_http(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            transport: TransportKind::StreamableHttp { url: url.into() },
            enabled: true,
        }
    }

    /// Endpoint reached by spawning a child process
    pub fn stdio(
        id: impl Into<String>,
        command: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            transport: TransportKind::Stdio {
                command: command.into(),
                args,
            },
            enabled: true,
        }
    }
}

/// Load endpoint configuration from a JSON file
pub fn load_endpoints(path: impl AsRef<Path>) -> Result<Vec<ServerEndpoint>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
    let endpoints: Vec<ServerEndpoint> = serde_json::from_str(&raw)
        .map_err(|e| Error::Config(format!("cannot parse {}: {}", path.display(), e)))?;
    Ok(endpoints)
}
