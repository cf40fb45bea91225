//! Tool client and aggregator
//!
//! Configured endpoints are discovered into a single flat tool set; the
//! `ToolDispatch` trait is the seam the agent loop calls through, so tests
//! can substitute a scripted dispatcher.

mod aggregator;
mod config;

use async_trait::async_trait;
use serde_json::Value;

pub use aggregator::{
    Discovery, DiscoveryFailure, RemoteTool, ServerConnection, ToolClient, ToolOutput, ToolSet,
    DEFAULT_DISCOVERY_TIMEOUT,
};
pub use config::{load_endpoints, ServerEndpoint, TransportKind};

use crate::error::Result;
use crate::llm::ToolDefinition;

/// Callable set of tools, as consumed by the agent loop
#[async_trait]
pub trait ToolDispatch: Send + Sync {
    /// Definitions to advertise to the model
    fn definitions(&self) -> Vec<ToolDefinition>;

    /// Invoke a tool by its aggregated name with structured arguments
    async fn call(&self, name: &str, arguments: &Value) -> Result<ToolOutput>;
}
