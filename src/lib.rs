//! taskdesk — a language-model agent wired to MCP tool servers
//!
//! The pieces, leaves first:
//! - [`todo`]: the todo store, the only stateful part of the system
//! - [`server`]: MCP tool servers binding store operations to the wire
//!   (todo, weather, math)
//! - [`client`]: discovery of configured servers into one flat tool set
//! - [`llm`]: provider-neutral message types and an OpenAI-compatible
//!   provider
//! - [`agent`]: the tool-calling loop that connects a provider to the
//!   aggregated tools
//!
//! The server binaries and the interactive agent live under `src/bin/`.

pub mod agent;
pub mod cli;
pub mod client;
pub mod error;
pub mod llm;
pub mod logging;
pub mod server;
pub mod todo;

pub use error::{Error, Result};
