//! Math tool server over stdio
//!
//! stdout carries the protocol; logs go to logs/ only.

use anyhow::Result;

use taskdesk::logging::init_logging;
use taskdesk::server::{serve_stdio, MathServer};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("math-server")?;

    serve_stdio(MathServer::new()).await
}
