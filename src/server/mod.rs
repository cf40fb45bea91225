//! MCP tool servers
//!
//! One server type per tool domain, plus the transport hosting helpers.
//! Each server binds its tools with `#[tool_router]` and gets its
//! `ServerHandler` implementation from `#[tool_handler]`; the helpers here
//! decide how a server meets the wire (stdio or streamable HTTP).

mod math;
mod todo;
mod weather;

pub use math::{BinaryOpRequest, MathServer};
pub use todo::{AddTodoRequest, DeleteTodoRequest, TodoServer, UpdateTodoStatusRequest};
pub use weather::{GetWeatherRequest, WeatherServer};

use anyhow::{Context, Result};
use rmcp::transport::stdio;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::StreamableHttpService;
use rmcp::{ServerHandler, ServiceExt};

/// Serve a tool server over stdio until the client disconnects
///
/// stdout belongs to the transport; anything the process wants to say goes
/// to the log file or stderr.
pub async fn serve_stdio<H>(handler: H) -> Result<()>
where
    H: ServerHandler,
{
    tracing::info!("Serving MCP over stdio");
    let service = handler
        .serve(stdio())
        .await
        .context("failed to start stdio transport")?;
    service.waiting().await.context("stdio service failed")?;
    Ok(())
}

/// Serve a tool server over streamable HTTP, mounted at `/mcp`
///
/// The factory is invoked once per session; handlers are cheap clones over
/// shared state. Shuts down cleanly on ctrl-c.
pub async fn serve_streamable_http<H, F>(factory: F, bind: &str) -> Result<()>
where
    H: ServerHandler,
    F: Fn() -> H + Send + Sync + 'static,
{
    let service = StreamableHttpService::new(
        move || Ok(factory()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;

    tracing::info!("Serving MCP over streamable HTTP on {}/mcp", bind);
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await
        .context("HTTP server failed")?;

    Ok(())
}
