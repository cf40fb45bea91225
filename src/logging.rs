use anyhow::Result;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system for a binary
///
/// Logs go to the logs/ directory only. Never stdout: for stdio-transport
/// servers, stdout carries the protocol.
pub fn init_logging(component: &str) -> Result<()> {
    std::fs::create_dir_all("logs")?;

    // Daily rotation, one file family per binary
    let file_appender = RollingFileAppender::new(
        Rotation::DAILY,
        "logs",
        format!("{}.log", component),
    );

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    // Default to INFO level, can be overridden with RUST_LOG env var
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("Logging system initialized for {}", component);

    Ok(())
}
