//! Weather tool server over streamable HTTP

use anyhow::Result;

use taskdesk::logging::init_logging;
use taskdesk::server::{serve_streamable_http, WeatherServer};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("weather-server")?;

    let bind = std::env::var("WEATHER_BIND").unwrap_or_else(|_| "0.0.0.0:8001".to_string());

    serve_streamable_http(WeatherServer::new, &bind).await
}
