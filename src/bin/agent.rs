//! Interactive agent wired to the configured tool servers
//!
//! Discovers tools from the endpoints listed in `endpoints.json` (path
//! overridable via `TASKDESK_ENDPOINTS`), then answers prompts given as
//! command-line arguments, or enters a read-eval loop when none are given.

use std::sync::Arc;

use anyhow::{Context, Result};

use taskdesk::agent::Agent;
use taskdesk::cli::Console;
use taskdesk::client::{load_endpoints, ToolClient};
use taskdesk::llm::OpenAiProvider;
use taskdesk::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("agent")?;
    let console = Console::new();

    let config_path =
        std::env::var("TASKDESK_ENDPOINTS").unwrap_or_else(|_| "endpoints.json".to_string());
    let endpoints = load_endpoints(&config_path)
        .with_context(|| format!("failed to load endpoint config from {}", config_path))?;

    let client = ToolClient::new(endpoints);
    let discovery = client.discover().await;
    for failure in &discovery.failures {
        console.print_system(&format!(
            "warning: server '{}' skipped: {}",
            failure.server_id, failure.error
        ));
    }
    if discovery.tools.is_empty() {
        console.print_system("no tools discovered; answering without tools");
    } else {
        console.print_system(&format!("{} tools available", discovery.tools.len()));
    }

    let provider =
        OpenAiProvider::from_env().context("set GROQ_API_KEY or OPENAI_API_KEY to run the agent")?;
    let mut agent = Agent::new(Box::new(provider), Arc::new(discovery.tools));

    let prompts: Vec<String> = std::env::args().skip(1).collect();
    if prompts.is_empty() {
        run_interactive(&console, &mut agent).await
    } else {
        for prompt in prompts {
            console.print_user(&prompt);
            let reply = agent.run_turn(&prompt).await?;
            console.print_assistant(&reply);
        }
        Ok(())
    }
}

async fn run_interactive(console: &Console, agent: &mut Agent) -> Result<()> {
    console.print_banner();

    loop {
        let input = console.read_input()?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            console.print_system("Goodbye!");
            break;
        }

        match agent.run_turn(input).await {
            Ok(reply) => console.print_assistant(&reply),
            Err(e) => console.print_error(&e.to_string()),
        }
    }

    Ok(())
}
