use clap::Parser;
use colored::Colorize;
use logsearch::api::BackendClient;
use logsearch::cli::Cli;
use logsearch::config::LogSearchConfig;
use logsearch::error::{LogSearchError, Result};
use logsearch::repl::Repl;
use logsearch::session::SubmitOutcome;
use logsearch::ui::UI;
use std::env;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    if let Err(e) = run(cli).await {
        UI::print_error_with_hint(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let workspace = env::current_dir().map_err(|e| {
        LogSearchError::Config(format!("Failed to get current directory: {}", e))
    })?;

    let config = LogSearchConfig::load(&workspace, cli.overrides())?;
    let client = BackendClient::new(config.base_url.clone(), config.request_timeout())?;

    println!(
        "{} {}",
        "Backend:".bright_cyan(),
        client.base_url().dimmed()
    );

    if config.startup_health_check {
        probe_backend(&client).await;
    }
    println!();

    let mut repl = Repl::new(client);

    if let Some(prompt) = cli.prompt {
        if repl.process_single_prompt(&prompt).await != SubmitOutcome::Replied {
            std::process::exit(1);
        }
    } else {
        repl.run().await?;
    }

    Ok(())
}

/// Warns about an unreachable or unhealthy backend without aborting
async fn probe_backend(client: &BackendClient) {
    match client.health().await {
        Ok(health) if health.is_healthy() => {
            if let Some(agent) = health.agent_status.as_deref().filter(|s| *s != "running") {
                UI::print_info(&format!("Agent is {}; it starts on the first prompt.", agent));
            }
        }
        Ok(health) => UI::print_warning(&format!(
            "Backend reports status '{}'{}",
            health.status,
            health
                .error
                .map(|e| format!(": {}", e))
                .unwrap_or_default()
        )),
        Err(e) => {
            tracing::debug!(error = %e, "Startup health check failed");
            UI::print_warning(&format!("Backend is not reachable: {}", e));
            if let Some(hint) = e.hint() {
                eprintln!("  {} {}", "Hint:".bright_cyan(), hint);
            }
        }
    }
}
