mod cli;
mod commands;
mod config;
mod messages;
mod session;
mod terminal;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ips_client::{AlertQuery, ApiClient};
use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::CliConfig;
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "Loaded .env");
    }

    let args = CliArgs::parse();

    // Load config
    let config = CliConfig::load(args.config.as_deref())
        .context("failed to load configuration")?;

    let locale = config.resolve_locale(args.locale);
    let terminal = Terminal::new(locale);

    if let Command::Diagram = args.command {
        return Ok(commands::show_diagram(&terminal)?.into());
    }

    let server_url = config.resolve_server_url(args.server.as_deref());
    let client = Arc::new(
        ApiClient::with_base_path(&server_url, &config.api_base_path)
            .with_timeout(config.request_timeout()),
    );
    info!(base_url = %client.base_url(), "Using admin backend");

    let outcome = match args.command {
        Command::Rules { raw } => commands::show_rules(&terminal, client.as_ref(), raw).await?,
        Command::Edit => {
            terminal.print_banner("ips-admin", client.base_url())?;
            commands::edit_rules(&terminal, client.clone()).await?
        }
        Command::Alerts { limit, since, watch } => {
            let query = AlertQuery {
                limit: limit.unwrap_or(config.alert_limit),
                since,
            };
            if watch {
                let shutdown = async {
                    // If the handler cannot be installed, watch until the feed ends.
                    if tokio::signal::ctrl_c().await.is_err() {
                        std::future::pending::<()>().await;
                    }
                };
                commands::watch_alerts(
                    &terminal,
                    client.clone(),
                    query,
                    config.alert_poll_interval(),
                    shutdown,
                )
                .await?
            } else {
                commands::show_alerts(&terminal, client.as_ref(), &query).await?
            }
        }
        Command::Syscalls { search } => {
            commands::show_syscalls(&terminal, client.as_ref(), search.as_deref()).await?
        }
        Command::TestAttack { rule_id } => {
            commands::test_attack(&terminal, client.as_ref(), client.as_ref(), rule_id.as_deref())
                .await?
        }
        Command::Diagram => commands::show_diagram(&terminal)?,
    };

    Ok(outcome.into())
}
