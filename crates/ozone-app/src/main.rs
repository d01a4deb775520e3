//! Ozone application binary - composition root.
//!
//! 1. Parse the CLI and load configuration from TOML
//! 2. Open the SQLite database under the data directory
//! 3. Build the completion gateway and shared state
//! 4. Run the requested command, or serve the local API

mod cli;
mod commands;

use std::sync::Arc;

use clap::Parser;

use ozone_api::routes;
use ozone_api::state::AppState;
use ozone_assistant::HttpCompletionGateway;
use ozone_core::config::OzoneConfig;
use ozone_storage::{Database, SqliteHistoryRepository, SqliteTipPlanRepository};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_file = cli.resolve_config_path();
    let mut config = OzoneConfig::load_or_default(&config_file);

    // Logs go to stderr so command output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.resolve_log_level(&config))),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(path = %config_file.display(), "Configuration loaded");

    let data_dir = cli.resolve_data_dir(&config);
    let db = Arc::new(Database::open_in(&data_dir)?);

    let gateway = HttpCompletionGateway::new(&config.assistant)?;
    if !gateway.has_credential() {
        tracing::warn!(
            env = %config.assistant.api_key_env,
            "No assistant API key configured; chat will answer offline"
        );
    }

    let device = cli.resolve_device(&config);
    if let Command::Serve { port } = &cli.command {
        config.general.port = cli::resolve_port(*port, config.general.port);
    }

    let state = AppState::new(
        config.clone(),
        Arc::new(SqliteHistoryRepository::new(Arc::clone(&db))),
        Arc::new(SqliteTipPlanRepository::new(db)),
        Arc::new(gateway),
    )?;

    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Serve { .. } => {
            tracing::info!("Starting Ozone v{}", env!("CARGO_PKG_VERSION"));
            routes::start_server(&config, state).await?;
        }
        Command::Estimate(args) => {
            let input = args.to_input()?;
            commands::estimate(&state, &device, &input, !args.no_save, &mut stdout)?;
        }
        Command::History { delete } => {
            commands::history(&state, &device, delete.as_deref(), &mut stdout)?;
        }
        Command::Report { id, output } => match output {
            Some(path) => {
                let mut file = std::fs::File::create(&path)?;
                commands::report(&state, &device, &id, &mut file)?;
                tracing::info!(path = %path.display(), "Report written");
            }
            None => commands::report(&state, &device, &id, &mut stdout)?,
        },
        Command::Tips { month } => commands::tips(month, &mut stdout)?,
        Command::Plan { action } => commands::plan(&state, &device, action, &mut stdout)?,
        Command::Chat { message } => {
            commands::chat(&state, &message.join(" "), &mut stdout).await?;
        }
    }

    Ok(())
}
