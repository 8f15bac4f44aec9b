use std::env;
use std::process::exit;

use anyhow::{Context, Result};
use slash_register::commands::dldialogue::DlDialogue;
use slash_register::commands::Command;
use slash_register::{CommandDescriptor, CommandRegistrar, Config, Credentials};
use tracing::{error, info};

const DEFAULT_CONFIG_PATH: &str = "./config/config.json";

/// Pick the command to register: the configured file if any, the bundled one otherwise
fn descriptor(config: &Config) -> Result<CommandDescriptor> {
    match config
        .command_descriptor()
        .context("Failed to load the command file")?
    {
        Some(d) => Ok(d),
        None => {
            info!("No command file configured, registering the bundled dldialogue command");
            Ok(DlDialogue::descriptor())
        }
    }
}

async fn run() -> Result<()> {
    let config_path =
        env::var("REGISTER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::from(&config_path)
        .context("An error occurred while parsing your config file")?;
    info!(
        "Config loaded, targeting {} (API v{})",
        config.api_host, config.api_version
    );

    let credentials = Credentials::from_env()?;
    info!(
        "Found credentials for application {}",
        credentials.application_id
    );

    let descriptor = descriptor(&config)?;
    let registrar = CommandRegistrar::new(&config)?;
    let command = registrar.register_with(&credentials, &descriptor).await?;
    info!(
        "Command '{}' is registered with id {}",
        command.descriptor.name, command.id
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    // Setup tracing
    let subscriber = tracing_subscriber::FmtSubscriber::new();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| eprintln!("Unable to set global default subscriber: {e}"))
        .ok();

    // Credentials may live in a .env file
    dotenv::dotenv().ok();

    if let Err(e) = run().await {
        error!("Registration failed: {e:#}");
        exit(1);
    }
}
