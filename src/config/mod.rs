use std::{env, io, path::Path, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::commands::CommandDescriptor;

pub mod credentials;

use credentials::{ApplicationId, BotToken, Credentials};

pub const DEFAULT_API_HOST: &str = "https://discord.com";
pub const DEFAULT_API_VERSION: u8 = 8;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const APPLICATION_ID_VAR: &str = "DISCORD_APPLICATION_ID";
pub const TOKEN_VAR: &str = "DISCORD_TOKEN";

/// Returned when the configuration can't be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("Could not parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("Expected {0} to be set in the environment or the .env file")]
    MissingVariable(&'static str),
    #[error("Invalid value for {0}: {1}")]
    InvalidVariable(&'static str, String),
}

/// Corresponds to the customizable config file that can be modified by the user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_host: String,        // Scheme and host of the platform API
    pub api_version: u8,         // Version segment of the API path
    pub timeout_secs: u64,       // Upper bound for the whole registration request
    pub command_file: Option<String>, // A JSON descriptor to register instead of the bundled one
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_host: DEFAULT_API_HOST.to_string(),
            api_version: DEFAULT_API_VERSION,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            command_file: None,
        }
    }
}

impl Config {
    /// Read the config file at `path`, falling back to the defaults if there is none
    pub fn from(path: &str) -> Result<Self, ConfigError> {
        if !Path::new(path).exists() {
            info!("No config file at {path}, using defaults");
            return Ok(Config::default());
        }
        let content = read(path)?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load the descriptor from the configured command file, if any
    pub fn command_descriptor(&self) -> Result<Option<CommandDescriptor>, ConfigError> {
        let path = match &self.command_file {
            Some(p) => p,
            None => return Ok(None),
        };
        let content = read(path)?;
        CommandDescriptor::from_json(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_string(),
                source,
            })
    }
}

fn read(path: &str) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })
}

impl Credentials {
    /// Get the credentials from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Get the credentials through the given variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let application_id = lookup(APPLICATION_ID_VAR)
            .ok_or(ConfigError::MissingVariable(APPLICATION_ID_VAR))?;
        let bot_token = lookup(TOKEN_VAR).ok_or(ConfigError::MissingVariable(TOKEN_VAR))?;
        Ok(Credentials {
            application_id: ApplicationId::new(application_id)
                .map_err(|e| ConfigError::InvalidVariable(APPLICATION_ID_VAR, e.to_string()))?,
            bot_token: BotToken::new(bot_token)
                .map_err(|e| ConfigError::InvalidVariable(TOKEN_VAR, e.to_string()))?,
        })
    }
}
