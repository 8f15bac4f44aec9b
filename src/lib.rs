pub mod commands;
pub mod config;
pub mod dialogue;
pub mod registrar;

pub use commands::{CommandDescriptor, CommandOption, CommandOptionType, CommandType};
pub use config::credentials::{ApplicationId, BotToken, Credentials};
pub use config::Config;
pub use registrar::{CommandRegistrar, RegisteredCommand, RegistrationError, RegistrationResult};
