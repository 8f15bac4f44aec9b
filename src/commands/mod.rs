use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

pub mod dldialogue;
pub mod validation;

use validation::ValidationError;

/// A command that this tool knows how to describe to the platform
pub trait Command {
    /// Build the descriptor sent when registering the command
    fn descriptor() -> CommandDescriptor;
}

/// The kind of application command, serialized as its numeric value
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum CommandType {
    #[default]
    #[strum(serialize = "CHAT_INPUT")]
    ChatInput,
    #[strum(serialize = "USER")]
    User,
    #[strum(serialize = "MESSAGE")]
    Message,
}

impl From<CommandType> for u8 {
    fn from(kind: CommandType) -> Self {
        match kind {
            CommandType::ChatInput => 1,
            CommandType::User => 2,
            CommandType::Message => 3,
        }
    }
}

impl TryFrom<u8> for CommandType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CommandType::ChatInput),
            2 => Ok(CommandType::User),
            3 => Ok(CommandType::Message),
            v => Err(format!("unknown command type {v}")),
        }
    }
}

/// The type of value a command option accepts, serialized as its numeric value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CommandOptionType {
    #[strum(serialize = "SUB_COMMAND")]
    SubCommand,
    #[strum(serialize = "SUB_COMMAND_GROUP")]
    SubCommandGroup,
    #[strum(serialize = "STRING")]
    String,
    #[strum(serialize = "INTEGER")]
    Integer,
    #[strum(serialize = "BOOLEAN")]
    Boolean,
    #[strum(serialize = "USER")]
    User,
    #[strum(serialize = "CHANNEL")]
    Channel,
    #[strum(serialize = "ROLE")]
    Role,
    #[strum(serialize = "MENTIONABLE")]
    Mentionable,
    #[strum(serialize = "NUMBER")]
    Number,
    #[strum(serialize = "ATTACHMENT")]
    Attachment,
}

impl CommandOptionType {
    /// Sub commands would nest options, which is not supported here
    pub fn is_nested(&self) -> bool {
        matches!(
            self,
            CommandOptionType::SubCommand | CommandOptionType::SubCommandGroup
        )
    }
}

impl From<CommandOptionType> for u8 {
    fn from(kind: CommandOptionType) -> Self {
        match kind {
            CommandOptionType::SubCommand => 1,
            CommandOptionType::SubCommandGroup => 2,
            CommandOptionType::String => 3,
            CommandOptionType::Integer => 4,
            CommandOptionType::Boolean => 5,
            CommandOptionType::User => 6,
            CommandOptionType::Channel => 7,
            CommandOptionType::Role => 8,
            CommandOptionType::Mentionable => 9,
            CommandOptionType::Number => 10,
            CommandOptionType::Attachment => 11,
        }
    }
}

impl TryFrom<u8> for CommandOptionType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CommandOptionType::SubCommand),
            2 => Ok(CommandOptionType::SubCommandGroup),
            3 => Ok(CommandOptionType::String),
            4 => Ok(CommandOptionType::Integer),
            5 => Ok(CommandOptionType::Boolean),
            6 => Ok(CommandOptionType::User),
            7 => Ok(CommandOptionType::Channel),
            8 => Ok(CommandOptionType::Role),
            9 => Ok(CommandOptionType::Mentionable),
            10 => Ok(CommandOptionType::Number),
            11 => Ok(CommandOptionType::Attachment),
            v => Err(format!("unknown option type {v}")),
        }
    }
}

/// One parameter of a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: CommandOptionType,
    #[serde(default)]
    pub required: bool,
}

impl CommandOption {
    pub fn new(name: &str, description: &str, kind: CommandOptionType) -> Self {
        CommandOption {
            name: name.to_string(),
            description: description.to_string(),
            kind,
            required: false,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Describe a command the way the platform expects it
///
/// The order of `options` is the order in which users are asked for the arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: CommandType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

impl CommandDescriptor {
    pub fn new(name: &str, kind: CommandType, description: &str) -> Self {
        CommandDescriptor {
            name: name.to_string(),
            kind,
            description: description.to_string(),
            options: vec![],
        }
    }

    /// Append an option after the existing ones
    pub fn option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }

    /// Read a descriptor from its JSON representation
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// The JSON body sent to the platform
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Check the descriptor against the platform limits
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_descriptor(self)
    }
}
