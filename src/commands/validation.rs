use std::collections::HashSet;

use thiserror::Error;

use super::{CommandDescriptor, CommandOption, CommandOptionType, CommandType};

/// Longest name the platform accepts for a command or an option
pub const MAX_NAME_LENGTH: usize = 32;
/// Longest description the platform accepts for a command or an option
pub const MAX_DESCRIPTION_LENGTH: usize = 100;
/// Maximum number of options a single command can declare
pub const MAX_OPTIONS: usize = 25;

/// Returned when a command or the credentials used to register it fail a local check
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("The application id is empty")]
    EmptyApplicationId,
    #[error("The application id '{0}' should only contain ASCII letters, digits, '-' or '_'")]
    InvalidApplicationId(String),
    #[error("The bot token is empty")]
    EmptyBotToken,
    #[error("The bot token contains characters that can't be sent in a header")]
    InvalidBotToken,
    #[error("The command name is empty")]
    EmptyName,
    #[error("The command name '{0}' is longer than {} characters", MAX_NAME_LENGTH)]
    NameTooLong(String),
    #[error("The command name '{0}' should only contain lowercase letters, digits, '-' or '_'")]
    InvalidName(String),
    #[error("A {0} command needs a description")]
    MissingDescription(CommandType),
    #[error("The option '{0}' needs a description")]
    OptionMissingDescription(String),
    #[error("The description of '{0}' is longer than {} characters", MAX_DESCRIPTION_LENGTH)]
    DescriptionTooLong(String),
    #[error("A {0} command can't have a description")]
    UnexpectedDescription(CommandType),
    #[error("A {0} command can't have options")]
    UnexpectedOptions(CommandType),
    #[error("A command can't have more than {} options, found {0}", MAX_OPTIONS)]
    TooManyOptions(usize),
    #[error("The option '{0}' is declared more than once")]
    DuplicateOption(String),
    #[error("The required option '{0}' comes after an optional one")]
    RequiredAfterOptional(String),
    #[error("The option '{0}' has type {1}, nested options are not supported")]
    NestedOption(String, CommandOptionType),
}

/// Is this a valid name for a slash command or an option?
fn is_chat_input_name(name: &str) -> bool {
    name.chars()
        .all(|c| c == '-' || c == '_' || (c.is_alphanumeric() && !c.is_uppercase()))
}

fn check_length(name: &str) -> Result<(), ValidationError> {
    match name.chars().count() {
        0 => Err(ValidationError::EmptyName),
        n if n > MAX_NAME_LENGTH => Err(ValidationError::NameTooLong(name.to_string())),
        _ => Ok(()),
    }
}

fn check_chat_input_name(name: &str) -> Result<(), ValidationError> {
    check_length(name)?;
    if !is_chat_input_name(name) {
        return Err(ValidationError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn check_description_length(owner: &str, description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::DescriptionTooLong(owner.to_string()));
    }
    Ok(())
}

fn validate_option(option: &CommandOption) -> Result<(), ValidationError> {
    check_chat_input_name(&option.name)?;
    if option.description.trim().is_empty() {
        return Err(ValidationError::OptionMissingDescription(
            option.name.clone(),
        ));
    }
    check_description_length(&option.name, &option.description)?;
    if option.kind.is_nested() {
        return Err(ValidationError::NestedOption(option.name.clone(), option.kind));
    }
    Ok(())
}

/// Check a descriptor against the limits the platform enforces
/// This runs before any request is built so that invalid commands never reach the network
pub fn validate_descriptor(descriptor: &CommandDescriptor) -> Result<(), ValidationError> {
    match descriptor.kind {
        CommandType::ChatInput => {
            check_chat_input_name(&descriptor.name)?;
            if descriptor.description.trim().is_empty() {
                return Err(ValidationError::MissingDescription(descriptor.kind));
            }
            check_description_length(&descriptor.name, &descriptor.description)?;
        }
        // Context menu commands are displayed as is, so case and spaces are allowed
        CommandType::User | CommandType::Message => {
            if descriptor.name.trim().is_empty() {
                return Err(ValidationError::EmptyName);
            }
            check_length(&descriptor.name)?;
            if !descriptor.description.is_empty() {
                return Err(ValidationError::UnexpectedDescription(descriptor.kind));
            }
            if !descriptor.options.is_empty() {
                return Err(ValidationError::UnexpectedOptions(descriptor.kind));
            }
        }
    }

    if descriptor.options.len() > MAX_OPTIONS {
        return Err(ValidationError::TooManyOptions(descriptor.options.len()));
    }

    let mut seen = HashSet::new();
    let mut optional_seen = false;
    for option in &descriptor.options {
        validate_option(option)?;
        if !seen.insert(option.name.as_str()) {
            return Err(ValidationError::DuplicateOption(option.name.clone()));
        }
        if option.required && optional_seen {
            return Err(ValidationError::RequiredAfterOptional(option.name.clone()));
        }
        optional_seen |= !option.required;
    }
    Ok(())
}
