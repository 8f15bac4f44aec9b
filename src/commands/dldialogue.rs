use super::{Command, CommandDescriptor, CommandOption, CommandOptionType, CommandType};

/// Create a Dragalia Lost themed dialogue
/// Registered when no command file is configured
pub struct DlDialogue;

impl Command for DlDialogue {
    fn descriptor() -> CommandDescriptor {
        CommandDescriptor::new(
            "dldialogue",
            CommandType::ChatInput,
            "Create a Dragalia Lost themed dialogue",
        )
        .option(
            CommandOption::new("name", "The name of the character", CommandOptionType::String)
                .required(true),
        )
        .option(
            CommandOption::new(
                "message",
                "What should the character say",
                CommandOptionType::String,
            )
            .required(true),
        )
    }
}
