use std::fmt;

use crate::commands::validation::ValidationError;

/// Identifier of the application the commands are registered for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Build an application id, refusing blank values
    /// The id ends up as a single segment of the request path, so only
    /// ASCII letters, digits, '-' and '_' are accepted
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ValidationError::EmptyApplicationId);
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidApplicationId(id));
        }
        Ok(ApplicationId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Secret used to authenticate as the bot
/// Never printed: both `Debug` and `Display` hide the value
#[derive(Clone, PartialEq, Eq)]
pub struct BotToken(String);

impl BotToken {
    /// Build a bot token, refusing blank values
    /// and anything that can't be sent in a header
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(ValidationError::EmptyBotToken);
        }
        if !token.chars().all(|c| c.is_ascii_graphic()) {
            return Err(ValidationError::InvalidBotToken);
        }
        Ok(BotToken(token))
    }

    /// The raw secret, only meant to build the authorization header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BotToken(***)")
    }
}

impl fmt::Display for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

/// Everything needed to authenticate a registration
#[derive(Debug, Clone)]
pub struct Credentials {
    pub application_id: ApplicationId,
    pub bot_token: BotToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_rejected() {
        assert_eq!(ApplicationId::new(""), Err(ValidationError::EmptyApplicationId));
        assert_eq!(ApplicationId::new("  "), Err(ValidationError::EmptyApplicationId));
        assert_eq!(BotToken::new(""), Err(ValidationError::EmptyBotToken));
    }

    #[test]
    fn application_id_is_a_single_path_segment() {
        assert!(ApplicationId::new("154").is_ok());
        assert!(ApplicationId::new("my-app_2").is_ok());
        for id in ["154/../999", "154#", "154?x=1", "15 4", "154%2F"] {
            assert_eq!(
                ApplicationId::new(id),
                Err(ValidationError::InvalidApplicationId(id.to_string()))
            );
        }
    }

    #[test]
    fn token_must_fit_in_a_header() {
        assert_eq!(BotToken::new("a\nb"), Err(ValidationError::InvalidBotToken));
        assert_eq!(BotToken::new("a b"), Err(ValidationError::InvalidBotToken));
        assert_eq!(BotToken::new("tök"), Err(ValidationError::InvalidBotToken));
        assert!(BotToken::new("MTk4.Gx_-a.b").is_ok());
    }

    #[test]
    fn values_are_trimmed() {
        assert_eq!(ApplicationId::new(" 154\n").unwrap().as_str(), "154");
        assert_eq!(BotToken::new("abc ").unwrap().expose(), "abc");
    }

    #[test]
    fn token_is_never_printed() {
        let credentials = Credentials {
            application_id: ApplicationId::new("154").unwrap(),
            bot_token: BotToken::new("super-secret").unwrap(),
        };
        assert!(!format!("{credentials:?}").contains("super-secret"));
        assert!(!credentials.bot_token.to_string().contains("super-secret"));
        assert!(format!("{credentials:?}").contains("154"));
    }
}
