use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use tracing::{info, warn};

use crate::commands::CommandDescriptor;
use crate::config::credentials::{ApplicationId, BotToken, Credentials};
use crate::config::Config;

pub mod error;

pub use error::{ApiError, RegistrationError};

/// Outcome of a single registration
pub type RegistrationResult = Result<RegisteredCommand, RegistrationError>;

/// The command record created (or overwritten) by the platform
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisteredCommand {
    pub id: String,
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(flatten)]
    pub descriptor: CommandDescriptor,
}

/// Registers application commands through the platform HTTP API
/// Each call to `register` sends exactly one request and never retries
#[derive(Debug, Clone)]
pub struct CommandRegistrar {
    client: Client,
    api_host: String,
    api_version: u8,
    timeout: Duration,
}

impl CommandRegistrar {
    /// Build a registrar targeting the API described by the config
    pub fn new(config: &Config) -> Result<Self, RegistrationError> {
        Self::with_settings(&config.api_host, config.api_version, config.timeout())
    }

    pub fn with_settings(
        api_host: &str,
        api_version: u8,
        timeout: Duration,
    ) -> Result<Self, RegistrationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RegistrationError::Http(e.to_string()))?;
        Ok(CommandRegistrar {
            client,
            api_host: api_host.trim_end_matches('/').to_string(),
            api_version,
            timeout,
        })
    }

    /// The URL commands of this application are registered at
    pub fn endpoint(&self, application_id: &ApplicationId) -> String {
        format!(
            "{}/api/v{}/applications/{}/commands",
            self.api_host, self.api_version, application_id
        )
    }

    /// The value of the `Authorization` header for this token
    pub fn authorization(bot_token: &BotToken) -> String {
        format!("Bot {}", bot_token.expose())
    }

    /// Register a command, checking the credentials and the descriptor before sending anything
    pub async fn register(
        &self,
        application_id: &str,
        bot_token: &str,
        descriptor: &CommandDescriptor,
    ) -> RegistrationResult {
        let credentials = Credentials {
            application_id: ApplicationId::new(application_id)?,
            bot_token: BotToken::new(bot_token)?,
        };
        self.register_with(&credentials, descriptor).await
    }

    /// Same as `register`, with credentials that were already checked
    pub async fn register_with(
        &self,
        credentials: &Credentials,
        descriptor: &CommandDescriptor,
    ) -> RegistrationResult {
        descriptor.validate()?;

        let url = self.endpoint(&credentials.application_id);
        info!(
            "Registering {} command '{}' at {url}",
            descriptor.kind, descriptor.name
        );

        let response = self
            .client
            .post(&url)
            .header(
                header::AUTHORIZATION,
                Self::authorization(&credentials.bot_token),
            )
            .json(descriptor)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        let result = classify(status, &body);
        match &result {
            Ok(command) => info!(
                "Registered command '{}' with id {}",
                command.descriptor.name, command.id
            ),
            Err(e) => warn!("Failed to register command '{}': {e}", descriptor.name),
        }
        result
    }

    fn transport_error(&self, e: reqwest::Error) -> RegistrationError {
        if e.is_builder() {
            return RegistrationError::Http(e.to_string());
        }
        let message = if e.is_timeout() {
            format!("No response after {:?}: {e}", self.timeout)
        } else {
            e.to_string()
        };
        RegistrationError::Transient {
            status: e.status().map(|s| s.as_u16()),
            message,
        }
    }
}

/// Turn the platform's answer into a registration result
fn classify(status: StatusCode, body: &str) -> RegistrationResult {
    if status.is_success() {
        return serde_json::from_str(body).map_err(|_| RegistrationError::InvalidResponse {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }
    if status.is_client_error() {
        return Err(RegistrationError::Client {
            status: status.as_u16(),
            error: ApiError::from_body(body),
        });
    }
    if status.is_server_error() {
        let message = match body.trim() {
            "" => status.to_string(),
            text => format!("{status}: {text}"),
        };
        return Err(RegistrationError::Transient {
            status: Some(status.as_u16()),
            message,
        });
    }
    Err(RegistrationError::InvalidResponse {
        status: status.as_u16(),
        body: body.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::commands::dldialogue::DlDialogue;
    use crate::commands::validation::ValidationError;
    use crate::commands::{Command, CommandType};

    const COMMANDS_PATH: &str = "/api/v8/applications/154/commands";

    fn registrar(server: &MockServer) -> CommandRegistrar {
        CommandRegistrar::with_settings(&server.uri(), 8, Duration::from_secs(10)).unwrap()
    }

    async fn respond_with(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(COMMANDS_PATH))
            .respond_with(template)
            .expect(1)
            .mount(server)
            .await;
    }

    #[test]
    fn endpoint_and_header() {
        let registrar = CommandRegistrar::new(&Config::default()).unwrap();
        let id = ApplicationId::new("154").unwrap();
        assert_eq!(
            registrar.endpoint(&id),
            "https://discord.com/api/v8/applications/154/commands"
        );
        let token = BotToken::new("154").unwrap();
        assert_eq!(CommandRegistrar::authorization(&token), "Bot 154");
    }

    #[test]
    fn endpoint_follows_config() {
        let config = Config {
            api_host: "https://example.com/".to_string(),
            api_version: 10,
            ..Config::default()
        };
        let registrar = CommandRegistrar::new(&config).unwrap();
        let id = ApplicationId::new("42").unwrap();
        assert_eq!(
            registrar.endpoint(&id),
            "https://example.com/api/v10/applications/42/commands"
        );
    }

    #[test]
    fn classify_unexpected_status() {
        let result = classify(StatusCode::NOT_MODIFIED, "");
        assert!(matches!(
            result,
            Err(RegistrationError::InvalidResponse { status: 304, .. })
        ));
    }

    #[tokio::test]
    async fn sends_the_expected_request() {
        let server = MockServer::start().await;
        let descriptor = DlDialogue::descriptor();
        let options = descriptor.to_json()["options"].clone();
        Mock::given(method("POST"))
            .and(path(COMMANDS_PATH))
            .and(header("Authorization", "Bot 154"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(descriptor.to_json()))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "123",
                "application_id": "154",
                "version": "1",
                "name": "dldialogue",
                "type": 1,
                "description": "Create a Dragalia Lost themed dialogue",
                "options": options,
                "default_member_permissions": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let command = registrar(&server)
            .register("154", "154", &descriptor)
            .await
            .unwrap();
        assert_eq!(command.id, "123");
        assert_eq!(command.application_id.as_deref(), Some("154"));
        assert_eq!(command.descriptor, descriptor);
    }

    #[tokio::test]
    async fn success_with_partial_echo() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            ResponseTemplate::new(201).set_body_json(json!({ "id": "123", "name": "dldialogue" })),
        )
        .await;

        let command = registrar(&server)
            .register("154", "154", &DlDialogue::descriptor())
            .await
            .unwrap();
        assert_eq!(command.id, "123");
        assert_eq!(command.descriptor.name, "dldialogue");
        assert_eq!(command.descriptor.kind, CommandType::ChatInput);
    }

    #[tokio::test]
    async fn unparsable_success_body() {
        let server = MockServer::start().await;
        respond_with(&server, ResponseTemplate::new(200).set_body_string("ok")).await;

        let err = registrar(&server)
            .register("154", "154", &DlDialogue::descriptor())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::InvalidResponse { status: 200, ref body } if body == "ok"
        ));
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized", "code": 0 })),
        )
        .await;

        let err = registrar(&server)
            .register("154", "bad-token", &DlDialogue::descriptor())
            .await
            .unwrap_err();
        assert!(!err.is_retryable());
        match err {
            RegistrationError::Client { status, error } => {
                assert_eq!(status, 401);
                assert_eq!(error.message, "Unauthorized");
                assert_eq!(error.code, Some(0));
            }
            e => panic!("Expected a client error, got {e:?}"),
        }
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn server_error_is_transient() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            ResponseTemplate::new(503).set_body_string("upstream unavailable"),
        )
        .await;

        let err = registrar(&server)
            .register("154", "154", &DlDialogue::descriptor())
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("upstream unavailable"));
    }

    #[tokio::test]
    async fn timeout_is_transient() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            ResponseTemplate::new(201)
                .set_body_json(json!({ "id": "123", "name": "dldialogue" }))
                .set_delay(Duration::from_secs(5)),
        )
        .await;

        let timeout = Duration::from_millis(300);
        let registrar = CommandRegistrar::with_settings(&server.uri(), 8, timeout).unwrap();
        let start = Instant::now();
        let err = registrar
            .register("154", "154", &DlDialogue::descriptor())
            .await
            .unwrap_err();
        let elapsed = start.elapsed();

        assert!(err.is_retryable());
        assert_eq!(err.status(), None);
        assert!(elapsed >= timeout, "returned after {elapsed:?}");
        assert!(elapsed < Duration::from_secs(5), "returned after {elapsed:?}");
    }

    #[tokio::test]
    async fn unreachable_host_is_transient() {
        // Nothing listens on port 1
        let registrar =
            CommandRegistrar::with_settings("http://127.0.0.1:1", 8, Duration::from_secs(2)).unwrap();
        let err = registrar
            .register("154", "154", &DlDialogue::descriptor())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::Transient { status: None, .. }));
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_network() {
        let server = MockServer::start().await;
        let registrar = registrar(&server);
        let descriptor = DlDialogue::descriptor();

        let err = registrar.register("", "154", &descriptor).await.unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Validation(ValidationError::EmptyApplicationId)
        ));

        for id in ["154/../999", "154#"] {
            let err = registrar.register(id, "154", &descriptor).await.unwrap_err();
            assert!(matches!(
                err,
                RegistrationError::Validation(ValidationError::InvalidApplicationId(_))
            ));
        }

        let err = registrar.register("154", "a\nb", &descriptor).await.unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Validation(ValidationError::InvalidBotToken)
        ));

        let err = registrar.register("154", " ", &descriptor).await.unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Validation(ValidationError::EmptyBotToken)
        ));

        let mut unnamed = descriptor.clone();
        unnamed.name = String::new();
        let err = registrar.register("154", "154", &unnamed).await.unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Validation(ValidationError::EmptyName)
        ));

        let mut long_name = descriptor.clone();
        long_name.name = "d".repeat(33);
        let err = registrar.register("154", "154", &long_name).await.unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Validation(ValidationError::NameTooLong(_))
        ));

        let mut undescribed = descriptor;
        undescribed.description = String::new();
        let err = registrar.register("154", "154", &undescribed).await.unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Validation(ValidationError::MissingDescription(
                CommandType::ChatInput
            ))
        ));

        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
