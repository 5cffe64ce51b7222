//! Minimal provider-agnostic contract for requesting one chat completion.
//!
//! This crate intentionally defines only the shared conversation message
//! shape, the completion failure taxonomy, and the credential-source
//! strategy. It excludes provider transport details, wire payloads, and
//! session/transcript orchestration concerns.

use std::fmt;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// Speaker of one conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Returns the wire-format role string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable conversation turn.
///
/// Fields are private so a message cannot be edited after creation; the
/// conversation record is append-only by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Input required for one completion call: the fully assembled message
/// list, system instruction first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
}

impl CompletionRequest {
    #[must_use]
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

/// Expected failure classes for a completion call.
///
/// These are typed results, not panics: callers render them as a single
/// human-readable line and the session stays usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// Missing or rejected credential.
    Auth(String),
    /// Provider answered with a non-success status.
    Upstream { status: u16, message: String },
    /// No usable response reached the caller (network failure, timeout,
    /// or an unreadable success body).
    Transport(String),
}

impl CompletionError {
    /// Single line suitable for replacing the pending placeholder in a UI.
    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self {
            Self::Auth(_) => {
                "Your API key was rejected. Check the configured credential.".to_string()
            }
            Self::Upstream { status, .. } => {
                format!("The model provider returned an error (HTTP {status}). Please try again.")
            }
            Self::Transport(_) => {
                "Could not reach the model provider. Please try again.".to_string()
            }
        }
    }
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth(message) => write!(f, "authentication failed: {message}"),
            Self::Upstream { status, message } => {
                write!(f, "provider error (HTTP {status}): {message}")
            }
            Self::Transport(message) => write!(f, "transport failure: {message}"),
        }
    }
}

impl std::error::Error for CompletionError {}

/// Immutable metadata describing a completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub provider_id: String,
    pub model_id: String,
}

/// Provider interface for executing one completion request.
///
/// `complete` must not mutate any conversation state; applying the reply
/// is the caller's responsibility after a successful result.
pub trait CompletionProvider: Send + Sync + 'static {
    /// Returns provider/model identity metadata.
    fn profile(&self) -> ProviderProfile;

    /// Sends the assembled message list and resolves to the assistant
    /// reply text or a typed failure.
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> BoxFuture<'_, Result<String, CompletionError>>;
}

/// Where the provider credential comes from for one deployment.
///
/// Exactly one variant is active per deployment; client-held and
/// server-held secrets never share a code path.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Secret supplied by the end user and held for the session.
    ClientSupplied(String),
    /// Secret read from the named server-side environment variable.
    ServerConfigured { env_var: String },
}

impl CredentialSource {
    /// Resolves the secret, without ever exposing it through logging.
    pub fn resolve(&self) -> Result<String, CredentialError> {
        match self {
            Self::ClientSupplied(secret) => {
                let secret = secret.trim();
                if secret.is_empty() {
                    return Err(CredentialError::MissingSecret);
                }
                Ok(secret.to_string())
            }
            Self::ServerConfigured { env_var } => std::env::var(env_var)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| CredentialError::MissingEnvVar(env_var.clone())),
        }
    }
}

// Secrets must never leak through `{:?}` formatting.
impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientSupplied(_) => f.write_str("CredentialSource::ClientSupplied(<redacted>)"),
            Self::ServerConfigured { env_var } => {
                write!(f, "CredentialSource::ServerConfigured({env_var})")
            }
        }
    }
}

/// Failure to resolve a credential before any request is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    MissingSecret,
    MissingEnvVar(String),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSecret => f.write_str("no credential was supplied"),
            Self::MissingEnvVar(env_var) => {
                write!(f, "environment variable '{env_var}' is not set")
            }
        }
    }
}

impl std::error::Error for CredentialError {}

#[cfg(test)]
mod tests {
    use super::{
        CompletionError, CompletionRequest, CredentialError, CredentialSource, Message, Role,
    };

    #[test]
    fn message_constructors_set_role_and_content() {
        let user = Message::user("2+2?");
        assert_eq!(user.role(), Role::User);
        assert_eq!(user.content(), "2+2?");

        let assistant = Message::assistant("4");
        assert_eq!(assistant.role(), Role::Assistant);

        let system = Message::system("You are a helpful study assistant.");
        assert_eq!(system.role(), Role::System);
    }

    #[test]
    fn role_serializes_to_lowercase_wire_strings() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn message_round_trips_through_json() {
        let message = Message::user("what is inertia?");
        let encoded = serde_json::to_string(&message).unwrap();
        assert_eq!(encoded, r#"{"role":"user","content":"what is inertia?"}"#);

        let decoded: Message = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn completion_request_preserves_message_order() {
        let request = CompletionRequest::new(vec![
            Message::system("instruction"),
            Message::user("first"),
            Message::assistant("second"),
        ]);

        let roles: Vec<Role> = request.messages.iter().map(Message::role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
    }

    #[test]
    fn completion_error_display_names_the_failure_class() {
        assert_eq!(
            CompletionError::Auth("invalid key".to_string()).to_string(),
            "authentication failed: invalid key"
        );
        assert_eq!(
            CompletionError::Upstream {
                status: 500,
                message: "internal".to_string(),
            }
            .to_string(),
            "provider error (HTTP 500): internal"
        );
        assert_eq!(
            CompletionError::Transport("connection refused".to_string()).to_string(),
            "transport failure: connection refused"
        );
    }

    #[test]
    fn user_facing_message_carries_upstream_status() {
        let error = CompletionError::Upstream {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert!(error.user_facing_message().contains("HTTP 503"));
    }

    #[test]
    fn client_supplied_credential_resolves_trimmed_secret() {
        let source = CredentialSource::ClientSupplied("  gsk-test  ".to_string());
        assert_eq!(source.resolve().unwrap(), "gsk-test");
    }

    #[test]
    fn blank_client_supplied_credential_is_rejected() {
        let source = CredentialSource::ClientSupplied("   ".to_string());
        assert_eq!(source.resolve(), Err(CredentialError::MissingSecret));
    }

    #[test]
    fn server_configured_credential_reads_environment() {
        let env_var = "CHAT_PROVIDER_TEST_CREDENTIAL";
        std::env::set_var(env_var, "gsk-from-env");
        let source = CredentialSource::ServerConfigured {
            env_var: env_var.to_string(),
        };
        assert_eq!(source.resolve().unwrap(), "gsk-from-env");
        std::env::remove_var(env_var);
    }

    #[test]
    fn missing_environment_credential_reports_variable_name() {
        let source = CredentialSource::ServerConfigured {
            env_var: "CHAT_PROVIDER_TEST_UNSET".to_string(),
        };
        assert_eq!(
            source.resolve(),
            Err(CredentialError::MissingEnvVar(
                "CHAT_PROVIDER_TEST_UNSET".to_string()
            ))
        );
    }

    #[test]
    fn debug_formatting_redacts_client_supplied_secrets() {
        let source = CredentialSource::ClientSupplied("gsk-very-secret".to_string());
        let rendered = format!("{source:?}");
        assert!(!rendered.contains("gsk-very-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
