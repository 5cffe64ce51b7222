//! Single-turn relay: the legacy deployment mode that keeps the provider
//! credential server-side.
//!
//! Accepts `{ "message": ... }` over POST, injects the server-held
//! credential, sends one fixed system instruction plus the single user
//! message upstream (no transcript), and answers `{ "reply": ... }` or
//! `{ "error": ... }` with a matching status: 400 for a missing message,
//! 405 for a wrong method, 500 for a missing credential or unexpected
//! failure, and the upstream status when the provider fails.
//!
//! The stateful full-history path lives in the `study_buddy` session; the
//! two modes share the `groq_api` wire contract and must not drift.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use chat_provider::CredentialSource;
use groq_api::{ChatMessage, GroqApiClient, GroqApiConfig, GroqApiError};

/// Fixed instruction sent with every relayed turn.
pub const RELAY_INSTRUCTION: &str =
    "You are a helpful study assistant. Explain complex topics clearly and concisely in English.";

/// Server-held credential location.
pub const RELAY_CREDENTIAL_ENV_VAR: &str = "GROQ_API_KEY";

pub struct RelayState {
    credential: CredentialSource,
}

impl RelayState {
    #[must_use]
    pub fn new(credential: CredentialSource) -> Self {
        Self { credential }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(CredentialSource::ServerConfigured {
            env_var: RELAY_CREDENTIAL_ENV_VAR.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatTurnRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ChatTurnResponse {
    Reply { reply: String },
    Error { error: String },
}

/// Builds the relay router. Only POST is registered, so axum answers
/// other methods on the route with 405.
pub fn router(state: Arc<RelayState>) -> Router {
    Router::new()
        .route("/api/chat", post(handle_chat))
        .with_state(state)
}

pub async fn handle_chat(
    State(state): State<Arc<RelayState>>,
    Json(body): Json<ChatTurnRequest>,
) -> (StatusCode, Json<ChatTurnResponse>) {
    let message = body.message.trim();
    if message.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Message is required");
    }

    let api_key = match state.credential.resolve() {
        Ok(api_key) => api_key,
        Err(error) => {
            log::error!("credential is not configured: {error}");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "API key is not configured on the server",
            );
        }
    };

    let client = match GroqApiClient::new(GroqApiConfig::new(api_key)) {
        Ok(client) => client,
        Err(error) => {
            log::error!("failed to build upstream client: {error}");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong on the server",
            );
        }
    };

    let turn = [
        ChatMessage::system(RELAY_INSTRUCTION),
        ChatMessage::user(message),
    ];
    match client.complete(&turn).await {
        Ok(reply) => (StatusCode::OK, Json(ChatTurnResponse::Reply { reply })),
        Err(error) => {
            log::error!("upstream completion failed: {error}");
            let (status, message) = failure_response(&error);
            error_response(status, message)
        }
    }
}

/// Maps an upstream failure to the response contract: provider failures
/// keep their status, everything else is a server-side 500.
pub fn failure_response(error: &GroqApiError) -> (StatusCode, &'static str) {
    match error {
        GroqApiError::MissingApiKey => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "API key is not configured on the server",
        ),
        GroqApiError::Auth(_) => (
            StatusCode::UNAUTHORIZED,
            "Failed to fetch from the model provider",
        ),
        GroqApiError::Upstream { status, .. } => (
            StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
            "Failed to fetch from the model provider",
        ),
        GroqApiError::Transport(_) | GroqApiError::MalformedResponse(_) | GroqApiError::Serde(_) => {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong on the server",
            )
        }
    }
}

fn error_response(
    status: StatusCode,
    message: impl Into<String>,
) -> (StatusCode, Json<ChatTurnResponse>) {
    (
        status,
        Json(ChatTurnResponse::Error {
            error: message.into(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::Json;
    use chat_provider::CredentialSource;

    use super::{
        failure_response, handle_chat, ChatTurnRequest, ChatTurnResponse, RelayState,
    };

    fn unconfigured_state() -> Arc<RelayState> {
        Arc::new(RelayState::new(CredentialSource::ServerConfigured {
            env_var: "RELAY_SERVER_TEST_UNSET_KEY".to_string(),
        }))
    }

    #[tokio::test]
    async fn missing_message_is_a_400() {
        let (status, Json(body)) = handle_chat(
            State(unconfigured_state()),
            Json(ChatTurnRequest {
                message: "   ".to_string(),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            ChatTurnResponse::Error {
                error: "Message is required".to_string()
            }
        );
    }

    #[tokio::test]
    async fn missing_credential_is_a_500() {
        let (status, Json(body)) = handle_chat(
            State(unconfigured_state()),
            Json(ChatTurnRequest {
                message: "2+2?".to_string(),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(body, ChatTurnResponse::Error { error } if error.contains("API key")));
    }

    #[test]
    fn upstream_failures_keep_their_status() {
        let error = groq_api::GroqApiError::Upstream {
            status: groq_api::StatusCode::SERVICE_UNAVAILABLE,
            message: "overloaded".to_string(),
        };
        let (status, _) = failure_response(&error);
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn transport_failures_are_server_errors() {
        let error = groq_api::GroqApiError::Transport("connection refused".to_string());
        let (status, message) = failure_response(&error);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Something went wrong on the server");
    }

    #[test]
    fn reply_and_error_bodies_serialize_to_the_wire_contract() {
        let reply = serde_json::to_string(&ChatTurnResponse::Reply {
            reply: "4".to_string(),
        })
        .unwrap();
        assert_eq!(reply, r#"{"reply":"4"}"#);

        let error = serde_json::to_string(&ChatTurnResponse::Error {
            error: "Message is required".to_string(),
        })
        .unwrap();
        assert_eq!(error, r#"{"error":"Message is required"}"#);
    }

    #[test]
    fn router_registers_the_chat_route() {
        let _router = super::router(unconfigured_state());
    }
}
