use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Error as JsonError;

#[derive(Debug)]
pub enum GroqApiError {
    MissingApiKey,
    /// Credential was missing or rejected by the provider (401/403).
    Auth(String),
    /// Provider answered with any other non-success status.
    Upstream { status: StatusCode, message: String },
    /// No response reached us: connect failure, timeout, or an aborted body.
    Transport(String),
    /// A 2xx response carried no readable completion choice.
    MalformedResponse(String),
    Serde(JsonError),
}

impl GroqApiError {
    /// Status code carried by upstream failures; `None` for the rest.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for GroqApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "API key is required"),
            Self::Auth(message) => write!(f, "authentication failed: {message}"),
            Self::Upstream { status, message } => write!(f, "HTTP {status} {message}"),
            Self::Transport(message) => write!(f, "transport failure: {message}"),
            Self::MalformedResponse(message) => write!(f, "malformed response: {message}"),
            Self::Serde(error) => write!(f, "serialization error: {error}"),
        }
    }
}

impl std::error::Error for GroqApiError {}

impl From<reqwest::Error> for GroqApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(describe_transport_failure(&error))
    }
}

impl From<JsonError> for GroqApiError {
    fn from(error: JsonError) -> Self {
        Self::Serde(error)
    }
}

fn describe_transport_failure(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        return format!("request timed out: {error}");
    }
    if error.is_connect() {
        return format!("connection failed: {error}");
    }
    error.to_string()
}

/// Classify a non-success status into the expected failure taxonomy.
pub fn classify_status(status: StatusCode, message: String) -> GroqApiError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GroqApiError::Auth(message),
        status => GroqApiError::Upstream { status, message },
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(rename = "error")]
    pub value: Option<ErrorPayloadFields>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayloadFields {
    pub message: Option<String>,
}

/// Extract a human-readable message from a failure body.
///
/// Provider errors usually arrive as `{"error": {"message": ...}}`; fall
/// back to the raw body, then to the status line.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorPayload>(body) {
        if let Some(message) = parsed
            .value
            .and_then(|fields| fields.message)
            .filter(|message| !message.is_empty())
        {
            return message;
        }
    }

    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::{classify_status, parse_error_message, GroqApiError};

    #[test]
    fn unauthorized_status_classifies_as_auth() {
        let error = classify_status(StatusCode::UNAUTHORIZED, "Invalid API Key".to_string());
        assert!(matches!(error, GroqApiError::Auth(message) if message == "Invalid API Key"));
    }

    #[test]
    fn forbidden_status_classifies_as_auth() {
        let error = classify_status(StatusCode::FORBIDDEN, "forbidden".to_string());
        assert!(matches!(error, GroqApiError::Auth(_)));
    }

    #[test]
    fn server_error_classifies_as_upstream_with_status() {
        let error = classify_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string());
        assert_eq!(error.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(matches!(error, GroqApiError::Upstream { .. }));
    }

    #[test]
    fn rate_limit_classifies_as_upstream_429() {
        let error = classify_status(StatusCode::TOO_MANY_REQUESTS, "slow down".to_string());
        assert_eq!(error.status(), Some(StatusCode::TOO_MANY_REQUESTS));
    }

    #[test]
    fn error_message_prefers_provider_error_payload() {
        let body = r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#;
        assert_eq!(
            parse_error_message(StatusCode::UNAUTHORIZED, body),
            "Invalid API Key"
        );
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        assert_eq!(
            parse_error_message(StatusCode::BAD_GATEWAY, "upstream connect error"),
            "upstream connect error"
        );
    }

    #[test]
    fn error_message_falls_back_to_status_reason_for_empty_body() {
        assert_eq!(
            parse_error_message(StatusCode::SERVICE_UNAVAILABLE, ""),
            "Service Unavailable"
        );
    }
}
