use reqwest::header::USER_AGENT;
use reqwest::Client;

use crate::config::GroqApiConfig;
use crate::error::{classify_status, parse_error_message, GroqApiError};
use crate::payload::{ChatMessage, ChatRequest, ChatResponse};
use crate::url::normalize_chat_completions_url;

#[derive(Debug)]
pub struct GroqApiClient {
    http: Client,
    config: GroqApiConfig,
}

impl GroqApiClient {
    pub fn new(config: GroqApiConfig) -> Result<Self, GroqApiError> {
        if config.api_key.trim().is_empty() {
            return Err(GroqApiError::MissingApiKey);
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GroqApiError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GroqApiConfig {
        &self.config
    }

    pub fn normalized_endpoint(&self) -> String {
        normalize_chat_completions_url(&self.config.base_url)
    }

    pub fn build_request(&self, messages: &[ChatMessage]) -> reqwest::RequestBuilder {
        let payload = ChatRequest::new(self.config.model.clone(), messages.to_vec());
        let mut request = self
            .http
            .post(self.normalized_endpoint())
            .bearer_auth(self.config.api_key.trim())
            .json(&payload);
        if let Some(user_agent) = self.config.user_agent.as_deref() {
            request = request.header(USER_AGENT, user_agent);
        }
        request
    }

    /// Sends one assembled message list and returns the assistant reply.
    ///
    /// Expected upstream failures come back as typed errors, never panics:
    /// 401/403 classify as `Auth`, other non-2xx as `Upstream`, and
    /// no-response conditions (including the configured timeout) as
    /// `Transport`.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GroqApiError> {
        let response = self
            .build_request(messages)
            .send()
            .await
            .map_err(GroqApiError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = parse_error_message(status, &body);
            return Err(classify_status(status, message));
        }

        let parsed: ChatResponse = response.json().await.map_err(GroqApiError::from)?;
        parsed
            .reply_text()
            .map(str::to_owned)
            .ok_or_else(|| {
                GroqApiError::MalformedResponse(
                    "response contained no completion choices".to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::GroqApiClient;
    use crate::config::GroqApiConfig;
    use crate::error::GroqApiError;
    use crate::payload::ChatMessage;

    #[test]
    fn client_rejects_blank_api_key_before_any_request() {
        let error = match GroqApiClient::new(GroqApiConfig::new("   ")) {
            Ok(_) => panic!("blank api key must be rejected"),
            Err(error) => error,
        };
        assert!(matches!(error, GroqApiError::MissingApiKey));
    }

    #[test]
    fn endpoint_is_normalized_from_the_configured_base() {
        let client = GroqApiClient::new(
            GroqApiConfig::new("gsk-test").with_base_url("https://example.com/v1"),
        )
        .expect("client should build");
        assert_eq!(
            client.normalized_endpoint(),
            "https://example.com/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_surfaces_a_transport_error() {
        // Port 9 (discard) is closed on loopback; the connect attempt fails
        // without touching the network.
        let client = GroqApiClient::new(
            GroqApiConfig::new("gsk-test")
                .with_base_url("http://127.0.0.1:9")
                .with_timeout(Duration::from_millis(500)),
        )
        .expect("client should build");

        let error = client
            .complete(&[ChatMessage::user("2+2?")])
            .await
            .expect_err("request against a closed port must fail");
        assert!(matches!(error, GroqApiError::Transport(_)), "{error}");
    }
}
