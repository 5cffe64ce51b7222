use chat_provider::{
    CompletionError, CompletionProvider, CompletionRequest, CredentialSource, ProviderProfile,
};
use futures_util::future::BoxFuture;
use groq_api::{ChatMessage, GroqApiClient, GroqApiConfig, GroqApiError};

/// `CompletionProvider` adapter backed by the Groq transport client.
pub struct GroqProvider {
    client: GroqApiClient,
}

impl GroqProvider {
    /// Creates a provider, resolving the credential up front so a missing
    /// key fails at startup rather than on the first turn.
    pub fn new(credential: &CredentialSource, model: Option<String>) -> Result<Self, String> {
        let api_key = credential.resolve().map_err(|error| error.to_string())?;
        let mut config = GroqApiConfig::new(api_key)
            .with_user_agent(concat!("study_buddy/", env!("CARGO_PKG_VERSION")));
        if let Some(model) = model {
            config = config.with_model(model);
        }
        let client = GroqApiClient::new(config).map_err(|error| error.to_string())?;
        Ok(Self { client })
    }

    fn wire_messages(request: &CompletionRequest) -> Vec<ChatMessage> {
        request
            .messages
            .iter()
            .map(|message| ChatMessage::new(message.role().as_str(), message.content()))
            .collect()
    }
}

impl CompletionProvider for GroqProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: "groq".to_string(),
            model_id: self.client.config().model.clone(),
        }
    }

    fn complete(
        &self,
        request: CompletionRequest,
    ) -> BoxFuture<'_, Result<String, CompletionError>> {
        let messages = Self::wire_messages(&request);
        Box::pin(async move {
            self.client
                .complete(&messages)
                .await
                .map_err(map_completion_error)
        })
    }
}

fn map_completion_error(error: GroqApiError) -> CompletionError {
    match error {
        GroqApiError::MissingApiKey => CompletionError::Auth("API key is required".to_string()),
        GroqApiError::Auth(message) => CompletionError::Auth(message),
        GroqApiError::Upstream { status, message } => CompletionError::Upstream {
            status: status.as_u16(),
            message,
        },
        GroqApiError::Transport(message) => CompletionError::Transport(message),
        // No usable reply reached the caller, same recovery as a dropped
        // connection.
        GroqApiError::MalformedResponse(message) => CompletionError::Transport(message),
        GroqApiError::Serde(error) => CompletionError::Transport(error.to_string()),
    }
}
