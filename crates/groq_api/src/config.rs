use std::fmt;
use std::time::Duration;

use crate::url::DEFAULT_GROQ_BASE_URL;

/// Model identifier sent when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Bounded wait applied to every request; past it the failure surfaces as
/// a transport error instead of hanging the session.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport configuration for chat-completions requests.
#[derive(Clone)]
pub struct GroqApiConfig {
    /// Bearer token passed to `Authorization`.
    pub api_key: String,
    /// Base URL for the OpenAI-compatible API.
    pub base_url: String,
    /// Model identifier carried in every request body.
    pub model: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for GroqApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_GROQ_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GroqApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// The api_key must never reach logs through `{:?}`.
impl fmt::Debug for GroqApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}
