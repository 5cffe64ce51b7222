use std::sync::Arc;

use chat_provider::{CompletionProvider, CredentialSource};

mod groq;
mod mock;

pub use groq::GroqProvider;
pub use mock::MockProvider;

pub const DEFAULT_PROVIDER_ID: &str = "groq";
pub const PROVIDER_ENV_VAR: &str = "STUDY_BUDDY_PROVIDER";
/// Server-configured credential location for the default provider.
pub const API_KEY_ENV_VAR: &str = "GROQ_API_KEY";

pub fn provider_from_env(
    credential: &CredentialSource,
) -> Result<Arc<dyn CompletionProvider>, String> {
    let provider_id = std::env::var(PROVIDER_ENV_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    provider_for_id(provider_id.as_deref().unwrap_or(DEFAULT_PROVIDER_ID), credential)
}

pub fn provider_for_id(
    provider_id: &str,
    credential: &CredentialSource,
) -> Result<Arc<dyn CompletionProvider>, String> {
    match provider_id {
        "groq" => Ok(Arc::new(GroqProvider::new(credential, None)?)),
        "mock" => Ok(Arc::new(MockProvider::default())),
        unknown => Err(format!(
            "Unsupported provider '{unknown}'. Available providers: groq, mock"
        )),
    }
}

#[cfg(test)]
mod tests {
    use chat_provider::CredentialSource;

    use super::provider_for_id;

    #[test]
    fn provider_for_id_supports_mock() {
        let credential = CredentialSource::ClientSupplied("unused".to_string());
        let provider = provider_for_id("mock", &credential).expect("mock provider should resolve");
        assert_eq!(provider.profile().provider_id, "mock");
    }

    #[test]
    fn provider_for_id_supports_groq_with_a_resolvable_credential() {
        let credential = CredentialSource::ClientSupplied("gsk-test".to_string());
        let provider = provider_for_id("groq", &credential).expect("groq provider should resolve");
        assert_eq!(provider.profile().provider_id, "groq");
    }

    #[test]
    fn provider_for_id_rejects_unknown_provider() {
        let credential = CredentialSource::ClientSupplied("gsk-test".to_string());
        let error = match provider_for_id("custom", &credential) {
            Ok(_) => panic!("unknown providers should fail"),
            Err(error) => error,
        };
        assert!(error.contains("Unsupported provider 'custom'"));
    }

    #[test]
    fn groq_provider_requires_a_resolvable_credential() {
        let credential = CredentialSource::ClientSupplied(String::new());
        assert!(provider_for_id("groq", &credential).is_err());
    }
}
