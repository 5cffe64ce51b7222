use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chat_provider::{
    CompletionError, CompletionProvider, CompletionRequest, ProviderProfile,
};
use futures_util::future::BoxFuture;

const DEFAULT_REPLY: &str = "This is a deterministic mocked study answer.";

/// Deterministic provider for local runs and tests.
///
/// Replays a scripted sequence of results, records every request it
/// receives, and optionally delays each completion to simulate an
/// in-flight request.
#[derive(Debug, Default)]
pub struct MockProvider {
    script: Mutex<VecDeque<Result<String, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockProvider {
    #[must_use]
    pub fn scripted(script: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn single_reply(reply: impl Into<String>) -> Self {
        Self::scripted(vec![Ok(reply.into())])
    }

    #[must_use]
    pub fn failing(error: CompletionError) -> Self {
        Self::scripted(vec![Err(error)])
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of completion calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock_unpoisoned(&self.requests).clone()
    }
}

impl CompletionProvider for MockProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: "mock".to_string(),
            model_id: "mock".to_string(),
        }
    }

    fn complete(
        &self,
        request: CompletionRequest,
    ) -> BoxFuture<'_, Result<String, CompletionError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            lock_unpoisoned(&self.requests).push(request);
            let next = lock_unpoisoned(&self.script).pop_front();

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            next.unwrap_or_else(|| Ok(DEFAULT_REPLY.to_string()))
        })
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use chat_provider::{
        CompletionError, CompletionProvider, CompletionRequest, Message,
    };

    use super::{MockProvider, DEFAULT_REPLY};

    #[tokio::test]
    async fn scripted_results_are_replayed_in_order() {
        let provider = MockProvider::scripted(vec![
            Ok("first".to_string()),
            Err(CompletionError::Transport("down".to_string())),
        ]);
        let request = CompletionRequest::new(vec![Message::user("hi")]);

        assert_eq!(provider.complete(request.clone()).await.unwrap(), "first");
        assert!(provider.complete(request.clone()).await.is_err());
        // An exhausted script falls back to the default reply.
        assert_eq!(provider.complete(request).await.unwrap(), DEFAULT_REPLY);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn received_requests_are_recorded_in_call_order() {
        let provider = MockProvider::default();
        provider
            .complete(CompletionRequest::new(vec![Message::user("one")]))
            .await
            .unwrap();
        provider
            .complete(CompletionRequest::new(vec![Message::user("two")]))
            .await
            .unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].messages[0].content(), "one");
        assert_eq!(requests[1].messages[0].content(), "two");
    }
}
