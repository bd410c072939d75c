//! Failover AI Provider - Wrapper that provides automatic failover between providers.
//!
//! When the primary provider fails with a transient error (rate limit, unavailable,
//! network, timeout), the request is replayed against the fallback if one is configured.
//!
//! # Example
//!
//! ```ignore
//! let primary = Arc::new(AnthropicProvider::new(anthropic_config)?);
//! let fallback = Arc::new(OpenAIProvider::new(openai_config)?);
//!
//! let provider = FailoverAIProvider::new(primary).with_fallback(fallback);
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// AI provider wrapper with automatic failover support.
pub struct FailoverAIProvider {
    primary: Arc<dyn AIProvider>,
    fallback: Option<Arc<dyn AIProvider>>,
}

impl FailoverAIProvider {
    /// Creates a failover provider with only a primary provider.
    pub fn new(primary: Arc<dyn AIProvider>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    /// Adds a fallback provider.
    pub fn with_fallback(mut self, fallback: Arc<dyn AIProvider>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    fn log_usage(&self, provider: &ProviderInfo, request: &CompletionRequest, response: &CompletionResponse) {
        tracing::debug!(
            conversation_id = %request.metadata.conversation_id,
            trace_id = %request.metadata.trace_id,
            provider = %provider.name,
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            estimated_cost_cents = response.usage.estimated_cost_cents,
            "AI tokens used"
        );
    }
}

#[async_trait]
impl AIProvider for FailoverAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let primary_info = self.primary.provider_info();

        let err = match self.primary.complete(request.clone()).await {
            Ok(response) => {
                self.log_usage(&primary_info, &request, &response);
                return Ok(response);
            }
            Err(err) => err,
        };

        let fallback = match &self.fallback {
            Some(fallback) if err.is_retryable() => fallback,
            _ => return Err(err),
        };

        let fallback_info = fallback.provider_info();
        tracing::warn!(
            trace_id = %request.metadata.trace_id,
            primary = %primary_info.name,
            fallback = %fallback_info.name,
            reason = %err,
            "Primary AI provider failed, using fallback"
        );

        let response = fallback.complete(request.clone()).await?;
        self.log_usage(&fallback_info, &request, &response);
        Ok(response)
    }

    fn estimate_tokens(&self, text: &str) -> u32 {
        self.primary.estimate_tokens(text)
    }

    fn provider_info(&self) -> ProviderInfo {
        self.primary.provider_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::foundation::ConversationId;
    use crate::ports::{MessageRole, RequestMetadata};

    fn test_request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(ConversationId::new(), "trace-1"))
            .with_message(MessageRole::User, "Hello")
    }

    fn named(name: &str) -> MockAIProvider {
        MockAIProvider::new().with_provider_info(ProviderInfo::new(name, format!("{}-model", name), 1000))
    }

    #[tokio::test]
    async fn uses_primary_when_healthy() {
        let primary = named("primary").with_response("From primary");
        let fallback = named("fallback").with_response("From fallback");
        let provider = FailoverAIProvider::new(Arc::new(primary.clone()))
            .with_fallback(Arc::new(fallback.clone()));

        let response = provider.complete(test_request()).await.unwrap();

        assert_eq!(response.content, "From primary");
        assert_eq!(primary.call_count(), 1);
        assert_eq!(fallback.call_count(), 0);
    }

    #[tokio::test]
    async fn falls_back_on_retryable_error() {
        let primary = named("primary").with_error(MockError::Unavailable {
            message: "overloaded".into(),
        });
        let fallback = named("fallback").with_response("From fallback");
        let provider = FailoverAIProvider::new(Arc::new(primary.clone()))
            .with_fallback(Arc::new(fallback.clone()));

        let response = provider.complete(test_request()).await.unwrap();

        assert_eq!(response.content, "From fallback");
        assert_eq!(fallback.get_calls()[0].messages[0].content, "Hello");
    }

    #[tokio::test]
    async fn permanent_error_skips_fallback() {
        let primary = named("primary").with_error(MockError::AuthenticationFailed);
        let fallback = named("fallback").with_response("From fallback");
        let provider = FailoverAIProvider::new(Arc::new(primary))
            .with_fallback(Arc::new(fallback.clone()));

        let err = provider.complete(test_request()).await.unwrap_err();

        assert!(matches!(err, AIError::AuthenticationFailed));
        assert_eq!(fallback.call_count(), 0);
    }

    #[tokio::test]
    async fn without_fallback_returns_primary_error() {
        let primary = named("primary").with_error(MockError::RateLimited { retry_after_secs: 5 });
        let provider = FailoverAIProvider::new(Arc::new(primary));

        assert!(!provider.has_fallback());
        let err = provider.complete(test_request()).await.unwrap_err();
        assert!(matches!(err, AIError::RateLimited { retry_after_secs: 5 }));
    }

    #[tokio::test]
    async fn fallback_error_is_returned() {
        let primary = named("primary").with_error(MockError::Network { message: "reset".into() });
        let fallback = named("fallback").with_error(MockError::Timeout { timeout_secs: 120 });
        let provider = FailoverAIProvider::new(Arc::new(primary)).with_fallback(Arc::new(fallback));

        let err = provider.complete(test_request()).await.unwrap_err();
        assert!(matches!(err, AIError::Timeout { timeout_secs: 120 }));
    }

    #[test]
    fn reports_primary_info() {
        let provider = FailoverAIProvider::new(Arc::new(named("primary")))
            .with_fallback(Arc::new(named("fallback")));
        assert_eq!(provider.provider_info().name, "primary");
    }
}
