//! Generative response adapter.
//!
//! The bot depends only on the `GenerativeProvider` trait; the OpenAI
//! implementation is one bounded chat-completions call. When no API key
//! is configured the bot runs on static replies only.

pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::dispatch::ConversationContext;
use crate::error::ProviderError;

pub use openai::OpenAiProvider;

/// A provider that turns a prompt into a short natural-language reply.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Generate a reply for `prompt`, optionally seeded with minimal
    /// conversation context. Implementations do one request/response
    /// round trip; the caller enforces the latency budget.
    async fn generate(
        &self,
        prompt: &str,
        context: Option<&ConversationContext>,
    ) -> Result<String, ProviderError>;
}

/// Create the configured provider, or `None` when no key is set.
pub fn create_provider(
    api_key: Option<SecretString>,
    model: &str,
) -> Option<Arc<dyn GenerativeProvider>> {
    let key = api_key?;
    tracing::info!(model, "Using OpenAI for generative replies");
    Some(Arc::new(OpenAiProvider::new(key, model.to_string())))
}
