//! OpenAI chat-completions provider.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

use crate::dispatch::replies::COACH_SYSTEM_PROMPT;
use crate::dispatch::ConversationContext;
use crate::error::ProviderError;
use crate::llm::GenerativeProvider;

const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// Upper bound on reply length, in completion tokens.
const MAX_COMPLETION_TOKENS: u32 = 300;

pub struct OpenAiProvider {
    api_key: SecretString,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(api_key: SecretString, model: String) -> Self {
        Self {
            api_key,
            model,
            base_url: OPENAI_API_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the provider at a different API host (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request_body(&self, prompt: &str, context: Option<&ConversationContext>) -> serde_json::Value {
        let mut system = COACH_SYSTEM_PROMPT.to_string();
        if let Some(ctx) = context {
            system.push_str(&format!(
                " Last time you spoke, the topic was: {}.",
                ctx.last_topic
            ));
        }
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": MAX_COMPLETION_TOKENS,
            "temperature": 0.7,
        })
    }
}

#[async_trait]
impl GenerativeProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(
        &self,
        prompt: &str,
        context: Option<&ConversationContext>,
    ) -> Result<String, ProviderError> {
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&self.request_body(prompt, context))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::RequestFailed(format!(
                "chat/completions returned {status}: {body}"
            )));
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        extract_reply(&data)
    }
}

/// Pull the assistant reply out of a chat-completions response.
fn extract_reply(data: &serde_json::Value) -> Result<String, ProviderError> {
    data["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ProviderError::InvalidResponse("no message content in response".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_reply_happy_path() {
        let data = json!({
            "choices": [
                { "message": { "role": "assistant", "content": "  Update your resume first.  " } }
            ]
        });
        assert_eq!(extract_reply(&data).unwrap(), "Update your resume first.");
    }

    #[test]
    fn extract_reply_rejects_empty_choices() {
        let data = json!({ "choices": [] });
        assert!(matches!(
            extract_reply(&data),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn extract_reply_rejects_empty_content() {
        let data = json!({ "choices": [ { "message": { "content": "   " } } ] });
        assert!(extract_reply(&data).is_err());
    }

    #[test]
    fn request_body_includes_persona_and_context() {
        let provider = OpenAiProvider::new(SecretString::from("sk-test"), "gpt-4o-mini".into());
        let ctx = ConversationContext {
            sender_id: "15551234567".into(),
            last_topic: "building voice agents".into(),
        };
        let body = provider.request_body("what should I learn next?", Some(&ctx));

        assert_eq!(body["model"], "gpt-4o-mini");
        let system = body["messages"][0]["content"].as_str().unwrap();
        assert!(system.contains("Coach Alex"));
        assert!(system.contains("building voice agents"));
        assert_eq!(body["messages"][1]["content"], "what should I learn next?");
    }

    #[tokio::test]
    async fn generate_against_unreachable_host_is_request_error() {
        let provider = OpenAiProvider::new(SecretString::from("sk-test"), "gpt-4o-mini".into())
            .with_base_url("http://127.0.0.1:1");
        let err = provider.generate("hello", None).await.unwrap_err();
        assert!(matches!(err, ProviderError::RequestFailed(_)));
    }
}
