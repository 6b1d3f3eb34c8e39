//! The bot: executes dispatch actions against the vendor boundaries.
//!
//! The dispatcher decides *what* to do; this module does it — sends the
//! WhatsApp reply, or makes the bounded generative-provider call and
//! substitutes the static fallback when the provider is slow or down.

use std::sync::Arc;
use std::time::Duration;

use crate::dispatch::{replies, Action, Button, Dispatcher, InboundMessage, MessageKind};
use crate::error::{ProviderError, Result};
use crate::llm::GenerativeProvider;
use crate::whatsapp::WhatsAppClient;

/// A fully resolved outgoing reply, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Buttons { body: String, buttons: Vec<Button> },
}

pub struct Bot {
    dispatcher: Dispatcher,
    whatsapp: Arc<WhatsAppClient>,
    provider: Option<Arc<dyn GenerativeProvider>>,
    provider_timeout: Duration,
}

impl Bot {
    pub fn new(
        dispatcher: Dispatcher,
        whatsapp: Arc<WhatsAppClient>,
        provider: Option<Arc<dyn GenerativeProvider>>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            dispatcher,
            whatsapp,
            provider,
            provider_timeout,
        }
    }

    /// Process one inbound message end to end: classify, resolve, send.
    pub async fn handle(&self, message: &InboundMessage) -> Result<()> {
        let action = if message.kind == MessageKind::ButtonReply {
            // Button presses are answered from the button table, not the
            // keyword rules.
            replies::button_reply_action(&message.text)
        } else {
            self.dispatcher.dispatch(message)
        };

        let reply = self.resolve(&message.text, action).await;
        self.send(&message.sender_id, reply).await
    }

    /// Send the welcome menu (used for `request_welcome` events).
    pub async fn send_welcome(&self, to: &str) -> Result<()> {
        let reply = self.resolve("", Action::SendWelcome).await;
        self.send(to, reply).await
    }

    /// Turn an action into concrete outgoing content. Provider failures
    /// and timeouts degrade to the static fallback here; the user always
    /// gets a reply.
    async fn resolve(&self, text: &str, action: Action) -> Reply {
        match action {
            Action::SendText(body) => Reply::Text(body),
            Action::SendButtons { body, buttons } => Reply::Buttons { body, buttons },
            Action::SendWelcome => {
                let (body, buttons) = replies::welcome_menu();
                Reply::Buttons { body, buttons }
            }
            Action::ForwardToProvider { prompt_context } => {
                let prompt = build_prompt(&prompt_context, text);
                match self.generate(&prompt).await {
                    Ok(reply) => Reply::Text(reply),
                    Err(e) => {
                        tracing::warn!(error = %e, "Provider unavailable, using static fallback");
                        Reply::Text(replies::DEFAULT_REPLY.to_string())
                    }
                }
            }
        }
    }

    async fn generate(&self, prompt: &str) -> std::result::Result<String, ProviderError> {
        let provider = self.provider.as_ref().ok_or(ProviderError::NotConfigured)?;
        tokio::time::timeout(self.provider_timeout, provider.generate(prompt, None))
            .await
            .map_err(|_| ProviderError::Timeout(self.provider_timeout))?
    }

    async fn send(&self, to: &str, reply: Reply) -> Result<()> {
        match reply {
            Reply::Text(body) => self.whatsapp.send_text(to, &body).await?,
            Reply::Buttons { body, buttons } => {
                self.whatsapp.send_buttons(to, &body, &buttons).await?
            }
        }
        Ok(())
    }
}

/// Final prompt for the provider. The unmatched-text default carries an
/// empty context, in which case the prompt is the raw text itself.
fn build_prompt(prompt_context: &str, text: &str) -> String {
    if prompt_context.is_empty() {
        text.to_string()
    } else {
        format!("{prompt_context}\n\nUser message: {text}")
    }
}
