//! WhatsApp Cloud API send client.
//!
//! Thin wrapper over the Graph API `/{phone_id}/messages` endpoint.
//! All the heavy lifting (delivery, retries, receipts) is Meta's.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

use crate::dispatch::Button;
use crate::error::SendError;

const GRAPH_API_URL: &str = "https://graph.facebook.com/v18.0";

/// Interactive sends allow at most this many reply buttons.
const MAX_BUTTONS: usize = 3;
/// Button titles are truncated to this many characters.
const MAX_BUTTON_TITLE: usize = 20;

/// Client for sending messages through the WhatsApp Business API.
pub struct WhatsAppClient {
    phone_id: String,
    access_token: SecretString,
    base_url: String,
    client: reqwest::Client,
}

impl WhatsAppClient {
    pub fn new(phone_id: String, access_token: SecretString) -> Self {
        Self {
            phone_id,
            access_token,
            base_url: GRAPH_API_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at a different Graph API host (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn messages_url(&self) -> String {
        format!("{}/{}/messages", self.base_url, self.phone_id)
    }

    /// Send a plain text message.
    pub async fn send_text(&self, to: &str, body: &str) -> Result<(), SendError> {
        self.post_message(text_payload(to, body)).await?;
        tracing::info!(to, "WhatsApp text sent");
        Ok(())
    }

    /// Send an interactive reply-button message.
    pub async fn send_buttons(
        &self,
        to: &str,
        body: &str,
        buttons: &[Button],
    ) -> Result<(), SendError> {
        self.post_message(buttons_payload(to, body, buttons)).await?;
        tracing::info!(to, buttons = buttons.len().min(MAX_BUTTONS), "WhatsApp buttons sent");
        Ok(())
    }

    async fn post_message(&self, payload: serde_json::Value) -> Result<(), SendError> {
        let resp = self
            .client
            .post(self.messages_url())
            .bearer_auth(self.access_token.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| SendError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SendError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Build the request body for a text send.
fn text_payload(to: &str, body: &str) -> serde_json::Value {
    json!({
        "messaging_product": "whatsapp",
        "to": to,
        "type": "text",
        "text": { "body": body },
    })
}

/// Build the request body for an interactive button send.
/// Enforces the vendor limits: 3 buttons, 20-char titles.
fn buttons_payload(to: &str, body: &str, buttons: &[Button]) -> serde_json::Value {
    let buttons: Vec<serde_json::Value> = buttons
        .iter()
        .take(MAX_BUTTONS)
        .map(|b| {
            json!({
                "type": "reply",
                "reply": {
                    "id": b.id,
                    "title": truncate_chars(&b.label, MAX_BUTTON_TITLE),
                }
            })
        })
        .collect();

    json!({
        "messaging_product": "whatsapp",
        "to": to,
        "type": "interactive",
        "interactive": {
            "type": "button",
            "body": { "text": body },
            "action": { "buttons": buttons },
        }
    })
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_url_includes_phone_id() {
        let client = WhatsAppClient::new("123456".into(), SecretString::from("token"));
        assert_eq!(
            client.messages_url(),
            "https://graph.facebook.com/v18.0/123456/messages"
        );
    }

    #[test]
    fn base_url_override_for_tests() {
        let client = WhatsAppClient::new("123456".into(), SecretString::from("token"))
            .with_base_url("http://127.0.0.1:9");
        assert_eq!(client.messages_url(), "http://127.0.0.1:9/123456/messages");
    }

    #[test]
    fn text_payload_shape() {
        let payload = text_payload("15551234567", "hello");
        assert_eq!(payload["messaging_product"], "whatsapp");
        assert_eq!(payload["to"], "15551234567");
        assert_eq!(payload["type"], "text");
        assert_eq!(payload["text"]["body"], "hello");
    }

    #[test]
    fn buttons_payload_shape() {
        let buttons = vec![Button::new("goals", "Career Goals")];
        let payload = buttons_payload("15551234567", "pick one", &buttons);
        assert_eq!(payload["type"], "interactive");
        assert_eq!(payload["interactive"]["type"], "button");
        assert_eq!(payload["interactive"]["body"]["text"], "pick one");
        let rendered = payload["interactive"]["action"]["buttons"].as_array().unwrap();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0]["reply"]["id"], "goals");
        assert_eq!(rendered[0]["reply"]["title"], "Career Goals");
    }

    #[test]
    fn buttons_payload_caps_at_vendor_limit() {
        let buttons: Vec<Button> = (0..5)
            .map(|i| Button::new(format!("b{i}"), format!("Button {i}")))
            .collect();
        let payload = buttons_payload("1", "pick", &buttons);
        let rendered = payload["interactive"]["action"]["buttons"].as_array().unwrap();
        assert_eq!(rendered.len(), MAX_BUTTONS);
    }

    #[test]
    fn buttons_payload_truncates_long_titles() {
        let buttons = vec![Button::new("x", "a title that is far longer than twenty chars")];
        let payload = buttons_payload("1", "pick", &buttons);
        let title = payload["interactive"]["action"]["buttons"][0]["reply"]["title"]
            .as_str()
            .unwrap();
        assert_eq!(title.chars().count(), MAX_BUTTON_TITLE);
    }

    #[tokio::test]
    async fn send_text_to_unreachable_host_is_request_error() {
        let client = WhatsAppClient::new("123".into(), SecretString::from("t"))
            .with_base_url("http://127.0.0.1:1");
        let err = client.send_text("15551234567", "hi").await.unwrap_err();
        assert!(matches!(err, SendError::Request(_)));
    }
}
