//! WhatsApp Cloud API webhook payload types and extraction.
//!
//! Meta nests each delivery as entry → changes → value → messages. All
//! fields are optional-with-default so a partial payload still parses;
//! anything unusable is rejected per message, not per envelope.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::dispatch::{InboundMessage, MessageKind};
use crate::error::ValidationError;

#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub value: ChangeValue,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<RawMessage>,
    #[serde(default)]
    pub statuses: Vec<RawStatus>,
}

#[derive(Debug, Deserialize)]
pub struct RawMessage {
    pub from: Option<String>,
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub timestamp: Option<String>,
    pub text: Option<TextBody>,
    pub interactive: Option<Interactive>,
}

#[derive(Debug, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct Interactive {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub button_reply: Option<ButtonReply>,
}

#[derive(Debug, Deserialize)]
pub struct ButtonReply {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct RawStatus {
    pub status: Option<String>,
    pub recipient_id: Option<String>,
}

/// One normalized thing the webhook told us about.
#[derive(Debug)]
pub enum WebhookEvent {
    /// A message to dispatch.
    Message(InboundMessage),
    /// First contact from a user — send the welcome menu.
    Welcome { sender: String },
}

impl Envelope {
    pub fn is_whatsapp(&self) -> bool {
        self.object == "whatsapp_business_account"
    }

    /// Flatten the envelope into per-message extraction results.
    pub fn events(&self) -> Vec<Result<WebhookEvent, ValidationError>> {
        self.entry
            .iter()
            .flat_map(|e| &e.changes)
            .flat_map(|c| &c.value.messages)
            .map(extract_event)
            .collect()
    }

    /// Delivery status updates (sent/delivered/read). Logged only.
    pub fn statuses(&self) -> impl Iterator<Item = &RawStatus> {
        self.entry
            .iter()
            .flat_map(|e| &e.changes)
            .flat_map(|c| &c.value.statuses)
    }
}

fn extract_event(raw: &RawMessage) -> Result<WebhookEvent, ValidationError> {
    let sender = raw
        .from
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::MissingSender)?
        .to_string();

    let timestamp = parse_timestamp(raw.timestamp.as_deref());

    let (kind, text) = match raw.kind.as_deref() {
        Some("text") => {
            let body = raw.text.as_ref().map(|t| t.body.clone()).unwrap_or_default();
            (MessageKind::Text, body)
        }
        Some("interactive") => match &raw.interactive {
            Some(i) if i.kind.as_deref() == Some("button_reply") => {
                let id = i
                    .button_reply
                    .as_ref()
                    .map(|b| b.id.clone())
                    .ok_or_else(|| {
                        ValidationError::Malformed("button_reply without reply body".into())
                    })?;
                (MessageKind::ButtonReply, id)
            }
            _ => (MessageKind::Other, String::new()),
        },
        Some("request_welcome") => return Ok(WebhookEvent::Welcome { sender }),
        Some("image") => (MessageKind::Image, String::new()),
        _ => (MessageKind::Other, String::new()),
    };

    Ok(WebhookEvent::Message(InboundMessage {
        sender_id: sender,
        text,
        kind,
        timestamp,
    }))
}

/// WhatsApp timestamps are epoch-seconds strings.
fn parse_timestamp(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(|s| s.parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Envelope {
        serde_json::from_str(json).unwrap()
    }

    fn text_envelope(from: &str, body: &str) -> Envelope {
        parse(&format!(
            r#"{{
                "object": "whatsapp_business_account",
                "entry": [{{ "changes": [{{ "value": {{
                    "messages": [{{
                        "from": "{from}",
                        "id": "wamid.1",
                        "type": "text",
                        "timestamp": "1700000000",
                        "text": {{ "body": "{body}" }}
                    }}]
                }} }}] }}]
            }}"#
        ))
    }

    #[test]
    fn text_message_extracts() {
        let env = text_envelope("15551234567", "resume help");
        assert!(env.is_whatsapp());
        let events = env.events();
        assert_eq!(events.len(), 1);
        let Ok(WebhookEvent::Message(msg)) = &events[0] else {
            panic!("expected a message event");
        };
        assert_eq!(msg.sender_id, "15551234567");
        assert_eq!(msg.text, "resume help");
        assert_eq!(msg.kind, MessageKind::Text);
        assert_eq!(msg.timestamp.timestamp(), 1_700_000_000);
    }

    #[test]
    fn missing_sender_is_validation_error() {
        let env = parse(
            r#"{
                "object": "whatsapp_business_account",
                "entry": [{ "changes": [{ "value": {
                    "messages": [{ "type": "text", "text": { "body": "hi" } }]
                } }] }]
            }"#,
        );
        let events = env.events();
        assert!(matches!(events[0], Err(ValidationError::MissingSender)));
    }

    #[test]
    fn button_reply_extracts_button_id_as_text() {
        let env = parse(
            r#"{
                "object": "whatsapp_business_account",
                "entry": [{ "changes": [{ "value": {
                    "messages": [{
                        "from": "15551234567",
                        "type": "interactive",
                        "interactive": {
                            "type": "button_reply",
                            "button_reply": { "id": "goals", "title": "Career Goals" }
                        }
                    }]
                } }] }]
            }"#,
        );
        let events = env.events();
        let Ok(WebhookEvent::Message(msg)) = &events[0] else {
            panic!("expected a message event");
        };
        assert_eq!(msg.kind, MessageKind::ButtonReply);
        assert_eq!(msg.text, "goals");
    }

    #[test]
    fn request_welcome_is_a_welcome_event() {
        let env = parse(
            r#"{
                "object": "whatsapp_business_account",
                "entry": [{ "changes": [{ "value": {
                    "messages": [{ "from": "15551234567", "type": "request_welcome" }]
                } }] }]
            }"#,
        );
        assert!(matches!(
            &env.events()[0],
            Ok(WebhookEvent::Welcome { sender }) if sender.as_str() == "15551234567"
        ));
    }

    #[test]
    fn unknown_types_map_to_other_with_empty_text() {
        let env = parse(
            r#"{
                "object": "whatsapp_business_account",
                "entry": [{ "changes": [{ "value": {
                    "messages": [{ "from": "15551234567", "type": "sticker" }]
                } }] }]
            }"#,
        );
        let events = env.events();
        let Ok(WebhookEvent::Message(msg)) = &events[0] else {
            panic!("expected a message event");
        };
        assert_eq!(msg.kind, MessageKind::Other);
        assert!(msg.text.is_empty());
    }

    #[test]
    fn statuses_are_exposed_for_logging() {
        let env = parse(
            r#"{
                "object": "whatsapp_business_account",
                "entry": [{ "changes": [{ "value": {
                    "statuses": [{ "status": "delivered", "recipient_id": "15551234567" }]
                } }] }]
            }"#,
        );
        assert_eq!(env.statuses().count(), 1);
        assert!(env.events().is_empty());
    }

    #[test]
    fn non_whatsapp_object_detected() {
        let env = parse(r#"{ "object": "page", "entry": [] }"#);
        assert!(!env.is_whatsapp());
    }

    #[test]
    fn empty_envelope_parses() {
        let env = parse(r#"{}"#);
        assert!(!env.is_whatsapp());
        assert!(env.events().is_empty());
    }
}
