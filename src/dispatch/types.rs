//! Shared types for inbound message dispatch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of message the webhook delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    ButtonReply,
    Image,
    Other,
}

/// A normalized inbound message, built once per webhook delivery and
/// discarded after dispatch. No persistence layer exists or is needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Sender identifier (WhatsApp phone number).
    pub sender_id: String,
    /// Message body. For button replies this is the button id.
    pub text: String,
    pub kind: MessageKind,
    pub timestamp: DateTime<Utc>,
}

impl InboundMessage {
    pub fn new(sender_id: impl Into<String>, text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            sender_id: sender_id.into(),
            text: text.into(),
            kind,
            timestamp: Utc::now(),
        }
    }

    /// Convenience constructor for text messages.
    pub fn text(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(sender_id, text, MessageKind::Text)
    }
}

/// An interactive reply button (id + visible label).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub id: String,
    pub label: String,
}

impl Button {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A description of how to respond. The dispatcher only ever returns
/// one of these; executing it (and any network I/O) is the bot's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Send a static text reply.
    SendText(String),
    /// Send an interactive button menu.
    SendButtons { body: String, buttons: Vec<Button> },
    /// Send the welcome menu. The menu body rotates, so the content is
    /// resolved when the reply is sent, not when the rule table is built.
    SendWelcome,
    /// Forward to the generative provider. `prompt_context` is prepended
    /// to the user's text when the final prompt is built; empty for the
    /// unmatched-text default, where the prompt is the raw text itself.
    ForwardToProvider { prompt_context: String },
}

/// A single keyword rule. Rules are declared once at startup and
/// matched in declaration order; the first hit wins.
#[derive(Debug, Clone)]
pub struct ReplyRule {
    /// Lowercase keywords matched as substrings of the normalized text.
    pub keywords: Vec<String>,
    pub action: Action,
}

impl ReplyRule {
    pub fn new(keywords: &[&str], action: Action) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            action,
        }
    }
}

/// The single configured action for text that matches no rule.
/// Chosen once at startup, never decided per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultAction {
    /// Reply with the static fallback text.
    Static,
    /// Forward the raw text to the generative provider.
    Generative,
}

/// Minimal continuity state for the voice agent: lets the generative
/// provider pick up where the last check-in left off. Carried per call,
/// no cross-session durability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    pub sender_id: String,
    pub last_topic: String,
}
