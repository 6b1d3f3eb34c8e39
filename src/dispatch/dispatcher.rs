//! The dispatcher: a pure function from inbound message to reply action.

use crate::dispatch::replies;
use crate::dispatch::types::{Action, DefaultAction, InboundMessage, MessageKind, ReplyRule};

/// Classifies inbound messages against an ordered rule table.
///
/// Holds no connections and performs no I/O; it only returns a
/// description of what to do. Exactly one `Action` per message.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    rules: Vec<ReplyRule>,
    default_action: DefaultAction,
}

impl Dispatcher {
    pub fn new(rules: Vec<ReplyRule>, default_action: DefaultAction) -> Self {
        Self {
            rules,
            default_action,
        }
    }

    /// Dispatcher over the coach's built-in rule table.
    pub fn with_default_rules(default_action: DefaultAction) -> Self {
        Self::new(replies::default_rules(), default_action)
    }

    /// Map a message to its reply action.
    ///
    /// Non-text and empty-text messages get the fixed fallback without
    /// consulting the rules. Otherwise the text is lowercased and
    /// trimmed, and the first rule with a keyword appearing as a
    /// substring wins. Unmatched text falls back to the configured
    /// default action.
    pub fn dispatch(&self, message: &InboundMessage) -> Action {
        if message.kind != MessageKind::Text || message.text.trim().is_empty() {
            return Action::SendText(replies::NON_TEXT_FALLBACK.to_string());
        }

        let normalized = message.text.trim().to_lowercase();

        for rule in &self.rules {
            if rule.keywords.iter().any(|k| normalized.contains(k.as_str())) {
                return rule.action.clone();
            }
        }

        match self.default_action {
            DefaultAction::Static => Action::SendText(replies::DEFAULT_REPLY.to_string()),
            DefaultAction::Generative => Action::ForwardToProvider {
                prompt_context: String::new(),
            },
        }
    }
}
