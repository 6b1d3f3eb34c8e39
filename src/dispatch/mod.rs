//! Inbound message dispatch — pure classification, no I/O.

pub mod dispatcher;
pub mod replies;
pub mod types;

pub use dispatcher::Dispatcher;
pub use types::{
    Action, Button, ConversationContext, DefaultAction, InboundMessage, MessageKind, ReplyRule,
};
