//! Outbound voice call dispatch via LiveKit.
//!
//! The Rust side only originates the call: it mints a server token and
//! asks the agent-dispatch service to drop the coaching agent into a
//! fresh room. SIP signaling, STT, TTS, and the conversation itself all
//! run inside the vendor platform.

pub mod dispatch;
pub mod token;

pub use dispatch::{validate_phone_number, CallDispatcher};
