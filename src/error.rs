//! Error types for the coach bot.

use std::time::Duration;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Send error: {0}")]
    Send(#[from] SendError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Voice error: {0}")]
    Voice(#[from] VoiceError),
}

/// Configuration-related errors. Any of these at startup is fatal:
/// the process refuses to serve traffic.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Malformed inbound webhook payloads. These are logged and dropped;
/// the webhook sender still gets a 200 so Meta does not redeliver.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Inbound message has no sender id")]
    MissingSender,

    #[error("Malformed webhook payload: {0}")]
    Malformed(String),
}

/// Outbound WhatsApp send errors.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("Send request failed: {0}")]
    Request(String),

    #[error("Graph API rejected the send ({status}): {body}")]
    Api { status: u16, body: String },
}

/// Generative provider errors. The bot never surfaces these to the
/// end user — it substitutes the static fallback reply instead.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider request failed: {0}")]
    RequestFailed(String),

    #[error("Provider returned an unusable response: {0}")]
    InvalidResponse(String),

    #[error("Provider timed out after {0:?}")]
    Timeout(Duration),

    #[error("No generative provider configured")]
    NotConfigured,
}

/// Outbound voice call errors.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("Invalid phone number: {0}")]
    InvalidNumber(String),

    #[error("Failed to mint access token: {0}")]
    Token(String),

    #[error("Dispatch request failed: {0}")]
    Request(String),

    #[error("Dispatch rejected ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Result type alias for the bot.
pub type Result<T> = std::result::Result<T, Error>;
