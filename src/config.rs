//! Configuration loaded from the environment.

use std::time::Duration;

use secrecy::SecretString;

use crate::dispatch::DefaultAction;
use crate::error::ConfigError;

/// Default timeout for the generative provider call.
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 8;

/// Webhook server configuration.
///
/// Required credentials are validated here so a misconfigured process
/// fails fast instead of serving traffic it cannot answer.
#[derive(Debug, Clone)]
pub struct Config {
    /// WhatsApp Business phone number id (Graph API path segment).
    pub phone_id: String,
    /// Graph API bearer token.
    pub access_token: SecretString,
    /// Token echoed back during the Meta webhook verification handshake.
    pub verify_token: String,
    /// App secret for X-Hub-Signature-256 verification. Optional: when
    /// absent, inbound payloads are accepted unsigned.
    pub app_secret: Option<SecretString>,
    /// OpenAI API key. Optional: when absent the bot runs on static
    /// replies only.
    pub openai_api_key: Option<SecretString>,
    /// Chat model for generative replies.
    pub openai_model: String,
    /// The single configured action for unmatched text.
    pub default_reply: DefaultAction,
    /// HTTP listen port.
    pub port: u16,
    /// Bound on the generative provider call.
    pub provider_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let phone_id = require("PHONE_ID")?;
        let access_token = SecretString::from(require("ACCESS_TOKEN")?);
        let verify_token = require("VERIFY_TOKEN")?;

        let app_secret = std::env::var("APP_SECRET").ok().map(SecretString::from);
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok().map(SecretString::from);

        let openai_model =
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let default_reply = match std::env::var("COACH_DEFAULT_REPLY") {
            Ok(v) => parse_default_action(&v)?,
            Err(_) => DefaultAction::Static,
        };

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8000);

        let timeout_secs: u64 = std::env::var("COACH_PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS);

        Ok(Self {
            phone_id,
            access_token,
            verify_token,
            app_secret,
            openai_api_key,
            openai_model,
            default_reply,
            port,
            provider_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Configuration for the outbound voice call CLI.
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// LiveKit server URL (ws:// or https:// form, both accepted).
    pub url: String,
    pub api_key: String,
    pub api_secret: SecretString,
    /// Agent to dispatch into the room.
    pub agent_name: String,
}

impl VoiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: require("LIVEKIT_URL")?,
            api_key: require("LIVEKIT_API_KEY")?,
            api_secret: SecretString::from(require("LIVEKIT_API_SECRET")?),
            agent_name: std::env::var("LIVEKIT_AGENT_NAME")
                .unwrap_or_else(|_| "career-guidance-agent".to_string()),
        })
    }
}

fn require(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse the `COACH_DEFAULT_REPLY` flag.
pub fn parse_default_action(value: &str) -> Result<DefaultAction, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "static" => Ok(DefaultAction::Static),
        "generative" => Ok(DefaultAction::Generative),
        other => Err(ConfigError::InvalidValue {
            key: "COACH_DEFAULT_REPLY".to_string(),
            message: format!("expected 'static' or 'generative', got '{other}'"),
        }),
    }
}
