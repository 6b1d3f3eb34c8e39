//! Agent dispatch: one Twirp call that starts the outbound call.

use std::sync::OnceLock;

use rand::Rng;
use regex::Regex;
use secrecy::ExposeSecret;
use serde_json::json;

use crate::config::VoiceConfig;
use crate::dispatch::ConversationContext;
use crate::error::VoiceError;
use crate::voice::token;

/// Originates outbound coaching calls through the LiveKit dispatch API.
pub struct CallDispatcher {
    config: VoiceConfig,
    client: reqwest::Client,
}

impl CallDispatcher {
    pub fn new(config: VoiceConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create an agent dispatch for an outbound call to `phone_number`.
    /// Returns the dispatch id. The optional context rides along in the
    /// job metadata so the agent can reference the last check-in topic.
    pub async fn create_dispatch(
        &self,
        phone_number: &str,
        context: Option<&ConversationContext>,
    ) -> Result<String, VoiceError> {
        validate_phone_number(phone_number)?;

        let room = random_room_name();
        let jwt = token::mint(
            &self.config.api_key,
            self.config.api_secret.expose_secret(),
            "outbound-coach",
        )?;

        let mut metadata = json!({ "phone_number": phone_number });
        if let Some(ctx) = context {
            metadata["last_topic"] = json!(ctx.last_topic);
        }

        let body = json!({
            "agent_name": self.config.agent_name,
            "room": room,
            "metadata": metadata.to_string(),
        });

        tracing::info!(phone_number, room = %room, "Creating outbound call dispatch");

        let resp = self
            .client
            .post(self.dispatch_url())
            .bearer_auth(jwt)
            .json(&body)
            .send()
            .await
            .map_err(|e| VoiceError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(VoiceError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| VoiceError::Request(e.to_string()))?;
        let dispatch_id = data["id"].as_str().unwrap_or("unknown").to_string();

        tracing::info!(dispatch_id = %dispatch_id, room = %room, "Dispatch created");
        Ok(dispatch_id)
    }

    fn dispatch_url(&self) -> String {
        format!(
            "{}/twirp/livekit.AgentDispatchService/CreateDispatch",
            http_url(&self.config.url)
        )
    }
}

/// LiveKit URLs are usually given in ws/wss form; Twirp wants http/https.
fn http_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("wss://") {
        format!("https://{rest}")
    } else if let Some(rest) = url.strip_prefix("ws://") {
        format!("http://{rest}")
    } else {
        url.trim_end_matches('/').to_string()
    }
}

/// Room names follow the original convention: "coaching-" + 10 digits.
fn random_room_name() -> String {
    let mut rng = rand::thread_rng();
    let digits: String = (0..10).map(|_| rng.gen_range(0..10).to_string()).collect();
    format!("coaching-{digits}")
}

/// E.164 check: leading `+`, then 7-15 digits.
pub fn validate_phone_number(number: &str) -> Result<(), VoiceError> {
    static E164: OnceLock<Regex> = OnceLock::new();
    let re = E164.get_or_init(|| Regex::new(r"^\+[1-9]\d{6,14}$").unwrap());
    if re.is_match(number) {
        Ok(())
    } else {
        Err(VoiceError::InvalidNumber(format!(
            "{number} is not in international format (e.g. +919650098052)"
        )))
    }
}
