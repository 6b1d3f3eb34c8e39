//! LiveKit access token minting (HS256 JWT, server-side grants).

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::VoiceError;

/// Token lifetime. Dispatch calls are one-shot; a short window is plenty.
const TOKEN_TTL_SECS: i64 = 600;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// API key.
    pub iss: String,
    /// Caller identity.
    pub sub: String,
    pub nbf: i64,
    pub exp: i64,
    pub video: VideoGrant,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VideoGrant {
    #[serde(rename = "roomCreate")]
    pub room_create: bool,
    #[serde(rename = "roomAdmin")]
    pub room_admin: bool,
}

/// Mint a short-lived server token for the dispatch API.
pub fn mint(api_key: &str, api_secret: &str, identity: &str) -> Result<String, VoiceError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        iss: api_key.to_string(),
        sub: identity.to_string(),
        nbf: now,
        exp: now + TOKEN_TTL_SECS,
        video: VideoGrant {
            room_create: true,
            room_admin: true,
        },
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(api_secret.as_bytes()),
    )
    .map_err(|e| VoiceError::Token(e.to_string()))
}
