//! HTTP surface: webhook verification, message receiver, health.

pub mod payload;
pub mod signature;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::bot::Bot;
use crate::webhook::payload::{Envelope, WebhookEvent};
use crate::whatsapp::WhatsAppClient;

/// Shared handler state.
pub struct AppState {
    pub bot: Arc<Bot>,
    pub whatsapp: Arc<WhatsAppClient>,
    pub verify_token: String,
    pub app_secret: Option<SecretString>,
    pub provider_configured: bool,
}

/// Build the webhook router.
pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/webhook", get(verify_webhook).post(receive_webhook))
        .route("/send-message", post(send_message))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Verification handshake (GET /webhook) ───────────────────────────

#[derive(Debug, Deserialize)]
struct VerifyParams {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
}

/// Meta sends `GET /webhook?hub.mode=subscribe&hub.challenge=...&hub.verify_token=...`
/// once at registration; we echo the challenge as plain text on a match.
async fn verify_webhook(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VerifyParams>,
) -> Response {
    let token_ok = params.verify_token.as_deref() == Some(state.verify_token.as_str());
    if params.mode.as_deref() == Some("subscribe") && token_ok {
        tracing::info!("Webhook verified");
        return (StatusCode::OK, params.challenge.unwrap_or_default()).into_response();
    }

    tracing::warn!("Webhook verification failed: token mismatch or wrong mode");
    (StatusCode::FORBIDDEN, "Verification failed").into_response()
}

// ── Message receiver (POST /webhook) ────────────────────────────────

/// Receive a webhook delivery. Malformed payloads are logged and
/// acknowledged with 200 anyway; redelivering them would not help.
///
/// Messages are handled sequentially, in delivery order, and the 200
/// acknowledgment is sent only after handling completes. Replies
/// therefore go out in the order the messages arrived, both within one
/// delivery and across deliveries (Meta waits for the ack before
/// sending the next one).
async fn receive_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(secret) = &state.app_secret {
        let header = headers
            .get("X-Hub-Signature-256")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !signature::verify(secret.expose_secret(), &body, header) {
            tracing::warn!("Invalid webhook signature, rejecting delivery");
            return (StatusCode::FORBIDDEN, "Invalid signature").into_response();
        }
    }

    let envelope: Envelope = match serde_json::from_slice(&body) {
        Ok(env) => env,
        Err(e) => {
            tracing::warn!(error = %e, "Unparseable webhook payload, dropping");
            return ack();
        }
    };

    if !envelope.is_whatsapp() {
        tracing::debug!(object = %envelope.object, "Ignoring non-WhatsApp webhook object");
        return ack();
    }

    for status in envelope.statuses() {
        tracing::info!(
            status = status.status.as_deref().unwrap_or("unknown"),
            recipient = status.recipient_id.as_deref().unwrap_or("unknown"),
            "Delivery status update"
        );
    }

    for event in envelope.events() {
        match event {
            Ok(WebhookEvent::Message(msg)) => {
                tracing::info!(sender = %msg.sender_id, kind = ?msg.kind, "Inbound message");
                if let Err(e) = state.bot.handle(&msg).await {
                    tracing::error!(error = %e, sender = %msg.sender_id, "Failed to handle message");
                }
            }
            Ok(WebhookEvent::Welcome { sender }) => {
                tracing::info!(sender = %sender, "Welcome event");
                if let Err(e) = state.bot.send_welcome(&sender).await {
                    tracing::error!(error = %e, sender = %sender, "Failed to send welcome");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Dropping invalid inbound message");
            }
        }
    }

    ack()
}

fn ack() -> Response {
    Json(json!({ "status": "EVENT_RECEIVED" })).into_response()
}

// ── Operator endpoints ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SendMessageRequest {
    to: String,
    message: String,
}

/// Operator-initiated send, bypassing dispatch.
async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendMessageRequest>,
) -> Response {
    match state.whatsapp.send_text(&req.to, &req.message).await {
        Ok(()) => Json(json!({ "status": "sent", "to": req.to })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, to = %req.to, "Operator send failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

async fn root(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "message": "WhatsApp Career Coach Bot",
        "status": "healthy",
        "webhook_url": "/webhook",
        "generative_provider": state.provider_configured,
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "api_version": "v18.0",
        "webhook_path": "/webhook",
        "signature_check": state.app_secret.is_some(),
        "generative_provider": state.provider_configured,
    }))
}
