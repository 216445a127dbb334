//! Router assembly and HTTP handlers.
//!
//! SYSTEM CONTEXT
//! ==============
//! The identity backend is configured with a custom SMS sender pointing at
//! `POST /send-sms`. End-to-end tests then read the recorded messages back
//! to complete OTP flows. The sender may post a raw body, a JSON object, or
//! `key=value` lines, depending on its configured content type.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::{AppState, SmsMessage};

const MESSAGE_KEYS: [&str; 3] = ["message", "body", "text"];
const RECIPIENT_KEYS: [&str; 2] = ["to", "recipient"];

// =============================================================================
// ROUTER
// =============================================================================

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/send-sms", post(send_sms))
        .route("/messages", get(list_messages))
        .route("/messages/last", get(last_message))
        .route("/clear", post(clear_messages))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResponse {
    pub id: Uuid,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearResponse {
    pub cleared: usize,
}

/// Recipient and text pulled out of a `/send-sms` request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingSms {
    pub to: Option<String>,
    pub message: String,
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn send_sms(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<SendResponse>, StatusCode> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let incoming = parse_sms_body(content_type, &body);
    if incoming.message.trim().is_empty() {
        warn!(?content_type, "send-sms request carried no message");
        return Err(StatusCode::BAD_REQUEST);
    }

    let message = SmsMessage::new(incoming.to, incoming.message);
    let id = message.id;
    info!(%id, to = ?message.to, otp = %message.otp, "sms recorded");
    state.record(message).await;
    Ok(Json(SendResponse { id, status: "sent".into() }))
}

async fn list_messages(State(state): State<AppState>) -> Json<Vec<SmsMessage>> {
    Json(state.all().await)
}

async fn last_message(State(state): State<AppState>) -> Result<Json<SmsMessage>, StatusCode> {
    state.last().await.map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn clear_messages(State(state): State<AppState>) -> Json<ClearResponse> {
    let cleared = state.clear().await;
    info!(cleared, "messages cleared");
    Json(ClearResponse { cleared })
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// BODY PARSING
// =============================================================================

/// Interpret a `/send-sms` body.
///
/// JSON objects are read when the content type says JSON or the body looks
/// like an object; `key=value` lines when a message key is present; anything
/// else is the message text itself.
#[must_use]
pub fn parse_sms_body(content_type: Option<&str>, body: &str) -> IncomingSms {
    let declared_json = content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));
    if declared_json || body.trim_start().starts_with('{') {
        if let Some(incoming) = parse_json(body) {
            return incoming;
        }
    }
    if let Some(incoming) = parse_lines(body) {
        return incoming;
    }
    IncomingSms { to: None, message: body.trim().to_owned() }
}

fn parse_json(body: &str) -> Option<IncomingSms> {
    let Value::Object(fields) = serde_json::from_str::<Value>(body).ok()? else {
        return None;
    };
    let pick = |keys: &[&str]| {
        keys.iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .map(str::to_owned)
    };
    Some(IncomingSms { to: pick(&RECIPIENT_KEYS[..]), message: pick(&MESSAGE_KEYS[..]).unwrap_or_default() })
}

/// `to=...\nmessage=...`. Lines without a known key continue the message.
fn parse_lines(body: &str) -> Option<IncomingSms> {
    let mut to = None;
    let mut message: Option<String> = None;
    for line in body.lines() {
        match line.split_once('=') {
            Some((key, value)) if RECIPIENT_KEYS.contains(&key.trim()) => to = Some(value.trim().to_owned()),
            Some((key, value)) if MESSAGE_KEYS.contains(&key.trim()) => message = Some(value.to_owned()),
            _ => {
                if let Some(message) = message.as_mut() {
                    message.push('\n');
                    message.push_str(line);
                }
            }
        }
    }
    message.map(|message| IncomingSms { to, message: message.trim().to_owned() })
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
