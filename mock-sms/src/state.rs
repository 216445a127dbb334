//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the message log: every SMS the backend sent, oldest first, capped
//! at `max_messages` by evicting from the front.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::otp::extract_otp;

// =============================================================================
// SMS MESSAGE
// =============================================================================

/// One recorded SMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsMessage {
    pub id: Uuid,
    /// Recipient, when the sender included one.
    pub to: Option<String>,
    pub message: String,
    /// Extracted code; empty when the body carried none.
    pub otp: String,
    #[serde(with = "time::serde::rfc3339")]
    pub received_at: OffsetDateTime,
}

impl SmsMessage {
    #[must_use]
    pub fn new(to: Option<String>, message: String) -> Self {
        let otp = extract_otp(&message);
        Self { id: Uuid::new_v4(), to, message, otp, received_at: OffsetDateTime::now_utc() }
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state. Clone is required by Axum; the log is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    messages: Arc<RwLock<VecDeque<SmsMessage>>>,
    max_messages: usize,
}

impl AppState {
    #[must_use]
    pub fn new(max_messages: usize) -> Self {
        Self { messages: Arc::new(RwLock::new(VecDeque::new())), max_messages: max_messages.max(1) }
    }

    /// Append a message, evicting the oldest entries past the cap.
    pub async fn record(&self, message: SmsMessage) {
        let mut messages = self.messages.write().await;
        messages.push_back(message);
        while messages.len() > self.max_messages {
            messages.pop_front();
        }
    }

    /// All messages, oldest first.
    pub async fn all(&self) -> Vec<SmsMessage> {
        self.messages.read().await.iter().cloned().collect()
    }

    pub async fn last(&self) -> Option<SmsMessage> {
        self.messages.read().await.back().cloned()
    }

    /// Drop every message and return how many there were.
    pub async fn clear(&self) -> usize {
        let mut messages = self.messages.write().await;
        let cleared = messages.len();
        messages.clear();
        cleared
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
