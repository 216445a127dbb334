//! Typed HTTP client for the mock SMS server.
//!
//! Used by end-to-end harnesses to read back the codes the backend sent.
//! Thin wrapper over the server's JSON endpoints; `wait_for_otp` polls
//! `/messages/last` until a message with a code shows up.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use tokio::time::{Instant, sleep};

use crate::routes::{ClearResponse, SendResponse};
use crate::state::SmsMessage;

pub const URL_ENV: &str = "MOCK_SMS_URL";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const POLL_INTERVAL_MS: u64 = 100;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server URL environment variable is not set.
    #[error("missing mock sms url: env var {var} not set")]
    MissingEnv { var: &'static str },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The server returned a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// No message with a code arrived in time.
    #[error("no otp received within {0:?}")]
    Timeout(Duration),
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Debug, Clone)]
pub struct MockSmsClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<&'a str>,
    message: &'a str,
}

impl MockSmsClient {
    /// # Errors
    ///
    /// Returns `HttpClientBuild` if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url })
    }

    /// Client for the server named by `MOCK_SMS_URL`.
    ///
    /// # Errors
    ///
    /// Returns `MissingEnv` when the variable is unset or blank.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `MissingEnv` when the variable is unset or blank.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let url = lookup(URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .ok_or(ClientError::MissingEnv { var: URL_ENV })?;
        Self::new(url.trim())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Post a message the way the backend's JSON sender does.
    ///
    /// # Errors
    ///
    /// Returns `Request` or `Status` when the server rejects the message.
    pub async fn send_sms(&self, to: Option<&str>, message: &str) -> Result<SendResponse, ClientError> {
        let response = self
            .http
            .post(self.url("/send-sms"))
            .json(&SendRequest { to, message })
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;
        read_json(response).await
    }

    /// # Errors
    ///
    /// Returns `Request` or `Status` on transport or server failure.
    pub async fn messages(&self) -> Result<Vec<SmsMessage>, ClientError> {
        let response = self
            .http
            .get(self.url("/messages"))
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;
        read_json(response).await
    }

    /// Most recent message, `None` when the log is empty.
    ///
    /// # Errors
    ///
    /// Returns `Request` or `Status` on transport or server failure.
    pub async fn last_message(&self) -> Result<Option<SmsMessage>, ClientError> {
        let response = self
            .http
            .get(self.url("/messages/last"))
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        read_json(response).await.map(Some)
    }

    /// Empty the server's log; returns how many messages were dropped.
    ///
    /// # Errors
    ///
    /// Returns `Request` or `Status` on transport or server failure.
    pub async fn clear(&self) -> Result<usize, ClientError> {
        let response = self
            .http
            .post(self.url("/clear"))
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;
        read_json::<ClearResponse>(response)
            .await
            .map(|cleared| cleared.cleared)
    }

    /// Poll until the most recent message carries a code.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if none arrives within `timeout`, or the first
    /// transport error.
    pub async fn wait_for_otp(&self, timeout: Duration) -> Result<String, ClientError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(message) = self.last_message().await? {
                if !message.otp.is_empty() {
                    return Ok(message.otp);
                }
            }
            if Instant::now() >= deadline {
                return Err(ClientError::Timeout(timeout));
            }
            sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ClientError::Request(e.to_string()))?;
    if !status.is_success() {
        return Err(ClientError::Status { status: status.as_u16(), body: text });
    }
    serde_json::from_str(&text).map_err(|e| ClientError::Request(format!("invalid response body: {e}")))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
