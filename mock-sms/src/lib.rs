//! Mock SMS server for end-to-end authentication flow tests.
//!
//! The identity backend's custom SMS sender posts to `/send-sms`; this
//! service records each message with the OTP it carries so a test harness
//! can complete SMS verification without a real provider.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Environment configuration |
//! | [`otp`] | OTP extraction heuristics |
//! | [`state`] | Recorded message log |
//! | [`routes`] | Axum router and body parsing |
//! | [`client`] | Typed client for test harnesses |

pub mod client;
pub mod config;
pub mod otp;
pub mod routes;
pub mod state;

pub use client::{ClientError, MockSmsClient};
pub use config::MockSmsConfig;
pub use state::{AppState, SmsMessage};
