//! Tidio OAuth bridge
//!
//! A short-lived localhost HTTP listener participates in the vendor's
//! browser-redirect handshake, exchanges the one-time token it
//! receives for durable credentials, and persists them.
//!
//! - `api` - the two-call token exchange client
//! - `flow` - the connect orchestrator (bind, browser, wait, settle)
//! - `listener` - the single-use axum callback server

pub mod api;
pub mod flow;
mod listener;

pub use api::{ExchangedCredentials, TidioApiClient};
pub use flow::{BrowserOpener, OAuthFlow, SystemBrowser};
