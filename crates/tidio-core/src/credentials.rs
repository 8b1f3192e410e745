//! Persisted credential record
//!
//! A single flat record written as JSON. All fields default to empty
//! strings so the cleared state (`{}`) and partially written files
//! deserialize without error.

use serde::{Deserialize, Serialize};

/// The credential record persisted after a successful connect.
///
/// Timestamps are ISO-8601 strings. `public_key`, `access_token` and
/// `refresh_token` are always written together; a record missing any
/// of them is not considered valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Opaque identifier of the chat-widget instance.
    #[serde(default)]
    pub public_key: String,
    /// Short-lived bearer credential for vendor API calls.
    #[serde(default)]
    pub access_token: String,
    /// Durable credential exchanged for new access tokens.
    #[serde(default)]
    pub refresh_token: String,
    /// Website the widget is embedded on.
    #[serde(default)]
    pub site_url: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl CredentialRecord {
    /// A record is usable when it names a widget and can re-authenticate.
    pub fn is_valid(&self) -> bool {
        !self.public_key.is_empty() && !self.refresh_token.is_empty()
    }
}

/// Input to a credential save: the fields obtained from one OAuth
/// round-trip. Timestamps are managed by the store.
#[derive(Debug, Clone)]
pub struct NewCredentials {
    pub public_key: String,
    pub access_token: String,
    pub refresh_token: String,
    pub site_url: String,
}
