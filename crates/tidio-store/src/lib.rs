//! Tidio MCP credential store
//!
//! One JSON file at a well-known per-user path, single writer assumed.
//! Every read goes back to disk; there is no in-memory cache. Read
//! failures of any kind (missing file, unreadable file, corrupt JSON)
//! mean "no credentials" and never propagate to callers.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tidio_core::{CredentialRecord, NewCredentials, TidioConfig, TidioError};
use tracing::{debug, warn};

/// Directory under the home directory holding bridge state.
pub const STORE_DIR: &str = ".tidio-mcp";

/// File name of the credential record.
pub const STORE_FILE: &str = "credentials.json";

/// File-backed credential store.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Resolve the backing path from config, defaulting to
    /// `~/.tidio-mcp/credentials.json`.
    pub fn new(config: &TidioConfig) -> Self {
        let path = config.credentials_path.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(STORE_DIR)
                .join(STORE_FILE)
        });
        Self { path }
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record from disk. `None` on missing file or parse
    /// failure; never an error.
    pub async fn load(&self) -> Option<CredentialRecord> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                debug!(path = %self.path.display(), "no credential file: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    "credential file is not valid JSON, treating as absent: {e}"
                );
                None
            }
        }
    }

    /// Write a full record. Preserves `created_at` from an existing
    /// record and stamps `updated_at` with the current time. The three
    /// token fields always land together; there is no partial write.
    pub async fn save(&self, new: NewCredentials) -> Result<CredentialRecord, TidioError> {
        let now = Utc::now().to_rfc3339();
        let created_at = match self.load().await {
            Some(existing) if !existing.created_at.is_empty() => existing.created_at,
            _ => now.clone(),
        };

        let record = CredentialRecord {
            public_key: new.public_key,
            access_token: new.access_token,
            refresh_token: new.refresh_token,
            site_url: new.site_url,
            created_at,
            updated_at: now,
        };

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&record)?;
        tokio::fs::write(&self.path, json).await?;

        debug!(path = %self.path.display(), "credentials saved");
        Ok(record)
    }

    /// Reset the file to an empty object. Returns whether the write
    /// succeeded; failure is logged, not raised.
    pub async fn clear(&self) -> bool {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                warn!(path = %self.path.display(), "failed to prepare store directory: {e}");
                return false;
            }
        }
        match tokio::fs::write(&self.path, "{}").await {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %self.path.display(), "failed to clear credentials: {e}");
                false
            }
        }
    }

    /// True when a record loads and names both a widget and a refresh
    /// token.
    pub async fn has_valid(&self) -> bool {
        self.load().await.is_some_and(|record| record.is_valid())
    }
}
