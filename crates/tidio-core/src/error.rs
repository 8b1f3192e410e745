//! Typed errors for the OAuth flow and vendor API client.

use thiserror::Error;

/// Errors surfaced by the connect flow and token exchange.
///
/// Storage read errors deliberately do not appear here: the store
/// treats a missing or unreadable file as "no credentials".
#[derive(Debug, Error)]
pub enum TidioError {
    /// Vendor API answered with a non-success status.
    #[error("Tidio API error (HTTP {status}): {}", body.as_deref().unwrap_or("<no body>"))]
    Api { status: u16, body: Option<String> },

    /// The browser redirect arrived without the one-time token.
    #[error("No refresh token received.")]
    NoRefreshToken,

    /// No callback landed within the configured budget.
    #[error("Authentication timed out after {0} seconds")]
    Timeout(u64),

    /// Every candidate port up to the maximum was taken.
    #[error("no free port for the OAuth callback listener (tried {start}..={end})")]
    PortExhausted { start: u16, end: u16 },

    #[error("failed to open browser: {0}")]
    BrowserOpen(String),

    /// The listener went away without delivering a result.
    #[error("authentication flow was interrupted before completion")]
    Interrupted,

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
