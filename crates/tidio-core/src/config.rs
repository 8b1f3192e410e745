//! Bridge configuration
//!
//! Everything the OAuth flow and API client need to know about the
//! vendor lives here, passed explicitly to constructors.

use std::path::PathBuf;
use std::time::Duration;

/// Base URL of the Tidio HTTP API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.tidio.com";

/// Hosted login page the browser is sent to during connect.
pub const DEFAULT_AUTH_PAGE_URL: &str = "https://www.tidio.com/panel/login";

/// Public client identifier sent with the token exchange.
pub const DEFAULT_CLIENT_ID: &str = "mcp-tidio";

/// First port tried for the local callback listener.
pub const DEFAULT_CALLBACK_PORT: u16 = 3333;

/// Wall-clock budget for the user to finish the browser handshake.
pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for the Tidio bridge.
#[derive(Debug, Clone)]
pub struct TidioConfig {
    /// Base URL for vendor API calls (token exchange, integration).
    pub api_base_url: String,
    /// Hosted authentication page opened in the user's browser.
    pub auth_page_url: String,
    /// Fixed public client identifier for the token exchange.
    pub client_id: String,
    /// First candidate port for the callback listener; binding scans
    /// upward from here on failure.
    pub callback_port_start: u16,
    /// How long to wait for the browser redirect before giving up.
    pub auth_timeout: Duration,
    /// Externally reachable base URL for the callback, e.g. a tunnel.
    /// When unset the callback URL is `http://localhost:{port}`.
    pub public_base_url: Option<String>,
    /// Override for the credential file location (tests use this);
    /// defaults to `~/.tidio-mcp/credentials.json`.
    pub credentials_path: Option<PathBuf>,
}

impl Default for TidioConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_page_url: DEFAULT_AUTH_PAGE_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            callback_port_start: DEFAULT_CALLBACK_PORT,
            auth_timeout: DEFAULT_AUTH_TIMEOUT,
            public_base_url: None,
            credentials_path: None,
        }
    }
}

impl TidioConfig {
    /// Point API calls at a different base URL (mock servers in tests).
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Store credentials somewhere other than the default path.
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Start the callback port scan at a different port.
    pub fn with_callback_port_start(mut self, port: u16) -> Self {
        self.callback_port_start = port;
        self
    }

    /// Shorten or lengthen the browser-handshake budget.
    pub fn with_auth_timeout(mut self, timeout: Duration) -> Self {
        self.auth_timeout = timeout;
        self
    }
}
