//! Connect flow orchestration
//!
//! One instance per invocation: bind a port, start the listener, send
//! the browser to the vendor's hosted login with the callback URL
//! attached, then wait for whichever of {callback, timeout} settles
//! first. Listener and timer are always released together through the
//! shared settlement cell, whichever branch wins.

use std::sync::Arc;

use tidio_core::{CredentialRecord, TidioConfig, TidioError};
use tidio_store::CredentialStore;
use tokio::sync::{oneshot, watch};
use tracing::{info, warn};
use url::Url;

use crate::api::TidioApiClient;
use crate::listener::{self, ListenerContext, Settlement};

/// Seam for opening the system browser, so tests can intercept the
/// authentication URL instead of launching anything.
pub trait BrowserOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), String>;
}

/// Default opener: hand the URL to the OS.
pub struct SystemBrowser;

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), String> {
        open::that(url).map_err(|e| e.to_string())
    }
}

/// Drives one browser-redirect authentication round-trip.
pub struct OAuthFlow {
    config: TidioConfig,
    store: CredentialStore,
    browser: Arc<dyn BrowserOpener>,
}

impl OAuthFlow {
    pub fn new(config: TidioConfig, store: CredentialStore) -> Self {
        Self {
            config,
            store,
            browser: Arc::new(SystemBrowser),
        }
    }

    /// Replace the browser opener (tests).
    pub fn with_browser(mut self, browser: Arc<dyn BrowserOpener>) -> Self {
        self.browser = browser;
        self
    }

    /// Run the full connect handshake for `site_url`.
    ///
    /// Resolves exactly once: with the persisted credential record, or
    /// with the first error among port binding, browser opening, a
    /// failed callback, and timeout expiry.
    pub async fn connect(&self, site_url: &str) -> Result<CredentialRecord, TidioError> {
        let listener = listener::bind_first_free_port(self.config.callback_port_start).await?;
        let port = listener.local_addr()?.port();
        let callback_url = self.callback_url(port);
        let auth_url = self.auth_page_url(&callback_url, site_url)?;

        let (result_tx, result_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let settlement = Arc::new(Settlement::new(result_tx, shutdown_tx));

        let ctx = Arc::new(ListenerContext {
            settlement: settlement.clone(),
            api: TidioApiClient::new(self.config.clone()),
            store: self.store.clone(),
            site_url: site_url.to_string(),
        });
        listener::spawn(listener, ctx, shutdown_rx);

        info!(port, "opening browser for Tidio authentication");
        if let Err(e) = self.browser.open(auth_url.as_str()) {
            warn!("could not open browser: {e}");
            settlement.close().await;
            return Err(TidioError::BrowserOpen(e));
        }

        match tokio::time::timeout(self.config.auth_timeout, result_rx).await {
            Ok(Ok(outcome)) => {
                settlement.close().await;
                outcome
            }
            Ok(Err(_)) => {
                settlement.close().await;
                Err(TidioError::Interrupted)
            }
            Err(_) => {
                warn!("no callback within {:?}", self.config.auth_timeout);
                settlement.close().await;
                Err(TidioError::Timeout(self.config.auth_timeout.as_secs()))
            }
        }
    }

    /// The URL the vendor redirects back to. The pre-seeded `source`
    /// parameter keeps the vendor's appended `&refreshToken=...` on an
    /// already-`?`-qualified URL.
    fn callback_url(&self, port: u16) -> String {
        match &self.config.public_base_url {
            Some(base) => format!("{}/callback?source=mcp", base.trim_end_matches('/')),
            None => format!("http://localhost:{port}/callback?source=mcp"),
        }
    }

    /// Hosted login page with its six contractual query parameters.
    fn auth_page_url(&self, callback_url: &str, site_url: &str) -> Result<Url, TidioError> {
        let mut url = Url::parse(&self.config.auth_page_url)?;
        url.query_pairs_mut()
            .append_pair("redirect_url", callback_url)
            .append_pair("website_url", site_url)
            .append_pair("locale", "en")
            .append_pair("language", "en")
            .append_pair("utm_source", "mcp")
            .append_pair("utm_medium", "ai_assistant");
        Ok(url)
    }
}
