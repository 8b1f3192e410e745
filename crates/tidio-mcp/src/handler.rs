//! Tool dispatcher
//!
//! Stateless mapping from tool name + argument record to formatted
//! text. Input validation failures and flow errors come back as tool
//! errors, never as protocol failures; storage problems read as "not
//! connected".

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tidio_core::embed::{embed_snippet, preconnect_hint, validate_public_key};
use tidio_core::{EmbedMode, TidioConfig};
use tidio_oauth::OAuthFlow;
use tidio_store::CredentialStore;
use tracing::info;
use url::Url;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConnectRequest {
    /// Full URL of the website the chat widget will be embedded on,
    /// e.g. "https://example.com".
    pub site_url: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateEmbedRequest {
    /// Tidio widget public key (alphanumeric, 10-50 characters).
    pub public_key: String,
    /// Snippet loading mode: "async" (default) or "sync".
    #[serde(default)]
    pub mode: Option<String>,
}

/// MCP service exposing the Tidio bridge tools.
#[derive(Clone)]
pub struct TidioService {
    config: TidioConfig,
    store: CredentialStore,
    tool_router: ToolRouter<Self>,
}

impl TidioService {
    pub fn new(config: TidioConfig, store: CredentialStore) -> Self {
        Self {
            config,
            store,
            tool_router: Self::tool_router(),
        }
    }

    fn text_ok(text: impl Into<String>) -> CallToolResult {
        CallToolResult::success(vec![Content::text(text.into())])
    }

    fn text_err(text: impl Into<String>) -> CallToolResult {
        CallToolResult::error(vec![Content::text(text.into())])
    }
}

#[tool_handler]
impl ServerHandler for TidioService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Bridge to the Tidio live-chat platform. Use 'tidio_connect' to link a \
                 Tidio account (opens a browser login), 'tidio_status' to inspect the \
                 stored connection, 'tidio_disconnect' to clear it, and \
                 'generate_tidio_embed' to produce the widget snippet for a known \
                 public key."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "tidio-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[tool_router]
impl TidioService {
    #[tool(
        description = "Connect to a Tidio account. Opens the system browser for login, then stores the widget credentials for reuse. Requires the URL of the website the chat widget belongs to."
    )]
    pub async fn tidio_connect(
        &self,
        Parameters(request): Parameters<ConnectRequest>,
    ) -> Result<CallToolResult, McpError> {
        let site_url = request.site_url.trim();
        if site_url.is_empty() {
            return Ok(Self::text_err("Error: site_url must not be empty."));
        }
        if Url::parse(site_url).is_err() {
            return Ok(Self::text_err(format!(
                "Error: \"{site_url}\" is not a valid URL."
            )));
        }

        info!(site_url, "tidio_connect");
        let flow = OAuthFlow::new(self.config.clone(), self.store.clone());
        match flow.connect(site_url).await {
            Ok(record) => {
                let snippet = embed_snippet(&record.public_key, EmbedMode::Async);
                Ok(Self::text_ok(format!(
                    "Connected to Tidio.\n\n\
                     Public key: {key}\n\
                     Site: {site}\n\n\
                     Paste this snippet before your site's closing </head> tag:\n\n\
                     {snippet}\n\n\
                     Optional preconnect hint for faster widget loading:\n\n{hint}",
                    key = record.public_key,
                    site = record.site_url,
                    hint = preconnect_hint(),
                )))
            }
            Err(e) => Ok(Self::text_err(format!("Tidio connection failed: {e}"))),
        }
    }

    #[tool(description = "Show the current Tidio connection: widget public key, site, and embed snippet.")]
    pub async fn tidio_status(&self) -> Result<CallToolResult, McpError> {
        match self.store.load().await {
            Some(record) if record.is_valid() => Ok(Self::text_ok(format!(
                "Connected to Tidio.\n\n\
                 Public key: {key}\n\
                 Site: {site}\n\
                 Connected since: {since}\n\n\
                 Embed snippet:\n\n{snippet}",
                key = record.public_key,
                site = record.site_url,
                since = record.created_at,
                snippet = embed_snippet(&record.public_key, EmbedMode::Async),
            ))),
            _ => Ok(Self::text_ok(
                "Not connected to Tidio. Run 'tidio_connect' with your website URL to link an account.",
            )),
        }
    }

    #[tool(description = "Disconnect from Tidio and clear the stored credentials.")]
    pub async fn tidio_disconnect(&self) -> Result<CallToolResult, McpError> {
        let had_credentials = self.store.has_valid().await;
        if !self.store.clear().await {
            return Ok(Self::text_err(
                "Failed to clear the stored Tidio credentials.",
            ));
        }
        Ok(Self::text_ok(if had_credentials {
            "Disconnected. Stored Tidio credentials have been cleared."
        } else {
            "No Tidio credentials were stored; nothing to disconnect."
        }))
    }

    #[tool(
        description = "Generate the HTML embed snippet for a Tidio chat widget public key. Mode \"async\" (default) defers loading until the page finishes; \"sync\" emits a single script tag."
    )]
    pub async fn generate_tidio_embed(
        &self,
        Parameters(request): Parameters<GenerateEmbedRequest>,
    ) -> Result<CallToolResult, McpError> {
        let public_key = request.public_key.trim();
        if public_key.is_empty() {
            return Ok(Self::text_err("Error: public_key must not be empty."));
        }

        let mode = match request.mode.as_deref() {
            None => EmbedMode::Async,
            Some(raw) => match raw.parse() {
                Ok(mode) => mode,
                Err(e) => return Ok(Self::text_err(format!("Error: {e}"))),
            },
        };

        // Validation mismatches warn and proceed; the vendor is the
        // only authority on which keys exist.
        let warning = validate_public_key(public_key)
            .map(|w| format!("Warning: {w}. Generating the snippet anyway.\n\n"))
            .unwrap_or_default();

        Ok(Self::text_ok(format!(
            "{warning}{snippet}",
            snippet = embed_snippet(public_key, mode)
        )))
    }
}
