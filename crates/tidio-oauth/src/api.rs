//! Tidio API client
//!
//! Two sequential calls: exchange the one-time refresh token for a new
//! token pair, then use the access token to fetch the project's widget
//! public key. Field names on the wire are contractual (camelCase, the
//! same convention as the `refreshToken` callback parameter).

use serde::{Deserialize, Serialize};
use tidio_core::{TidioConfig, TidioError};
use tracing::{debug, info};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeResponse {
    access_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntegrationResponse {
    public_key: String,
}

/// Result of one full exchange round-trip.
///
/// The refresh token here is the *new* one issued by the exchange; the
/// one-time token from the callback is spent.
#[derive(Debug, Clone)]
pub struct ExchangedCredentials {
    pub public_key: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// HTTP client for the vendor API.
#[derive(Debug, Clone)]
pub struct TidioApiClient {
    http: reqwest::Client,
    config: TidioConfig,
}

impl TidioApiClient {
    pub fn new(config: TidioConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Exchange a refresh token for a fresh access + refresh token pair.
    async fn exchange(&self, refresh_token: &str) -> Result<ExchangeResponse, TidioError> {
        debug!("exchanging refresh token");
        let response = self
            .http
            .post(format!("{}/oauth/token", self.config.api_base_url))
            .json(&ExchangeRequest {
                grant_type: "refresh_token",
                client_id: &self.config.client_id,
                refresh_token,
            })
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch the project integration (widget public key) with a bearer
    /// access token.
    async fn integrate(&self, access_token: &str) -> Result<IntegrationResponse, TidioError> {
        debug!("fetching project integration");
        let response = self
            .http
            .get(format!("{}/integration/project", self.config.api_base_url))
            .bearer_auth(access_token)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// The composed operation: refresh token in, durable credentials out.
    pub async fn exchange_and_integrate(
        &self,
        refresh_token: &str,
    ) -> Result<ExchangedCredentials, TidioError> {
        let tokens = self.exchange(refresh_token).await?;
        let integration = self.integrate(&tokens.access_token).await?;
        info!(public_key = %integration.public_key, "token exchange complete");
        Ok(ExchangedCredentials {
            public_key: integration.public_key,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }

    /// Non-success statuses become a typed error carrying the status
    /// and, when readable, the response body.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TidioError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.ok().filter(|b| !b.is_empty());
        Err(TidioError::Api { status, body })
    }
}
