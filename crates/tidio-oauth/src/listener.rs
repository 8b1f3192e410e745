//! Local callback listener
//!
//! A single-use axum server bound to the first free port at or above
//! the configured start. Exactly one request to `/callback` settles
//! the surrounding flow; everything else is a waiting page or a 404.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tidio_core::{CredentialRecord, NewCredentials, TidioError};
use tidio_store::CredentialStore;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, watch, Mutex};
use tracing::{debug, error, info, warn};

use crate::api::TidioApiClient;

pub(crate) type FlowResult = Result<CredentialRecord, TidioError>;

/// One-shot settlement cell shared by the callback handler and the
/// flow's timeout path. Whichever calls first delivers the result and
/// triggers listener shutdown; the second call finds the sender gone
/// and only re-sends the (idempotent) shutdown signal.
pub(crate) struct Settlement {
    result_tx: Mutex<Option<oneshot::Sender<FlowResult>>>,
    shutdown_tx: watch::Sender<bool>,
}

impl Settlement {
    pub(crate) fn new(
        result_tx: oneshot::Sender<FlowResult>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Self {
        Self {
            result_tx: Mutex::new(Some(result_tx)),
            shutdown_tx,
        }
    }

    /// Deliver an outcome and tear the listener down.
    pub(crate) async fn settle(&self, outcome: FlowResult) {
        match self.result_tx.lock().await.take() {
            Some(tx) => {
                let _ = tx.send(outcome);
            }
            None => debug!("flow already settled, discarding late result"),
        }
        let _ = self.shutdown_tx.send(true);
    }

    /// Tear down without delivering a result (the waiting side already
    /// gave up, or never needs one).
    pub(crate) async fn close(&self) {
        self.result_tx.lock().await.take();
        let _ = self.shutdown_tx.send(true);
    }
}

/// Everything the callback handler needs to finish the handshake.
pub(crate) struct ListenerContext {
    pub settlement: Arc<Settlement>,
    pub api: TidioApiClient,
    pub store: CredentialStore,
    pub site_url: String,
}

/// Scan upward from `start` for a bindable loopback port.
pub(crate) async fn bind_first_free_port(start: u16) -> Result<TcpListener, TidioError> {
    for port in start..=u16::MAX {
        match TcpListener::bind(("127.0.0.1", port)).await {
            Ok(listener) => {
                if port != start {
                    info!("port {start} unavailable, callback listener bound to {port}");
                }
                return Ok(listener);
            }
            Err(e) => debug!("port {port} unavailable: {e}"),
        }
    }
    Err(TidioError::PortExhausted {
        start,
        end: u16::MAX,
    })
}

/// Serve the callback routes until the shutdown signal fires.
pub(crate) fn spawn(
    listener: TcpListener,
    ctx: Arc<ListenerContext>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let app = Router::new()
        .route("/", get(waiting_page))
        .route("/callback", get(handle_callback))
        .fallback(not_found)
        .with_state(ctx);

    tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
            debug!("callback listener shutting down");
        });
        if let Err(e) = server.await {
            error!("callback listener error: {e}");
        }
    });
}

#[derive(Debug, Deserialize)]
struct CallbackParams {
    #[serde(rename = "refreshToken")]
    refresh_token: Option<String>,
}

async fn waiting_page() -> Html<String> {
    Html(page(
        "Waiting for Tidio",
        "Waiting for authentication…",
        "Finish logging in to Tidio in the browser window that just opened.",
    ))
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// The handshake target. Either branch settles the flow, which shuts
/// the listener (and the flow's timer) down after this response is
/// written.
async fn handle_callback(
    State(ctx): State<Arc<ListenerContext>>,
    Query(params): Query<CallbackParams>,
) -> Html<String> {
    let Some(token) = params.refresh_token.filter(|t| !t.is_empty()) else {
        warn!("callback arrived without a refresh token");
        let err = TidioError::NoRefreshToken;
        let body = error_page(&err.to_string());
        ctx.settlement.settle(Err(err)).await;
        return Html(body);
    };

    info!("callback received, exchanging one-time token");
    let outcome = complete_handshake(&ctx, &token).await;
    let body = match &outcome {
        Ok(record) => success_page(&record.public_key),
        Err(e) => error_page(&e.to_string()),
    };
    ctx.settlement.settle(outcome).await;
    Html(body)
}

async fn complete_handshake(ctx: &ListenerContext, token: &str) -> FlowResult {
    let exchanged = ctx.api.exchange_and_integrate(token).await?;
    ctx.store
        .save(NewCredentials {
            public_key: exchanged.public_key,
            access_token: exchanged.access_token,
            refresh_token: exchanged.refresh_token,
            site_url: ctx.site_url.clone(),
        })
        .await
}

fn success_page(public_key: &str) -> String {
    page(
        "Connected to Tidio",
        "✓ Connected",
        &format!(
            "Your Tidio chat widget ({public_key}) is linked. \
             You can close this window and return to your assistant."
        ),
    )
}

fn error_page(message: &str) -> String {
    page(
        "Tidio connection failed",
        "✗ Connection failed",
        &format!("{message} — close this window and ask your assistant to try again."),
    )
}

fn page(title: &str, heading: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <style>
    body {{
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
      display: flex; align-items: center; justify-content: center;
      min-height: 100vh; margin: 0; background: #f4f5f7; color: #172b4d;
    }}
    .card {{
      background: #fff; padding: 2.5rem; border-radius: 8px; max-width: 420px;
      text-align: center; box-shadow: 0 2px 8px rgba(0, 0, 0, 0.08);
    }}
    h1 {{ font-size: 1.4rem; margin: 0 0 0.75rem; }}
    p {{ color: #42526e; line-height: 1.5; margin: 0; }}
  </style>
</head>
<body>
  <div class="card">
    <h1>{heading}</h1>
    <p>{body}</p>
  </div>
</body>
</html>"#
    )
}
