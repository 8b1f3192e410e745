//! Shared helpers for the integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tidio_oauth::BrowserOpener;
use tokio::sync::oneshot;
use url::Url;

/// Browser opener that never launches anything; it hands the
/// authentication URL to the test instead.
pub struct CapturingBrowser {
    tx: Mutex<Option<oneshot::Sender<String>>>,
}

impl CapturingBrowser {
    pub fn new() -> (Arc<Self>, oneshot::Receiver<String>) {
        let (tx, rx) = oneshot::channel();
        (
            Arc::new(Self {
                tx: Mutex::new(Some(tx)),
            }),
            rx,
        )
    }
}

impl BrowserOpener for CapturingBrowser {
    fn open(&self, url: &str) -> Result<(), String> {
        if let Some(tx) = self.tx.lock().expect("browser mutex poisoned").take() {
            let _ = tx.send(url.to_string());
        }
        Ok(())
    }
}

/// Browser opener that always fails, for the short-circuit path.
pub struct FailingBrowser;

impl BrowserOpener for FailingBrowser {
    fn open(&self, _url: &str) -> Result<(), String> {
        Err("no display".to_string())
    }
}

/// Pull the `redirect_url` query parameter out of an auth-page URL.
pub fn redirect_url_of(auth_url: &str) -> String {
    let url = Url::parse(auth_url).expect("auth URL must parse");
    url.query_pairs()
        .find(|(k, _)| k == "redirect_url")
        .map(|(_, v)| v.into_owned())
        .expect("auth URL must carry redirect_url")
}

/// Root URL (scheme + host + port) of a callback URL.
pub fn listener_root_of(callback_url: &str) -> String {
    let url = Url::parse(callback_url).expect("callback URL must parse");
    format!(
        "{}://{}:{}/",
        url.scheme(),
        url.host_str().expect("callback URL must have a host"),
        url.port().expect("callback URL must have a port"),
    )
}

/// Wait until nothing is listening at `root` anymore. Graceful
/// shutdown finishes the in-flight response first, so poll briefly.
pub async fn assert_listener_closed(root: &str) {
    for _ in 0..100 {
        if reqwest::get(root).await.is_err() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("listener at {root} is still accepting connections");
}
