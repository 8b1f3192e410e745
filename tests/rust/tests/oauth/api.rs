//! Token exchange client tests against a mock vendor API.
//!
//! Wire field names are contractual; these tests pin them down.

use serde_json::json;
use tidio_core::{TidioConfig, TidioError};
use tidio_oauth::TidioApiClient;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TidioApiClient {
    TidioApiClient::new(TidioConfig::default().with_api_base_url(server.uri()))
}

async fn mount_exchange(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_partial_json(json!({
            "grantType": "refresh_token",
            "clientId": "mcp-tidio",
            "refreshToken": "one-time-token",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "at-new",
            "refreshToken": "rt-new",
        })))
        .mount(server)
        .await;
}

async fn mount_integration(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/integration/project"))
        .and(header("authorization", "Bearer at-new"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "publicKey": "abc123XYZ9" })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn exchange_and_integrate_returns_all_three_fields() {
    let server = MockServer::start().await;
    mount_exchange(&server).await;
    mount_integration(&server).await;

    let exchanged = client_for(&server)
        .exchange_and_integrate("one-time-token")
        .await
        .unwrap();

    assert_eq!(exchanged.public_key, "abc123XYZ9");
    assert_eq!(exchanged.access_token, "at-new");
    assert_eq!(exchanged.refresh_token, "rt-new");
}

#[tokio::test]
async fn exchange_failure_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid_token" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .exchange_and_integrate("expired-token")
        .await
        .unwrap_err();

    match err {
        TidioError::Api { status, body } => {
            assert_eq!(status, 401);
            assert!(body.unwrap().contains("invalid_token"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn integration_failure_surfaces_after_successful_exchange() {
    let server = MockServer::start().await;
    mount_exchange(&server).await;
    Mock::given(method("GET"))
        .and(path("/integration/project"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .exchange_and_integrate("one-time-token")
        .await
        .unwrap_err();

    match err {
        TidioError::Api { status, .. } => assert_eq!(status, 503),
        other => panic!("expected Api error, got {other:?}"),
    }
}
