//! Credential store integration tests.
//!
//! The store holds no in-memory state, so a second instance over the
//! same path must observe everything the first one wrote.

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tidio_core::{NewCredentials, TidioConfig};
use tidio_store::CredentialStore;

fn config_in(dir: &TempDir) -> TidioConfig {
    TidioConfig::default().with_credentials_path(dir.path().join("credentials.json"))
}

fn sample() -> NewCredentials {
    NewCredentials {
        public_key: "abc123XYZ9".into(),
        access_token: "at-1".into(),
        refresh_token: "rt-1".into(),
        site_url: "https://example.com".into(),
    }
}

#[tokio::test]
async fn a_fresh_instance_sees_what_another_wrote() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let writer = CredentialStore::new(&config);
    let saved = writer.save(sample()).await.unwrap();

    let reader = CredentialStore::new(&config);
    assert_eq!(reader.load().await.unwrap(), saved);
    assert!(reader.has_valid().await);
}

#[tokio::test]
async fn clear_is_visible_across_instances() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    CredentialStore::new(&config).save(sample()).await.unwrap();
    assert!(CredentialStore::new(&config).clear().await);
    assert!(!CredentialStore::new(&config).has_valid().await);
}

#[tokio::test]
async fn persisted_file_uses_the_contractual_field_names() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let store = CredentialStore::new(&config);
    store.save(sample()).await.unwrap();

    let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    for field in [
        "public_key",
        "access_token",
        "refresh_token",
        "site_url",
        "created_at",
        "updated_at",
    ] {
        assert!(json.get(field).is_some(), "missing field {field}");
        assert!(json[field].is_string(), "field {field} must be a string");
    }
}

#[tokio::test]
async fn corrupt_file_reads_as_absent_and_can_be_overwritten() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let store = CredentialStore::new(&config);

    tokio::fs::create_dir_all(store.path().parent().unwrap())
        .await
        .unwrap();
    tokio::fs::write(store.path(), b"\xff\xfenot even text")
        .await
        .unwrap();
    assert!(store.load().await.is_none());

    // A save on top of garbage starts a fresh record.
    let saved = store.save(sample()).await.unwrap();
    assert_eq!(saved.created_at, saved.updated_at);
    assert!(store.has_valid().await);
}
