mod common;

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde_json::json;

use aims_client::request::Method;
use aims_client::{AimsClient, ClientConfig};
use common::MockTransport;

fn client_with(mock: &Arc<MockTransport>) -> AimsClient {
    AimsClient::new(mock.clone(), ClientConfig::default())
}

#[tokio::test]
async fn creation_reveals_the_secret_exactly_once() {
    let mock = Arc::new(MockTransport::new());
    mock.push_response(json!({
        "access_key_id": "k1",
        "user_id": "u-1",
        "label": "api",
        "secret_key": "s3cret-material",
    }));
    // The subsequent listing, as the service actually answers it: no secret.
    mock.push_response(json!({
        "access_keys": [
            {"access_key_id": "k1", "user_id": "u-1", "label": "api", "last_used_at": 1700000000},
        ]
    }));
    let client = client_with(&mock);

    let created = client.create_access_key("1000", "u-1", "api").await.unwrap();
    assert_eq!(created.access_key_id, "k1");
    assert_eq!(created.secret_key.expose_secret(), "s3cret-material");

    let keys = client.get_access_keys("1000", "u-1", None).await.unwrap();
    assert_eq!(keys.len(), 1);

    // `AccessKey` has no secret field at the type level; even a misbehaving
    // server echoing one back cannot leak it through this shape.
    let rendered = serde_json::to_value(&keys[0]).unwrap();
    assert!(rendered.get("secret_key").is_none());

    let captured = mock.captured();
    // Creation is a create descriptor with no TTL: never cacheable.
    assert_eq!(captured[0].method, Method::Create);
    assert_eq!(captured[0].cache_ttl_ms, None);
    // The listing defaults to the 60s TTL hint.
    assert_eq!(captured[1].cache_ttl_ms, Some(60_000));
}

#[tokio::test]
async fn a_listing_entry_with_a_stray_secret_drops_it_on_decode() {
    let mock = Arc::new(MockTransport::new());
    mock.push_response(json!({
        "access_keys": [
            {"access_key_id": "k2", "user_id": "u-1", "label": "ci", "secret_key": "leaked"},
        ]
    }));
    let client = client_with(&mock);

    let keys = client.get_access_keys("1000", "u-1", None).await.unwrap();
    let rendered = serde_json::to_value(&keys[0]).unwrap();
    assert_eq!(rendered.get("label"), Some(&json!("ci")));
    assert!(rendered.get("secret_key").is_none());
}

#[tokio::test]
async fn key_reads_by_id_are_global_and_retryable() {
    let mock = Arc::new(MockTransport::new());
    mock.push_response(json!({"access_key_id": "k1", "user_id": "u-1", "label": "api"}));
    let client = client_with(&mock);

    let key = client.get_access_key_by_id("k1").await.unwrap();
    assert_eq!(key.access_key_id, "k1");

    let descriptor = mock.last_descriptor();
    assert_eq!(descriptor.account_id, None);
    assert_eq!(descriptor.path, "/access_keys/k1");
    assert!(descriptor.retry_budget > 0);
}

#[tokio::test]
async fn relabel_and_delete_are_zero_retry_mutations() {
    let mock = Arc::new(MockTransport::new());
    mock.push_response(json!({"access_key_id": "k1", "user_id": "u-1", "label": "renamed"}));
    mock.push_response(json!(null));
    let client = client_with(&mock);

    let key = client.update_access_key("k1", "renamed").await.unwrap();
    assert_eq!(key.label, "renamed");
    client.delete_access_key("1000", "u-1", "k1").await.unwrap();

    let captured = mock.captured();
    assert_eq!(captured[0].method, Method::Update);
    assert_eq!(captured[0].retry_budget, 0);
    assert_eq!(captured[1].method, Method::Delete);
    assert_eq!(captured[1].path, "/users/u-1/access_keys/k1");
    assert_eq!(captured[1].account_id.as_deref(), Some("1000"));
}
