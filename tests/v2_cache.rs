//! Cache behavior of the generic endpoints, driven through a scripted
//! transport so every network round-trip is visible.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::MockTransport;
use serde_json::json;
use tyria::Client;

fn quaggan_client() -> (Client, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    transport.add(
        &common::v2_url("quaggans"),
        json!(["404", "aloha", "attack", "bear"]),
    );
    (Client::with_transport(transport.clone()), transport)
}

#[tokio::test]
async fn fresh_cache_entry_short_circuits_the_network() {
    let (client, transport) = quaggan_client();
    let cache_dir = tempfile::tempdir().unwrap();
    client.cache().set_dir(Some(cache_dir.path())).unwrap();
    client.cache().set_ttl(Duration::from_secs(3600));

    let quaggans = &client.v2().quaggans;
    assert!(!quaggans.has_cached("quaggans"));
    assert_eq!(transport.calls(), 0, "the freshness probe is offline");

    let ids = quaggans.ids().await.unwrap();
    assert_eq!(
        ids,
        vec![json!("404"), json!("aloha"), json!("attack"), json!("bear")]
    );
    assert_eq!(transport.calls(), 1);
    assert!(cache_dir.path().join("quaggans.json").exists());
    assert!(quaggans.has_cached("quaggans"));

    let again = quaggans.ids().await.unwrap();
    assert_eq!(again, ids);
    assert_eq!(transport.calls(), 1, "second call must come from the cache");
}

#[tokio::test]
async fn unset_directory_means_every_call_is_a_network_call() {
    let (client, transport) = quaggan_client();

    client.v2().quaggans.ids().await.unwrap();
    client.v2().quaggans.ids().await.unwrap();
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn zero_ttl_bypasses_a_previously_filled_cache() {
    let (client, transport) = quaggan_client();
    let cache_dir = tempfile::tempdir().unwrap();
    client.cache().set_dir(Some(cache_dir.path())).unwrap();
    client.cache().set_ttl(Duration::from_secs(3600));

    client.v2().quaggans.ids().await.unwrap();
    assert_eq!(transport.calls(), 1);

    client.cache().set_ttl(Duration::ZERO);
    client.v2().quaggans.ids().await.unwrap();
    client.v2().quaggans.ids().await.unwrap();
    assert_eq!(transport.calls(), 3);
}

#[tokio::test]
async fn expired_entries_are_refetched() {
    let (client, transport) = quaggan_client();
    let cache_dir = tempfile::tempdir().unwrap();
    client.cache().set_dir(Some(cache_dir.path())).unwrap();
    client.cache().set_ttl(Duration::from_millis(10));

    client.v2().quaggans.ids().await.unwrap();
    assert_eq!(transport.calls(), 1);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!client.v2().quaggans.has_cached("quaggans"));
    client.v2().quaggans.ids().await.unwrap();
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn corrupt_cache_entries_are_refetched() {
    let (client, transport) = quaggan_client();
    let cache_dir = tempfile::tempdir().unwrap();
    client.cache().set_dir(Some(cache_dir.path())).unwrap();
    client.cache().set_ttl(Duration::from_secs(3600));

    let ids = client.v2().quaggans.ids().await.unwrap();
    std::fs::write(cache_dir.path().join("quaggans.json"), "{\"data\": [").unwrap();

    let again = client.v2().quaggans.ids().await.unwrap();
    assert_eq!(again, ids);
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn each_operation_gets_its_own_cache_entry() {
    let transport = Arc::new(MockTransport::new());
    transport.add(&common::v2_url("quaggans"), json!(["404"]));
    transport.add(&common::v2_url("quaggans?ids=all"), json!([{"id": "404"}]));
    let client = Client::with_transport(transport.clone());

    let cache_dir = tempfile::tempdir().unwrap();
    client.cache().set_dir(Some(cache_dir.path())).unwrap();
    client.cache().set_ttl(Duration::from_secs(3600));

    client.v2().quaggans.ids().await.unwrap();
    client.v2().quaggans.get_all().await.unwrap();
    assert_eq!(transport.calls(), 2);

    assert!(cache_dir.path().join("quaggans.json").exists());
    assert!(cache_dir.path().join("quaggans.all.json").exists());
}

#[tokio::test]
async fn the_transport_can_be_replaced_at_runtime() {
    let first = Arc::new(MockTransport::new());
    first.add(&common::v2_url("quaggans"), json!(["one"]));
    let second = Arc::new(MockTransport::new());
    second.add(&common::v2_url("quaggans"), json!(["two"]));

    let client = Client::with_transport(first.clone());
    assert_eq!(client.v2().quaggans.ids().await.unwrap(), vec![json!("one")]);

    client.set_transport(second.clone());
    assert_eq!(client.v2().quaggans.ids().await.unwrap(), vec![json!("two")]);
    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 1);
}

#[tokio::test]
async fn changing_the_directory_leaves_old_entries_behind() {
    let (client, transport) = quaggan_client();
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    client.cache().set_dir(Some(first.path())).unwrap();
    client.cache().set_ttl(Duration::from_secs(3600));

    client.v2().quaggans.ids().await.unwrap();
    assert!(first.path().join("quaggans.json").exists());

    client.cache().set_dir(Some(second.path())).unwrap();
    client.v2().quaggans.ids().await.unwrap();
    assert_eq!(transport.calls(), 2);
    assert!(first.path().join("quaggans.json").exists());
    assert!(second.path().join("quaggans.json").exists());
}
