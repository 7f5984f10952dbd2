//! Integration tests: remote store gateway against a live store server.
//!
//! Spins up the real `termtask-store` WebSocket server in-process and
//! exercises the four gateway operations end-to-end.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use termtask::gateway::remote::RemoteStore;
use termtask::gateway::{StoreError, StoreGateway};
use termtask_proto::document::{DocumentId, TaskFields, Timestamp};
use termtask_store::server;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Starts a store server on an OS-assigned port and returns its ws:// URL.
async fn start_store() -> (String, tokio::task::JoinHandle<()>) {
    let (addr, handle) = server::start_server("127.0.0.1:0")
        .await
        .expect("failed to start store server");
    (format!("ws://{addr}/ws"), handle)
}

/// Connects a gateway with test timeouts.
async fn connect(url: &str) -> RemoteStore {
    RemoteStore::connect(url, CONNECT_TIMEOUT, REQUEST_TIMEOUT)
        .await
        .expect("gateway connect failed")
}

/// Creates task fields with an explicit timestamp.
fn fields(name: &str, millis: u64) -> TaskFields {
    TaskFields {
        name: name.to_string(),
        time: Timestamp::from_millis(millis),
    }
}

// ---------------------------------------------------------------------------
// Full CRUD lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_crud_lifecycle() {
    let (url, _handle) = start_store().await;
    let gateway = connect(&url).await;

    // Empty to start.
    assert!(gateway.list_all("tasks").await.unwrap().is_empty());

    // Create two tasks.
    let milk = gateway
        .create("tasks", fields("Buy milk", 100))
        .await
        .unwrap();
    let dog = gateway
        .create("tasks", fields("Walk dog", 200))
        .await
        .unwrap();
    assert_ne!(milk, dog);

    // List returns both, oldest first.
    let docs = gateway.list_all("tasks").await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].fields.name, "Buy milk");
    assert_eq!(docs[1].fields.name, "Walk dog");

    // Overwrite the first wholesale.
    gateway
        .set("tasks", &milk, fields("Buy oat milk", 300))
        .await
        .unwrap();
    let docs = gateway.list_all("tasks").await.unwrap();
    let edited = docs.iter().find(|d| d.id == milk).expect("milk survives");
    assert_eq!(edited.fields.name, "Buy oat milk");
    assert_eq!(edited.fields.time, Timestamp::from_millis(300));

    // Delete the second.
    gateway.delete("tasks", &dog).await.unwrap();
    let docs = gateway.list_all("tasks").await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, milk);
}

#[tokio::test]
async fn two_gateways_share_one_collection() {
    let (url, _handle) = start_store().await;
    let writer = connect(&url).await;
    let reader = connect(&url).await;

    let id = writer
        .create("tasks", fields("shared task", 100))
        .await
        .unwrap();

    let docs = reader.list_all("tasks").await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, id);
    assert_eq!(docs[0].fields.name, "shared task");
}

#[tokio::test]
async fn collections_do_not_leak_into_each_other() {
    let (url, _handle) = start_store().await;
    let gateway = connect(&url).await;

    gateway
        .create("tasks", fields("a task", 100))
        .await
        .unwrap();
    gateway
        .create("groceries", fields("a grocery", 200))
        .await
        .unwrap();

    assert_eq!(gateway.list_all("tasks").await.unwrap().len(), 1);
    assert_eq!(gateway.list_all("groceries").await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Error paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_whitespace_name_is_rejected() {
    let (url, _handle) = start_store().await;
    let gateway = connect(&url).await;

    let result = gateway.create("tasks", fields("  \t ", 100)).await;
    match result {
        Err(StoreError::Rejected(reason)) => assert!(reason.contains("empty"), "got: {reason}"),
        other => panic!("expected Rejected, got {other:?}"),
    }

    // Nothing was stored.
    assert!(gateway.list_all("tasks").await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_unknown_id_succeeds() {
    let (url, _handle) = start_store().await;
    let gateway = connect(&url).await;

    gateway
        .delete("tasks", &DocumentId::new("never-existed"))
        .await
        .unwrap();
}

#[tokio::test]
async fn set_unknown_id_upserts() {
    let (url, _handle) = start_store().await;
    let gateway = connect(&url).await;

    let id = DocumentId::new("client-chosen");
    gateway
        .set("tasks", &id, fields("upserted", 100))
        .await
        .unwrap();

    let docs = gateway.list_all("tasks").await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, id);
}
