//! Integration tests: the sync layer over a remote gateway against a live
//! store server.
//!
//! Covers the full client pipeline below the TUI: StoreCommand in, gateway
//! round-trip over WebSocket, StoreEvent out.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use tokio::sync::mpsc;

use termtask::gateway::StoreGateway;
use termtask::gateway::remote::RemoteStore;
use termtask::sync::{StoreCommand, StoreEvent, spawn_sync};
use termtask_proto::document::{TaskFields, Timestamp};
use termtask_store::server;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Starts a store server and wires a sync layer to it over a remote gateway.
async fn start_synced_client() -> (
    mpsc::Sender<StoreCommand>,
    mpsc::Receiver<StoreEvent>,
    RemoteStore,
    tokio::task::JoinHandle<()>,
) {
    let (addr, handle) = server::start_server("127.0.0.1:0")
        .await
        .expect("failed to start store server");
    let url = format!("ws://{addr}/ws");

    let gateway = RemoteStore::connect(&url, CONNECT_TIMEOUT, REQUEST_TIMEOUT)
        .await
        .expect("gateway connect failed");
    let (cmd_tx, evt_rx) = spawn_sync(gateway, "tasks".to_string(), 16);

    // A second gateway for seeding and verifying server state directly.
    let side_gateway = RemoteStore::connect(&url, CONNECT_TIMEOUT, REQUEST_TIMEOUT)
        .await
        .expect("side gateway connect failed");

    (cmd_tx, evt_rx, side_gateway, handle)
}

/// Receives the next store event, failing the test on timeout.
async fn recv_event(evt_rx: &mut mpsc::Receiver<StoreEvent>) -> StoreEvent {
    tokio::time::timeout(EVENT_TIMEOUT, evt_rx.recv())
        .await
        .expect("timed out waiting for store event")
        .expect("event channel closed")
}

fn fields(name: &str, millis: u64) -> TaskFields {
    TaskFields {
        name: name.to_string(),
        time: Timestamp::from_millis(millis),
    }
}

// ---------------------------------------------------------------------------
// Command → event round trips
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_all_loads_server_state() {
    let (cmd_tx, mut evt_rx, side_gateway, _handle) = start_synced_client().await;

    // Seed the server through the side gateway.
    side_gateway
        .create("tasks", fields("Buy milk", 100))
        .await
        .unwrap();

    cmd_tx.send(StoreCommand::FetchAll).await.unwrap();
    match recv_event(&mut evt_rx).await {
        StoreEvent::Loaded(docs) => {
            assert_eq!(docs.len(), 1);
            assert_eq!(docs[0].fields.name, "Buy milk");
        }
        other => panic!("expected Loaded, got {other:?}"),
    }
}

#[tokio::test]
async fn create_round_trips_and_persists() {
    let (cmd_tx, mut evt_rx, side_gateway, _handle) = start_synced_client().await;

    cmd_tx
        .send(StoreCommand::Create {
            fields: fields("Walk dog", 200),
        })
        .await
        .unwrap();

    let created_id = match recv_event(&mut evt_rx).await {
        StoreEvent::Created(doc) => {
            assert_eq!(doc.fields.name, "Walk dog");
            doc.id
        }
        other => panic!("expected Created, got {other:?}"),
    };

    // The document is visible on the server under the assigned id.
    let docs = side_gateway.list_all("tasks").await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, created_id);
}

#[tokio::test]
async fn set_round_trips_and_overwrites() {
    let (cmd_tx, mut evt_rx, side_gateway, _handle) = start_synced_client().await;

    let id = side_gateway
        .create("tasks", fields("Buy milk", 100))
        .await
        .unwrap();

    cmd_tx
        .send(StoreCommand::Set {
            id: id.clone(),
            fields: fields("Buy oat milk", 300),
        })
        .await
        .unwrap();

    match recv_event(&mut evt_rx).await {
        StoreEvent::Updated {
            id: updated_id,
            fields,
        } => {
            assert_eq!(updated_id, id);
            assert_eq!(fields.name, "Buy oat milk");
        }
        other => panic!("expected Updated, got {other:?}"),
    }

    let docs = side_gateway.list_all("tasks").await.unwrap();
    assert_eq!(docs[0].fields.name, "Buy oat milk");
}

#[tokio::test]
async fn delete_round_trips_and_removes() {
    let (cmd_tx, mut evt_rx, side_gateway, _handle) = start_synced_client().await;

    let id = side_gateway
        .create("tasks", fields("Doomed", 100))
        .await
        .unwrap();

    cmd_tx
        .send(StoreCommand::Delete { id: id.clone() })
        .await
        .unwrap();

    match recv_event(&mut evt_rx).await {
        StoreEvent::Deleted { id: deleted_id } => assert_eq!(deleted_id, id),
        other => panic!("expected Deleted, got {other:?}"),
    }

    assert!(side_gateway.list_all("tasks").await.unwrap().is_empty());
}

#[tokio::test]
async fn rejected_create_surfaces_as_failed_event() {
    let (cmd_tx, mut evt_rx, side_gateway, _handle) = start_synced_client().await;

    cmd_tx
        .send(StoreCommand::Create {
            fields: fields("   ", 100),
        })
        .await
        .unwrap();

    match recv_event(&mut evt_rx).await {
        StoreEvent::Failed { operation, error } => {
            assert_eq!(operation, "create");
            assert!(error.contains("empty"), "got: {error}");
        }
        other => panic!("expected Failed, got {other:?}"),
    }

    // Await-then-apply: nothing reached the server.
    assert!(side_gateway.list_all("tasks").await.unwrap().is_empty());
}

#[tokio::test]
async fn commands_are_processed_in_order() {
    let (cmd_tx, mut evt_rx, _side_gateway, _handle) = start_synced_client().await;

    cmd_tx
        .send(StoreCommand::Create {
            fields: fields("first", 100),
        })
        .await
        .unwrap();
    cmd_tx
        .send(StoreCommand::Create {
            fields: fields("second", 200),
        })
        .await
        .unwrap();
    cmd_tx.send(StoreCommand::FetchAll).await.unwrap();

    let first = recv_event(&mut evt_rx).await;
    let second = recv_event(&mut evt_rx).await;
    let third = recv_event(&mut evt_rx).await;

    assert!(matches!(&first, StoreEvent::Created(d) if d.fields.name == "first"));
    assert!(matches!(&second, StoreEvent::Created(d) if d.fields.name == "second"));
    match third {
        StoreEvent::Loaded(docs) => assert_eq!(docs.len(), 2),
        other => panic!("expected Loaded, got {other:?}"),
    }
}
