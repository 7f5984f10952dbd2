//! Synchronization bridge wiring the TUI to the async store gateway.
//!
//! This module bridges the synchronous TUI event loop (crossterm
//! poll-based) with the async [`StoreGateway`] implementations. It spawns a
//! background tokio task and communicates with the main thread via
//! [`StoreCommand`] / [`StoreEvent`] channels.
//!
//! # Architecture
//!
//! ```text
//! TUI (main thread)  ←── StoreEvent ───  tokio background task
//!                     ─── StoreCommand →
//! ```
//!
//! The main thread sends [`StoreCommand`]s (fetch, create, set, delete) and
//! drains [`StoreEvent`]s on each tick of the poll-based event loop. Local
//! state is only mutated when a confirmation event arrives — the store is
//! the authority for every mutation (await-then-apply).

use tokio::sync::mpsc;

use termtask_proto::document::{DocumentId, TaskDocument, TaskFields};

use crate::gateway::StoreGateway;

/// Commands sent from the TUI main loop to the store background task.
#[derive(Debug)]
pub enum StoreCommand {
    /// Fetch every document in the collection.
    FetchAll,
    /// Create a new document with the given fields.
    Create {
        /// Field set of the new document.
        fields: TaskFields,
    },
    /// Overwrite the document at `id` with new fields.
    Set {
        /// Identifier of the document to overwrite.
        id: DocumentId,
        /// Replacement field set.
        fields: TaskFields,
    },
    /// Remove the document at `id`.
    Delete {
        /// Identifier of the document to remove.
        id: DocumentId,
    },
    /// Gracefully shut down the store task.
    Shutdown,
}

/// Events sent from the store background task to the TUI main loop.
#[derive(Debug)]
pub enum StoreEvent {
    /// The full collection was fetched.
    Loaded(Vec<TaskDocument>),
    /// A document was created; carries the store-assigned identifier.
    Created(TaskDocument),
    /// A document was overwritten.
    Updated {
        /// Identifier of the overwritten document.
        id: DocumentId,
        /// The field set now stored.
        fields: TaskFields,
    },
    /// A document was removed.
    Deleted {
        /// Identifier of the removed document.
        id: DocumentId,
    },
    /// A store operation failed; local state was not changed.
    Failed {
        /// Which operation failed (`fetch`, `create`, `set`, `delete`).
        operation: &'static str,
        /// Human-readable error description.
        error: String,
    },
}

/// Spawn the store background task and return channel handles.
///
/// The task owns the gateway and serializes commands in arrival order;
/// each command maps to exactly one gateway call and exactly one event.
pub fn spawn_sync<G>(
    gateway: G,
    collection: String,
    capacity: usize,
) -> (mpsc::Sender<StoreCommand>, mpsc::Receiver<StoreEvent>)
where
    G: StoreGateway + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<StoreCommand>(capacity);
    let (evt_tx, evt_rx) = mpsc::channel::<StoreEvent>(capacity);

    tokio::spawn(async move {
        command_handler(gateway, collection, cmd_rx, evt_tx).await;
    });

    (cmd_tx, evt_rx)
}

/// Background task: handle commands from the TUI main loop.
///
/// Listens for [`StoreCommand`]s and dispatches them to the gateway,
/// reporting each outcome as a [`StoreEvent`]. Failures are reported but
/// never retried.
async fn command_handler<G>(
    gateway: G,
    collection: String,
    mut cmd_rx: mpsc::Receiver<StoreCommand>,
    evt_tx: mpsc::Sender<StoreEvent>,
) where
    G: StoreGateway,
{
    while let Some(cmd) = cmd_rx.recv().await {
        let event = match cmd {
            StoreCommand::FetchAll => match gateway.list_all(&collection).await {
                Ok(documents) => StoreEvent::Loaded(documents),
                Err(e) => failed("fetch", &e),
            },
            StoreCommand::Create { fields } => {
                match gateway.create(&collection, fields.clone()).await {
                    Ok(id) => StoreEvent::Created(TaskDocument { id, fields }),
                    Err(e) => failed("create", &e),
                }
            }
            StoreCommand::Set { id, fields } => {
                match gateway.set(&collection, &id, fields.clone()).await {
                    Ok(()) => StoreEvent::Updated { id, fields },
                    Err(e) => failed("set", &e),
                }
            }
            StoreCommand::Delete { id } => match gateway.delete(&collection, &id).await {
                Ok(()) => StoreEvent::Deleted { id },
                Err(e) => failed("delete", &e),
            },
            StoreCommand::Shutdown => {
                tracing::info!("store command handler shutting down");
                break;
            }
        };

        if evt_tx.send(event).await.is_err() {
            // TUI dropped; exit.
            break;
        }
    }
}

/// Build a failure event, logging it on the way out.
fn failed(operation: &'static str, error: &crate::gateway::StoreError) -> StoreEvent {
    tracing::warn!(operation, error = %error, "store operation failed");
    StoreEvent::Failed {
        operation,
        error: error.to_string(),
    }
}
