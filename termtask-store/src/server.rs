//! Store server core: shared state, WebSocket handler, and request dispatch.
//!
//! The store server accepts WebSocket connections and answers each binary
//! frame carrying a [`StoreRequest`] with exactly one [`StoreResponse`] on
//! the same socket. Connections are strict request/response — the server
//! never pushes unsolicited messages.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use termtask_proto::codec;
use termtask_proto::store::{StoreRequest, StoreResponse};

use crate::collections::CollectionStore;

/// Shared server state holding the document collections.
pub struct StoreState {
    /// The collections served by this process.
    pub collections: CollectionStore,
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreState {
    /// Creates a new server state with empty collections.
    #[must_use]
    pub fn new() -> Self {
        Self {
            collections: CollectionStore::new(),
        }
    }
}

/// Handles an upgraded WebSocket connection for a single client.
///
/// Each binary frame is decoded as a [`StoreRequest`], applied against the
/// collections, and answered with the matching [`StoreResponse`]. Malformed
/// frames are logged and skipped — the connection stays up. Text, ping and
/// pong frames are ignored.
pub async fn handle_socket(socket: WebSocket, state: Arc<StoreState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    while let Some(Ok(msg)) = ws_receiver.next().await {
        match msg {
            Message::Binary(data) => {
                let request = match codec::decode_request(&data) {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!(error = %e, "malformed store request frame, skipping");
                        continue;
                    }
                };

                let response = apply_request(&state, request).await;

                match codec::encode_response(&response) {
                    Ok(bytes) => {
                        if ws_sender.send(Message::Binary(bytes.into())).await.is_err() {
                            tracing::warn!("WebSocket write failed, closing connection");
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to encode store response");
                    }
                }
            }
            Message::Close(_) => {
                tracing::info!("received close frame");
                break;
            }
            _ => {
                // Ignore text, ping, pong frames.
            }
        }
    }

    tracing::info!("client disconnected");
}

/// Applies a single store request against the collections.
///
/// Create and set refuse documents whose name trims to nothing — the one
/// schema rule the store enforces. Everything else is a direct pass-through
/// to [`CollectionStore`].
pub async fn apply_request(state: &StoreState, request: StoreRequest) -> StoreResponse {
    match request {
        StoreRequest::ListAll {
            request_id,
            collection,
        } => {
            let documents = state.collections.list(&collection).await;
            tracing::debug!(
                collection = %collection,
                count = documents.len(),
                "list-all"
            );
            StoreResponse::Listed {
                request_id,
                documents,
            }
        }
        StoreRequest::Create {
            request_id,
            collection,
            fields,
        } => {
            if let Err(e) = fields.validate() {
                tracing::warn!(collection = %collection, error = %e, "create rejected");
                return StoreResponse::Failed {
                    request_id,
                    reason: e.to_string(),
                };
            }
            let id = state.collections.create(&collection, fields).await;
            tracing::debug!(collection = %collection, id = %id, "created document");
            StoreResponse::Created { request_id, id }
        }
        StoreRequest::Set {
            request_id,
            collection,
            id,
            fields,
        } => {
            if let Err(e) = fields.validate() {
                tracing::warn!(collection = %collection, id = %id, error = %e, "set rejected");
                return StoreResponse::Failed {
                    request_id,
                    reason: e.to_string(),
                };
            }
            state.collections.set(&collection, &id, fields).await;
            tracing::debug!(collection = %collection, id = %id, "set document");
            StoreResponse::Applied { request_id }
        }
        StoreRequest::Delete {
            request_id,
            collection,
            id,
        } => {
            let existed = state.collections.delete(&collection, &id).await;
            tracing::debug!(
                collection = %collection,
                id = %id,
                existed = existed,
                "deleted document"
            );
            StoreResponse::Applied { request_id }
        }
    }
}

/// Starts the store server on the given address and returns the bound
/// address and a join handle.
///
/// This is the primary entry point used by both `main.rs` and test code.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(StoreState::new())).await
}

/// Starts the store server with a pre-populated [`StoreState`].
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<StoreState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = axum::Router::new()
        .route("/ws", axum::routing::get(ws_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "store server error");
        }
    });

    Ok((bound_addr, handle))
}

/// axum handler that upgrades an HTTP request to a WebSocket connection.
async fn ws_handler(
    ws: axum::extract::ws::WebSocketUpgrade,
    axum::extract::State(state): axum::extract::State<Arc<StoreState>>,
) -> impl axum::response::IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}
