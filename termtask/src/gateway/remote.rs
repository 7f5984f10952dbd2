//! WebSocket store gateway for Termtask.
//!
//! Implements the [`StoreGateway`] trait over a WebSocket connection to a
//! store server. Every request carries a correlation id; a background
//! reader task routes each response to the matching in-flight request via
//! a oneshot channel, so concurrent requests on the same connection are
//! answered independently.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{Mutex, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use termtask_proto::codec;
use termtask_proto::document::{DocumentId, TaskDocument, TaskFields};
use termtask_proto::store::{RequestId, StoreRequest, StoreResponse};

use super::{StoreError, StoreGateway};

/// Type alias for the write half of a WebSocket connection.
type WsSender = futures_util::stream::SplitSink<
    WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
    Message,
>;

/// Type alias for the read half of a WebSocket connection.
type WsReader =
    futures_util::stream::SplitStream<WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>>;

/// Map of in-flight requests awaiting their correlated response.
type PendingMap = Arc<parking_lot::Mutex<HashMap<RequestId, oneshot::Sender<StoreResponse>>>>;

/// WebSocket store gateway implementing the [`StoreGateway`] trait.
///
/// Created via [`RemoteStore::connect`], which establishes the WebSocket
/// connection and spawns a background reader task that dispatches responses
/// to pending requests by correlation id.
pub struct RemoteStore {
    /// The store server URL (ws:// or wss://).
    store_url: String,
    /// Write half of the WebSocket connection (shared for concurrent sends).
    ws_sender: Arc<Mutex<WsSender>>,
    /// In-flight requests keyed by correlation id.
    pending: PendingMap,
    /// Whether the WebSocket connection to the store is active.
    connected: Arc<AtomicBool>,
    /// Timeout applied to each individual request.
    request_timeout: Duration,
    /// Handle to the background reader task (kept alive for the gateway's lifetime).
    _reader_handle: tokio::task::JoinHandle<()>,
}

impl RemoteStore {
    /// Connect to a store server.
    ///
    /// Establishes the WebSocket connection within `connect_timeout` and
    /// spawns the background reader task. `request_timeout` bounds each
    /// subsequent store operation.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`] if the connection attempt times out.
    /// - [`StoreError::Unreachable`] if the URL cannot be resolved or connected.
    /// - [`StoreError::Io`] for other connection failures.
    pub async fn connect(
        store_url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let (ws_stream, _response) = tokio::time::timeout(connect_timeout, connect_async(store_url))
            .await
            .map_err(|_| {
                tracing::warn!(url = store_url, "store WebSocket connect timed out");
                StoreError::Timeout
            })?
            .map_err(|e| {
                tracing::warn!(url = store_url, err = %e, "store WebSocket connect failed");
                map_ws_connect_error(store_url, e)
            })?;

        let (ws_sender, ws_reader) = ws_stream.split();

        let pending: PendingMap = Arc::new(parking_lot::Mutex::new(HashMap::new()));
        let connected = Arc::new(AtomicBool::new(true));

        let reader_handle = tokio::spawn(reader_loop(
            ws_reader,
            Arc::clone(&pending),
            Arc::clone(&connected),
        ));

        tracing::info!(url = store_url, "connected to store server");

        Ok(Self {
            store_url: store_url.to_string(),
            ws_sender: Arc::new(Mutex::new(ws_sender)),
            pending,
            connected,
            request_timeout,
            _reader_handle: reader_handle,
        })
    }

    /// Return the store server URL this gateway is connected to.
    pub fn store_url(&self) -> &str {
        &self.store_url
    }

    /// Check whether the WebSocket connection to the store is active.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Send a request and await its correlated response.
    async fn request(&self, request: StoreRequest) -> Result<StoreResponse, StoreError> {
        if !self.connected.load(Ordering::Relaxed) {
            return Err(StoreError::ConnectionClosed);
        }

        let request_id = request.request_id().clone();
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(request_id.clone(), tx);

        let bytes = match codec::encode_request(&request) {
            Ok(b) => b,
            Err(e) => {
                self.pending.lock().remove(&request_id);
                return Err(StoreError::Protocol(e.to_string()));
            }
        };

        {
            let mut sender = self.ws_sender.lock().await;
            if let Err(e) = sender.send(Message::Binary(bytes.into())).await {
                tracing::warn!(err = %e, "store send failed");
                self.pending.lock().remove(&request_id);
                self.connected.store(false, Ordering::Relaxed);
                return Err(StoreError::ConnectionClosed);
            }
        }

        match tokio::time::timeout(self.request_timeout, rx).await {
            Ok(Ok(response)) => Ok(response),
            // The reader task dropped the sender: connection is gone.
            Ok(Err(_)) => Err(StoreError::ConnectionClosed),
            Err(_) => {
                self.pending.lock().remove(&request_id);
                tracing::warn!(request_id = %request_id, "store request timed out");
                Err(StoreError::Timeout)
            }
        }
    }
}

impl StoreGateway for RemoteStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<TaskDocument>, StoreError> {
        let response = self
            .request(StoreRequest::ListAll {
                request_id: RequestId::new(),
                collection: collection.to_string(),
            })
            .await?;
        match response {
            StoreResponse::Listed { documents, .. } => Ok(documents),
            StoreResponse::Failed { reason, .. } => Err(StoreError::Rejected(reason)),
            other => Err(unexpected_response("list-all", &other)),
        }
    }

    async fn create(&self, collection: &str, fields: TaskFields) -> Result<DocumentId, StoreError> {
        let response = self
            .request(StoreRequest::Create {
                request_id: RequestId::new(),
                collection: collection.to_string(),
                fields,
            })
            .await?;
        match response {
            StoreResponse::Created { id, .. } => Ok(id),
            StoreResponse::Failed { reason, .. } => Err(StoreError::Rejected(reason)),
            other => Err(unexpected_response("create", &other)),
        }
    }

    async fn set(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: TaskFields,
    ) -> Result<(), StoreError> {
        let response = self
            .request(StoreRequest::Set {
                request_id: RequestId::new(),
                collection: collection.to_string(),
                id: id.clone(),
                fields,
            })
            .await?;
        match response {
            StoreResponse::Applied { .. } => Ok(()),
            StoreResponse::Failed { reason, .. } => Err(StoreError::Rejected(reason)),
            other => Err(unexpected_response("set", &other)),
        }
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
        let response = self
            .request(StoreRequest::Delete {
                request_id: RequestId::new(),
                collection: collection.to_string(),
                id: id.clone(),
            })
            .await?;
        match response {
            StoreResponse::Applied { .. } => Ok(()),
            StoreResponse::Failed { reason, .. } => Err(StoreError::Rejected(reason)),
            other => Err(unexpected_response("delete", &other)),
        }
    }
}

/// Background task that reads WebSocket frames and dispatches responses.
///
/// Each decoded [`StoreResponse`] is routed to the pending request with the
/// matching correlation id. Malformed frames are logged and skipped — the
/// task does not disconnect on bad data. When the connection closes, all
/// pending requests are dropped so their callers observe
/// [`StoreError::ConnectionClosed`].
async fn reader_loop(mut ws_reader: WsReader, pending: PendingMap, connected: Arc<AtomicBool>) {
    while let Some(msg_result) = ws_reader.next().await {
        match msg_result {
            Ok(Message::Binary(data)) => match codec::decode_response(&data) {
                Ok(response) => {
                    let waiter = pending.lock().remove(response.request_id());
                    if let Some(tx) = waiter {
                        // Receiver may have timed out and gone away; that is fine.
                        let _ = tx.send(response);
                    } else {
                        tracing::debug!(
                            request_id = %response.request_id(),
                            "response for unknown request id"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(err = %e, "malformed store frame, skipping");
                }
            },
            Ok(Message::Close(_)) => {
                tracing::info!("store WebSocket closed by server");
                break;
            }
            Ok(_) => {
                // Ignore ping/pong/text frames.
            }
            Err(e) => {
                tracing::warn!(err = %e, "store WebSocket read error");
                break;
            }
        }
    }
    connected.store(false, Ordering::Relaxed);
    // Drop all pending waiters so in-flight requests fail fast.
    pending.lock().clear();
    tracing::info!("store reader task exiting");
}

/// Build the protocol error for a response of the wrong kind.
fn unexpected_response(operation: &str, response: &StoreResponse) -> StoreError {
    StoreError::Protocol(format!(
        "unexpected response to {operation}: {response:?}"
    ))
}

/// Map a `tokio_tungstenite` connection error to a [`StoreError`].
fn map_ws_connect_error(url: &str, err: tokio_tungstenite::tungstenite::Error) -> StoreError {
    use tokio_tungstenite::tungstenite::Error as WsError;
    match err {
        WsError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::ConnectionRefused
                || io_err.kind() == std::io::ErrorKind::AddrNotAvailable
            {
                StoreError::Unreachable(url.to_string())
            } else {
                StoreError::Io(io_err)
            }
        }
        WsError::Http(response) => StoreError::Io(std::io::Error::other(format!(
            "store HTTP error: status {}",
            response.status()
        ))),
        other => StoreError::Io(std::io::Error::other(format!(
            "store connection error: {other}"
        ))),
    }
}
