//! Store gateway abstraction for Termtask.
//!
//! Defines the [`StoreGateway`] trait wrapping the four operations the
//! client performs against a named collection of the external document
//! store. Concrete implementations:
//! - [`remote::RemoteStore`] — WebSocket client against a store server
//! - [`memory::MemoryStore`] — in-process store for tests and local mode

pub mod memory;
pub mod remote;

use termtask_proto::document::{DocumentId, TaskDocument, TaskFields};

/// Errors that can occur during store gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The connection to the store has been closed.
    #[error("connection closed")]
    ConnectionClosed,

    /// The operation timed out before completing.
    #[error("store operation timed out")]
    Timeout,

    /// The store at the given URL cannot be reached.
    #[error("store at {0} is unreachable")]
    Unreachable(String),

    /// The store refused to apply the request.
    #[error("store rejected the request: {0}")]
    Rejected(String),

    /// The wire exchange was malformed (codec failure, response mismatch).
    #[error("store protocol error: {0}")]
    Protocol(String),

    /// An underlying I/O error occurred.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Async gateway trait for the four document-store operations.
///
/// The gateway is a direct pass-through to the store: no query filtering,
/// pagination, schema validation, retry, batching, or caching. Errors
/// surface to the caller as [`StoreError`]s.
pub trait StoreGateway: Send + Sync {
    /// Fetch every document in a collection, with its identifier.
    fn list_all(
        &self,
        collection: &str,
    ) -> impl std::future::Future<Output = Result<Vec<TaskDocument>, StoreError>> + Send;

    /// Create a document; the store assigns and returns the identifier.
    fn create(
        &self,
        collection: &str,
        fields: TaskFields,
    ) -> impl std::future::Future<Output = Result<DocumentId, StoreError>> + Send;

    /// Overwrite a document's entire field set (upserts unknown ids).
    fn set(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: TaskFields,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Remove a document by identifier. Unknown ids are not an error.
    fn delete(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
