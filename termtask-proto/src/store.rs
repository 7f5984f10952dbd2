//! Store wire protocol types for the Termtask document store.
//!
//! Defines the [`StoreRequest`] / [`StoreResponse`] enums exchanged between
//! clients and the store server over WebSocket binary frames. Every request
//! carries a [`RequestId`]; the server echoes it in the response so clients
//! can correlate replies with in-flight requests.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::{DocumentId, TaskDocument, TaskFields};

/// Correlation identifier for a request/response pair (UUID v7).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new time-ordered request identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Requests sent from a client to the store server.
///
/// The store exposes exactly four operations against a named collection.
/// There is no query filtering, pagination, or schema validation — each
/// request maps directly onto one collection operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreRequest {
    /// List every document in a collection.
    ListAll {
        /// Correlation id echoed in the response.
        request_id: RequestId,
        /// Name of the collection to list.
        collection: String,
    },

    /// Create a new document; the store assigns the identifier.
    Create {
        /// Correlation id echoed in the response.
        request_id: RequestId,
        /// Name of the collection to create in.
        collection: String,
        /// Field set of the new document.
        fields: TaskFields,
    },

    /// Overwrite a document's entire field set.
    ///
    /// Unknown identifiers are created (upsert), matching document-store
    /// `set` semantics.
    Set {
        /// Correlation id echoed in the response.
        request_id: RequestId,
        /// Name of the collection containing the document.
        collection: String,
        /// Identifier of the document to overwrite.
        id: DocumentId,
        /// Replacement field set.
        fields: TaskFields,
    },

    /// Remove a document. Deleting an unknown identifier is not an error.
    Delete {
        /// Correlation id echoed in the response.
        request_id: RequestId,
        /// Name of the collection containing the document.
        collection: String,
        /// Identifier of the document to remove.
        id: DocumentId,
    },
}

impl StoreRequest {
    /// Returns the correlation id of this request.
    #[must_use]
    pub const fn request_id(&self) -> &RequestId {
        match self {
            Self::ListAll { request_id, .. }
            | Self::Create { request_id, .. }
            | Self::Set { request_id, .. }
            | Self::Delete { request_id, .. } => request_id,
        }
    }
}

/// Responses sent from the store server back to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreResponse {
    /// Answer to [`StoreRequest::ListAll`]: every document with its id.
    Listed {
        /// Correlation id of the originating request.
        request_id: RequestId,
        /// All documents in the collection, sorted by (time, id).
        documents: Vec<TaskDocument>,
    },

    /// Answer to [`StoreRequest::Create`]: the assigned identifier.
    Created {
        /// Correlation id of the originating request.
        request_id: RequestId,
        /// Store-assigned identifier of the new document.
        id: DocumentId,
    },

    /// Answer to [`StoreRequest::Set`] or [`StoreRequest::Delete`].
    Applied {
        /// Correlation id of the originating request.
        request_id: RequestId,
    },

    /// The server could not apply the request.
    Failed {
        /// Correlation id of the originating request.
        request_id: RequestId,
        /// Human-readable error description.
        reason: String,
    },
}

impl StoreResponse {
    /// Returns the correlation id of this response.
    #[must_use]
    pub const fn request_id(&self) -> &RequestId {
        match self {
            Self::Listed { request_id, .. }
            | Self::Created { request_id, .. }
            | Self::Applied { request_id }
            | Self::Failed { request_id, .. } => request_id,
        }
    }
}
