//! In-memory document collections.
//!
//! The [`CollectionStore`] holds every collection served by this process:
//! a map of collection name to (document id -> fields). Collections come
//! into existence on first write and documents are keyed by store-assigned
//! [`DocumentId`]s.

use std::collections::HashMap;

use tokio::sync::RwLock;

use termtask_proto::document::{DocumentId, TaskDocument, TaskFields};

/// In-memory multi-collection document store.
///
/// Thread-safe via [`RwLock`]. Each collection is an independent map of
/// document id to field set; the store performs no validation or filtering
/// of its own.
pub struct CollectionStore {
    collections: RwLock<HashMap<String, HashMap<DocumentId, TaskFields>>>,
}

impl Default for CollectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionStore {
    /// Creates a new, empty collection store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Returns every document in a collection, sorted by (time, id).
    ///
    /// An unknown collection yields an empty list — reading never creates
    /// a collection.
    pub async fn list(&self, collection: &str) -> Vec<TaskDocument> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Vec::new();
        };
        let mut all: Vec<TaskDocument> = documents
            .iter()
            .map(|(id, fields)| TaskDocument {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect();
        all.sort_by(|a, b| (a.fields.time, &a.id).cmp(&(b.fields.time, &b.id)));
        all
    }

    /// Creates a document with a fresh identifier, returning the id.
    pub async fn create(&self, collection: &str, fields: TaskFields) -> DocumentId {
        let id = DocumentId::generate();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        id
    }

    /// Overwrites a document's entire field set.
    ///
    /// Unknown identifiers are created (upsert), matching document-store
    /// `set` semantics.
    pub async fn set(&self, collection: &str, id: &DocumentId, fields: TaskFields) {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
    }

    /// Removes a document, returning whether it existed.
    ///
    /// Deleting an unknown identifier is not an error.
    pub async fn delete(&self, collection: &str, id: &DocumentId) -> bool {
        let mut collections = self.collections.write().await;
        collections
            .get_mut(collection)
            .is_some_and(|documents| documents.remove(id).is_some())
    }
}
