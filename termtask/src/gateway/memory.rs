//! In-memory store gateway for tests and local mode.
//!
//! [`MemoryStore`] answers the four gateway operations immediately from a
//! process-local map. It backs unit and integration tests (substituting for
//! a live store server) and the client's local mode when no store URL is
//! configured. An `offline` switch lets tests exercise failure paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use termtask_proto::document::{DocumentId, TaskDocument, TaskFields};

use super::{StoreError, StoreGateway};

/// In-process store gateway backed by a `parking_lot` map.
///
/// Mirrors the store server's semantics: list sorts by (time, id), set
/// upserts, delete is idempotent.
pub struct MemoryStore {
    collections: RwLock<HashMap<String, HashMap<DocumentId, TaskFields>>>,
    offline: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates a new, empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            offline: AtomicBool::new(false),
        }
    }

    /// Creates a store pre-populated with documents in one collection.
    #[must_use]
    pub fn with_documents(collection: &str, documents: Vec<TaskDocument>) -> Self {
        let store = Self::new();
        {
            let mut collections = store.collections.write();
            let entry = collections.entry(collection.to_string()).or_default();
            for doc in documents {
                entry.insert(doc.id, doc.fields);
            }
        }
        store
    }

    /// Switches the store on or off line.
    ///
    /// While offline every operation returns [`StoreError::ConnectionClosed`],
    /// which lets tests drive the client's failure handling.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(StoreError::ConnectionClosed);
        }
        Ok(())
    }
}

impl StoreGateway for MemoryStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<TaskDocument>, StoreError> {
        self.check_online()?;
        let collections = self.collections.read();
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        let mut all: Vec<TaskDocument> = documents
            .iter()
            .map(|(id, fields)| TaskDocument {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect();
        all.sort_by(|a, b| (a.fields.time, &a.id).cmp(&(b.fields.time, &b.id)));
        Ok(all)
    }

    async fn create(&self, collection: &str, fields: TaskFields) -> Result<DocumentId, StoreError> {
        self.check_online()?;
        let id = DocumentId::generate();
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn set(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: TaskFields,
    ) -> Result<(), StoreError> {
        self.check_online()?;
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
        self.check_online()?;
        if let Some(documents) = self.collections.write().get_mut(collection) {
            documents.remove(id);
        }
        Ok(())
    }
}
