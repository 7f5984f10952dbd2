//! Document types for the Termtask store protocol.
//!
//! A task lives in the store as a document with two fields: the task text
//! (`name`) and the creation/last-edit timestamp (`time`). Documents are
//! keyed by a store-assigned [`DocumentId`] which clients treat as opaque.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier for a document, assigned by the store on creation.
///
/// Backed by a UUID v7 string for time-ordering on the store side; clients
/// never parse it and only compare it for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wraps an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh store-side identifier (UUID v7 text).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Returns the string representation of this identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Millisecond-precision UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a timestamp for the current instant.
    #[must_use]
    pub fn now() -> Self {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self(u64::try_from(millis).unwrap_or(u64::MAX))
    }

    /// Creates a timestamp from milliseconds since the UNIX epoch.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as milliseconds since the UNIX epoch.
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Error returned when task fields fail validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Task name is empty after trimming whitespace.
    #[error("task name is empty")]
    EmptyName,
}

/// The field set of a task document.
///
/// This is the complete store-side schema: `set` operations overwrite a
/// document with a whole new `TaskFields` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFields {
    /// The task text.
    pub name: String,
    /// When the task was created or last edited.
    pub time: Timestamp,
}

impl TaskFields {
    /// Creates task fields with the given name, stamped now.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time: Timestamp::now(),
        }
    }

    /// Validates the fields for storage.
    ///
    /// The only rule in the system: the name must be non-empty after
    /// trimming whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] if the name trims to nothing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }
}

/// A task document as returned by the store: identifier plus fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDocument {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// The document's field set.
    pub fields: TaskFields,
}
