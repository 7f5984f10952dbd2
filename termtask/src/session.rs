//! Task session state and its transition function.
//!
//! [`Session`] owns the local mirror of the task collection plus the
//! edit-session state (draft text and edit mode), and [`Session::apply`] is
//! the single transition function: user actions and store confirmations go
//! in, list transformations happen in place, and the store command the
//! action requires (if any) comes out.
//!
//! Reconciliation is await-then-apply: user actions only *emit* store
//! commands; the list is mutated exclusively by the confirmation actions
//! ([`Action::Created`], [`Action::Updated`], [`Action::Deleted`]) that the
//! sync layer feeds back once the store has answered. A failed store call
//! therefore leaves the local list untouched and the session state exactly
//! as it was, ready for a retry.

use termtask_proto::document::{DocumentId, TaskDocument, TaskFields};

use crate::sync::StoreCommand;

/// Whether the draft text targets a new task or an existing one.
///
/// The editing target travels inside the variant, so a stale edit-target id
/// cannot outlive edit mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    /// The draft describes a new task.
    Idle,
    /// The draft replaces the name of the task with this identifier.
    Editing(DocumentId),
}

/// Actions accepted by the session transition function.
#[derive(Debug)]
pub enum Action {
    /// Replace the local list with the store's contents (initial fetch).
    Load(Vec<TaskDocument>),
    /// Enter edit mode for a record; its name becomes the draft.
    BeginEdit(DocumentId),
    /// Leave edit mode without touching the store.
    CancelEdit,
    /// Submit the current draft: create in idle mode, overwrite in edit mode.
    Submit,
    /// Request removal of a record. Suppressed while editing.
    Delete(DocumentId),
    /// Store confirmation: a document was created.
    Created(TaskDocument),
    /// Store confirmation: a document was overwritten.
    Updated {
        /// Identifier of the overwritten document.
        id: DocumentId,
        /// The field set now stored.
        fields: TaskFields,
    },
    /// Store confirmation: a document was removed.
    Deleted {
        /// Identifier of the removed document.
        id: DocumentId,
    },
}

/// The task list and edit-session state.
pub struct Session {
    /// Local mirror of the task collection, in initial-fetch order.
    tasks: Vec<TaskDocument>,
    /// Shared draft text for both "new task" and "edited task".
    pub draft: String,
    /// Current edit mode.
    mode: EditMode,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates an empty session in idle mode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            draft: String::new(),
            mode: EditMode::Idle,
        }
    }

    /// Returns the local task list.
    #[must_use]
    pub fn tasks(&self) -> &[TaskDocument] {
        &self.tasks
    }

    /// Returns the current edit mode.
    #[must_use]
    pub const fn mode(&self) -> &EditMode {
        &self.mode
    }

    /// Returns whether the session is in edit mode.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self.mode, EditMode::Editing(_))
    }

    /// Applies an action, returning the store command it requires, if any.
    pub fn apply(&mut self, action: Action) -> Option<StoreCommand> {
        match action {
            Action::Load(documents) => {
                self.tasks = documents;
                None
            }

            Action::BeginEdit(id) => {
                let Some(record) = self.tasks.iter().find(|t| t.id == id) else {
                    tracing::warn!(id = %id, "begin-edit on unknown record");
                    return None;
                };
                self.draft = record.fields.name.clone();
                self.mode = EditMode::Editing(id);
                None
            }

            Action::CancelEdit => {
                if self.is_editing() {
                    self.mode = EditMode::Idle;
                    self.draft.clear();
                }
                None
            }

            Action::Submit => {
                let fields = TaskFields::new(self.draft.clone());
                if let Err(e) = fields.validate() {
                    tracing::warn!(error = %e, "submit aborted");
                    return None;
                }
                match &self.mode {
                    EditMode::Idle => Some(StoreCommand::Create { fields }),
                    EditMode::Editing(id) => Some(StoreCommand::Set {
                        id: id.clone(),
                        fields,
                    }),
                }
            }

            Action::Delete(id) => {
                if let EditMode::Editing(under_edit) = &self.mode {
                    tracing::warn!(
                        id = %id,
                        under_edit = %under_edit,
                        "delete suppressed while editing"
                    );
                    return None;
                }
                Some(StoreCommand::Delete { id })
            }

            Action::Created(document) => {
                self.tasks.push(document);
                self.draft.clear();
                None
            }

            Action::Updated { id, fields } => {
                if let Some(record) = self.tasks.iter_mut().find(|t| t.id == id) {
                    record.fields = fields;
                } else {
                    tracing::warn!(id = %id, "update confirmation for unknown record");
                }
                self.mode = EditMode::Idle;
                self.draft.clear();
                None
            }

            Action::Deleted { id } => {
                self.tasks.retain(|t| t.id != id);
                None
            }
        }
    }
}
