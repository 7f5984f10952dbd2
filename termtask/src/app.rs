//! Application state and event handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use termtask_proto::document::TaskDocument;

use crate::session::{Action, Session};
use crate::sync::{StoreCommand, StoreEvent};

/// Which panel is currently focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Text input box is focused (default).
    Input,
    /// Task list is focused.
    List,
}

/// Main application state.
///
/// Wraps the [`Session`] (task list, draft, edit mode) with the purely
/// visual state: cursor position, panel focus, list selection, connection
/// status, and a transient status message.
pub struct App {
    /// Task list and edit-session state.
    pub session: Session,
    /// Cursor position in the draft (character index).
    pub cursor_position: usize,
    /// Which panel is focused.
    pub focus: PanelFocus,
    /// Selected task index in the list panel.
    pub selected: usize,
    /// Whether the store connection is up.
    pub is_connected: bool,
    /// Human-readable store backend description ("Remote", "Local").
    pub backend_info: String,
    /// Transient status line message, replacing the key help until the
    /// next one.
    pub status_message: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// chrono format string for rendering task timestamps.
    pub timestamp_format: String,
}

impl App {
    /// Create a new application with an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            cursor_position: 0,
            focus: PanelFocus::Input,
            selected: 0,
            is_connected: false,
            backend_info: String::new(),
            status_message: None,
            should_quit: false,
            timestamp_format: "%Y-%m-%d %H:%M".to_string(),
        }
    }

    /// Set the timestamp display format (builder style).
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Update the connection indicator.
    pub fn set_connection_status(&mut self, connected: bool, backend: &str) {
        self.is_connected = connected;
        self.backend_info = backend.to_string();
    }

    /// Replace the transient status message.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// The task currently selected in the list panel, if any.
    #[must_use]
    pub fn selected_task(&self) -> Option<&TaskDocument> {
        self.session.tasks().get(self.selected)
    }

    /// Handle a key event.
    ///
    /// Returns the store command the key triggered, if any. The caller
    /// dispatches it to the sync layer.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<StoreCommand> {
        // Global shortcuts.
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return None;
            }
            (KeyCode::Esc, _) => {
                // Esc leaves an in-progress edit first; a second Esc quits.
                if self.session.is_editing() {
                    self.session.apply(Action::CancelEdit);
                    self.cursor_position = 0;
                } else {
                    self.should_quit = true;
                }
                return None;
            }
            (KeyCode::Tab | KeyCode::BackTab, _) => {
                self.toggle_focus();
                return None;
            }
            _ => {}
        }

        // Focus-specific shortcuts.
        match self.focus {
            PanelFocus::Input => self.handle_input_key(key),
            PanelFocus::List => self.handle_list_key(key),
        }
    }

    /// Apply a store event to the session and visual state.
    pub fn apply_store_event(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::Loaded(documents) => {
                let count = documents.len();
                self.session.apply(Action::Load(documents));
                self.clamp_selection();
                self.set_status(format!("Loaded {count} tasks"));
            }
            StoreEvent::Created(document) => {
                self.session.apply(Action::Created(document));
                self.cursor_position = 0;
            }
            StoreEvent::Updated { id, fields } => {
                self.session.apply(Action::Updated { id, fields });
                self.cursor_position = 0;
            }
            StoreEvent::Deleted { id } => {
                self.session.apply(Action::Deleted { id });
                self.clamp_selection();
            }
            StoreEvent::Failed { operation, error } => {
                self.set_status(format!("Store {operation} failed: {error}"));
            }
        }
    }

    /// Handle key event when the input box is focused.
    fn handle_input_key(&mut self, key: KeyEvent) -> Option<StoreCommand> {
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Char(c) => {
                self.enter_char(c);
                None
            }
            KeyCode::Backspace => {
                self.delete_char();
                None
            }
            KeyCode::Left => {
                self.move_cursor_left();
                None
            }
            KeyCode::Right => {
                self.move_cursor_right();
                None
            }
            KeyCode::Home => {
                self.cursor_position = 0;
                None
            }
            KeyCode::End => {
                self.cursor_position = self.draft_len();
                None
            }
            _ => None,
        }
    }

    /// Handle key event when the task list is focused.
    fn handle_list_key(&mut self, key: KeyEvent) -> Option<StoreCommand> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.session.tasks().len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                self.begin_edit_selected();
                None
            }
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('r') => Some(StoreCommand::FetchAll),
            _ => None,
        }
    }

    /// Submit the current draft.
    fn submit(&mut self) -> Option<StoreCommand> {
        let cmd = self.session.apply(Action::Submit);
        if cmd.is_none() {
            self.set_status("A task needs some text first");
        }
        cmd
    }

    /// Enter edit mode for the selected task, preloading the input.
    fn begin_edit_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let id = task.id.clone();
        self.session.apply(Action::BeginEdit(id));
        self.cursor_position = self.draft_len();
        self.focus = PanelFocus::Input;
    }

    /// Request deletion of the selected task.
    fn delete_selected(&mut self) -> Option<StoreCommand> {
        let Some(task) = self.selected_task() else {
            return None;
        };
        let id = task.id.clone();
        let cmd = self.session.apply(Action::Delete(id));
        if cmd.is_none() && self.session.is_editing() {
            self.set_status("Finish or cancel the edit before eliminating a task");
        }
        cmd
    }

    /// Toggle focus between the input box and the task list.
    const fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            PanelFocus::Input => PanelFocus::List,
            PanelFocus::List => PanelFocus::Input,
        };
    }

    /// Keep the selection inside the list after it shrinks.
    fn clamp_selection(&mut self) {
        let len = self.session.tasks().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Draft length in characters.
    fn draft_len(&self) -> usize {
        self.session.draft.chars().count()
    }

    /// Byte offset of the cursor within the draft.
    fn byte_index(&self) -> usize {
        self.session
            .draft
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_position)
            .unwrap_or(self.session.draft.len())
    }

    /// Insert a character at the cursor position.
    fn enter_char(&mut self, c: char) {
        let index = self.byte_index();
        self.session.draft.insert(index, c);
        self.cursor_position += 1;
    }

    /// Delete the character before the cursor.
    fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        self.cursor_position -= 1;
        let index = self.byte_index();
        self.session.draft.remove(index);
    }

    /// Move cursor left.
    const fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    /// Move cursor right.
    fn move_cursor_right(&mut self) {
        if self.cursor_position < self.draft_len() {
            self.cursor_position += 1;
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
