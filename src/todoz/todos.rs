//! # Todo Store
//!
//! [`TodoStore`] is the single authority over the todo collection and the
//! transient UI state around it: the active [`Filter`], the edit session, and
//! whether the initial load has finished. Front ends hold a `&mut TodoStore`
//! (directly or through [`crate::api::TodozApi`]) and change state only
//! through the operations below.
//!
//! ## Lifecycle
//!
//! ```text
//!   new() ──► Loading ──load()──► Ready ──(add/toggle/delete/clear/edit…)──► Ready
//! ```
//!
//! `load()` is the only place data flows from storage into the store, and it
//! runs once. Until it has run every mutating operation fails with
//! [`TodozError::NotLoaded`] and leaves state untouched. That also guarantees
//! the empty pre-load collection is never written over persisted data.
//!
//! ## Persistence
//!
//! Each operation that changes the collection saves the full collection right
//! after the change. Saves are fire-and-forget: a failed write is logged and
//! reported as a warning in the returned [`CmdResult`], never retried, and
//! never turned into an `Err`. The next successful save overwrites it anyway.
//!
//! ## Edit Session
//!
//! At most one todo is being edited. `start_edit` opens a session (silently
//! dropping any previous one), `update_edit_text` replaces the draft without
//! validation, and `save_edit` validates: a blank draft discards the session
//! and leaves the record alone; otherwise the trimmed draft becomes the text.
//!
//! ## Silent No-ops
//!
//! Blank text on `add` and `save_edit` is ignored. A lookup miss on `toggle`,
//! `delete` or `save_edit` changes nothing and reports an info message.

use crate::commands::{CmdMessage, CmdResult, Confirm, Counts, EditSession};
use crate::error::{Result, TodozError};
use crate::model::{normalize_text, now_millis, Filter, IdAllocator, Todo, TodoId};
use crate::store::{KeyValueBackend, TodoPersistence};
use std::collections::HashSet;

/// Asked before `clear_all` empties the list.
pub const CLEAR_PROMPT: &str = "Are you sure you want to clear the list?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
}

pub struct TodoStore<B: KeyValueBackend> {
    persistence: TodoPersistence<B>,
    todos: Vec<Todo>,
    filter: Filter,
    edit: Option<EditSession>,
    load_state: LoadState,
    ids: IdAllocator,
}

impl<B: KeyValueBackend> TodoStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            persistence: TodoPersistence::new(backend),
            todos: Vec::new(),
            filter: Filter::default(),
            edit: None,
            load_state: LoadState::Loading,
            ids: IdAllocator::new(),
        }
    }

    /// Installs the persisted collection as the initial state.
    ///
    /// Unparseable data is logged, copied aside, and replaced by an empty list
    /// so the application stays usable. Any other read failure, or a failure to
    /// copy the bad data aside, is returned as an error and the store stays
    /// `Loading`: nothing may be saved over data that was never read. Calling it
    /// again once loaded does nothing.
    ///
    /// Records sharing an id (two adds in one millisecond from another writer)
    /// keep their order; every repeat after the first gets a fresh id.
    pub fn load(&mut self) -> Result<CmdResult> {
        let mut result = CmdResult::default();
        if self.load_state == LoadState::Ready {
            return Ok(result);
        }

        let mut todos = match self.persistence.load() {
            Ok(todos) => {
                log::info!("loaded {} todos", todos.len());
                todos
            }
            Err(err @ TodozError::Corrupt { .. }) => {
                log::error!("{}; starting with an empty list", err);
                let kept = match self.persistence.quarantine()? {
                    Some(location) => format!(" The unreadable data was copied to {}.", location),
                    None => String::new(),
                };
                result.add_message(CmdMessage::warning(format!(
                    "Saved todos could not be read; starting with an empty list.{}",
                    kept
                )));
                Vec::new()
            }
            Err(err) => {
                log::error!("failed to read saved todos: {}", err);
                return Err(err);
            }
        };

        let mut ids = IdAllocator::new();
        ids.observe(&todos);
        let mut seen = HashSet::new();
        for todo in todos.iter_mut() {
            if !seen.insert(todo.id) {
                let fresh = ids.next(todo.created_at)?;
                log::warn!("duplicate todo id {}; renumbered to {}", todo.id, fresh);
                todo.id = fresh;
            }
        }

        self.todos = todos;
        self.ids = ids;
        self.load_state = LoadState::Ready;
        Ok(result)
    }

    pub fn add(&mut self, text: &str) -> Result<CmdResult> {
        self.ensure_ready()?;
        let mut result = CmdResult::default();
        let Some(text) = normalize_text(text) else {
            return Ok(result);
        };

        let created_at = now_millis();
        let todo = Todo::new(self.ids.next(created_at)?, text, created_at);
        self.todos.push(todo.clone());
        self.persist(&mut result);

        result.add_message(CmdMessage::success(format!("Added: {}", todo.text)));
        result.affected_todos.push(todo);
        Ok(result)
    }

    pub fn toggle(&mut self, id: TodoId) -> Result<CmdResult> {
        self.ensure_ready()?;
        let mut result = CmdResult::default();
        let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) else {
            result.add_message(not_found(id));
            return Ok(result);
        };

        todo.completed = !todo.completed;
        let todo = todo.clone();
        self.persist(&mut result);

        let verb = if todo.completed { "Completed" } else { "Reopened" };
        result.add_message(CmdMessage::success(format!("{}: {}", verb, todo.text)));
        result.affected_todos.push(todo);
        Ok(result)
    }

    pub fn delete(&mut self, id: TodoId) -> Result<CmdResult> {
        self.ensure_ready()?;
        let mut result = CmdResult::default();
        let Some(pos) = self.todos.iter().position(|t| t.id == id) else {
            result.add_message(not_found(id));
            return Ok(result);
        };

        let removed = self.todos.remove(pos);
        if self.is_editing(id) {
            self.edit = None;
        }
        self.persist(&mut result);

        result.add_message(CmdMessage::success(format!("Deleted: {}", removed.text)));
        result.affected_todos.push(removed);
        Ok(result)
    }

    /// Empties the collection once `confirm` agrees to [`CLEAR_PROMPT`].
    pub fn clear_all<C: Confirm + ?Sized>(&mut self, confirm: &mut C) -> Result<CmdResult> {
        self.ensure_ready()?;
        let mut result = CmdResult::default();
        if !confirm.confirm(CLEAR_PROMPT) {
            result.add_message(CmdMessage::info("Clear cancelled."));
            return Ok(result);
        }

        let removed = std::mem::take(&mut self.todos);
        self.edit = None;
        self.persist(&mut result);

        result.add_message(CmdMessage::success(format!(
            "Cleared {} todo{}.",
            removed.len(),
            if removed.len() == 1 { "" } else { "s" }
        )));
        Ok(result.with_affected_todos(removed))
    }

    pub fn start_edit(&mut self, id: TodoId, current_text: &str) -> Result<CmdResult> {
        self.ensure_ready()?;
        if let Some(previous) = &self.edit {
            if previous.id != id {
                log::debug!("abandoning unsaved edit of {}", previous.id);
            }
        }
        self.edit = Some(EditSession {
            id,
            draft: current_text.to_string(),
        });
        Ok(CmdResult {
            editing: self.edit.clone(),
            ..Default::default()
        })
    }

    pub fn update_edit_text(&mut self, text: &str) -> Result<CmdResult> {
        self.ensure_ready()?;
        let mut result = CmdResult::default();
        match self.edit.as_mut() {
            Some(session) => {
                session.draft = text.to_string();
                result.editing = Some(session.clone());
            }
            None => result.add_message(CmdMessage::info("Nothing is being edited.")),
        }
        Ok(result)
    }

    /// Commits the draft to `id` and closes the session.
    ///
    /// Only an actual text change is persisted.
    pub fn save_edit(&mut self, id: TodoId) -> Result<CmdResult> {
        self.ensure_ready()?;
        let mut result = CmdResult::default();
        let draft = self.edit.take().map(|s| s.draft).unwrap_or_default();

        let Some(text) = normalize_text(&draft) else {
            result.add_message(CmdMessage::info("Edit discarded."));
            return Ok(result);
        };
        let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) else {
            result.add_message(not_found(id));
            return Ok(result);
        };
        if todo.text == text {
            result.add_message(CmdMessage::info("No changes."));
            return Ok(result);
        }

        todo.text = text;
        let todo = todo.clone();
        self.persist(&mut result);

        result.add_message(CmdMessage::success(format!("Updated: {}", todo.text)));
        result.affected_todos.push(todo);
        Ok(result)
    }

    /// Drops the edit session without touching the record.
    pub fn cancel_edit(&mut self) -> CmdResult {
        let mut result = CmdResult::default();
        if self.edit.take().is_some() {
            result.add_message(CmdMessage::info("Edit cancelled."));
        }
        result
    }

    /// View projection only: nothing is saved.
    pub fn set_filter(&mut self, filter: Filter) -> CmdResult {
        self.filter = filter;
        CmdResult::default().with_filter(filter)
    }

    // --- Derived views ---

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// The collection under the active filter, in insertion order.
    pub fn visible_todos(&self) -> Vec<&Todo> {
        self.todos
            .iter()
            .filter(|t| self.filter.matches(t))
            .collect()
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    pub fn active_count(&self) -> usize {
        self.total_count() - self.completed_count()
    }

    pub fn total_count(&self) -> usize {
        self.todos.len()
    }

    pub fn counts(&self) -> Counts {
        Counts {
            completed: self.completed_count(),
            total: self.total_count(),
        }
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn is_editing(&self, id: TodoId) -> bool {
        self.edit.as_ref().is_some_and(|s| s.id == id)
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn is_ready(&self) -> bool {
        self.load_state == LoadState::Ready
    }

    pub fn persistence(&self) -> &TodoPersistence<B> {
        &self.persistence
    }

    fn ensure_ready(&self) -> Result<()> {
        match self.load_state {
            LoadState::Ready => Ok(()),
            LoadState::Loading => Err(TodozError::NotLoaded),
        }
    }

    fn persist(&mut self, result: &mut CmdResult) {
        if let Err(e) = self.persistence.save(&self.todos) {
            log::error!("failed to save todos: {}", e);
            result.add_message(CmdMessage::warning(format!("Changes were not saved: {}", e)));
        }
    }
}

fn not_found(id: TodoId) -> CmdMessage {
    CmdMessage::info(format!("No todo with id {}.", id))
}
