//! # API Facade
//!
//! The API layer is a **thin facade** over [`TodoStore`]. It is the single
//! entry point for front ends, whichever UI they draw.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Normalizes inputs**: users type row labels (`3`) or raw ids (`#1700000000000`);
//!   the store only understands [`TodoId`]s
//! - **Owns row labels**: a [`DisplayHandles`] registry of short numbers, kept
//!   in sync with the visible list so a todo's label is stable while it stays visible
//! - **Applies settings**: e.g. `confirm_clear = false` skips the clear prompt
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: validation, persistence and the edit session belong to the store
//! - **I/O**: no stdout, stderr, prompts or sleeps
//!
//! ## Reference Grammar
//!
//! - `N`: the row labelled `N` in the last listing; if there is none, the todo whose id is `N`
//! - `#N`: the todo whose id is `N`, never a label
//!
//! A reference that matches nothing is a silent no-op with an info message,
//! the same as a lookup miss in the store.

use crate::commands::{CmdMessage, CmdResult, Confirm, DisplayTodo};
use crate::config::TodozConfig;
use crate::error::{Result, TodozError};
use crate::handles::DisplayHandles;
use crate::model::{Filter, TodoId};
use crate::store::KeyValueBackend;
use crate::todos::TodoStore;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    ShowAll,
    Get(String),
    Set(String, String),
}

/// The main API facade for todoz operations.
///
/// Generic over `KeyValueBackend` to allow different storage backends.
pub struct TodozApi<B: KeyValueBackend> {
    store: TodoStore<B>,
    labels: DisplayHandles<u32>,
    last_label: u32,
    config: TodozConfig,
    config_dir: Option<PathBuf>,
}

impl<B: KeyValueBackend> TodozApi<B> {
    pub fn new(backend: B) -> Self {
        Self {
            store: TodoStore::new(backend),
            labels: DisplayHandles::new(),
            last_label: 0,
            config: TodozConfig::default(),
            config_dir: None,
        }
    }

    /// Uses `config`, and writes config changes back to `dir`.
    pub fn with_config(mut self, config: TodozConfig, dir: Option<PathBuf>) -> Self {
        self.config = config;
        self.config_dir = dir;
        self
    }

    pub fn store(&self) -> &TodoStore<B> {
        &self.store
    }

    pub fn load(&mut self) -> Result<CmdResult> {
        let result = self.store.load();
        self.settle(result)
    }

    pub fn add(&mut self, text: &str) -> Result<CmdResult> {
        let result = self.store.add(text);
        self.settle(result)
    }

    pub fn toggle(&mut self, reference: &str) -> Result<CmdResult> {
        let Some(id) = self.resolve(reference)? else {
            return Ok(unmatched(reference));
        };
        let result = self.store.toggle(id);
        self.settle(result)
    }

    pub fn delete(&mut self, reference: &str) -> Result<CmdResult> {
        let Some(id) = self.resolve(reference)? else {
            return Ok(unmatched(reference));
        };
        let result = self.store.delete(id);
        self.settle(result)
    }

    /// Clears the list, asking `confirm` first unless the config turned that off.
    pub fn clear_all<C: Confirm + ?Sized>(&mut self, confirm: &mut C) -> Result<CmdResult> {
        let result = if self.config.confirm_clear {
            self.store.clear_all(confirm)
        } else {
            self.store.clear_all(&mut |_: &str| true)
        };
        self.settle(result)
    }

    /// Opens an edit session seeded with the todo's current text.
    pub fn start_edit(&mut self, reference: &str) -> Result<CmdResult> {
        let Some(id) = self.resolve(reference)? else {
            return Ok(unmatched(reference));
        };
        let Some(current) = self.store.get(id).map(|t| t.text.clone()) else {
            return Ok(unmatched(reference));
        };
        self.store.start_edit(id, &current)
    }

    pub fn update_edit_text(&mut self, text: &str) -> Result<CmdResult> {
        self.store.update_edit_text(text)
    }

    /// Saves the open edit session, whichever todo it is on.
    pub fn save_edit(&mut self) -> Result<CmdResult> {
        let Some(id) = self.store.editing().map(|s| s.id) else {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::info("Nothing is being edited."));
            return Ok(result);
        };
        let result = self.store.save_edit(id);
        self.settle(result)
    }

    pub fn cancel_edit(&mut self) -> CmdResult {
        self.store.cancel_edit()
    }

    /// Start, fill and save an edit in one step.
    pub fn edit(&mut self, reference: &str, text: &str) -> Result<CmdResult> {
        let started = self.start_edit(reference)?;
        if started.editing.is_none() {
            return Ok(started);
        }
        self.store.update_edit_text(text)?;
        self.save_edit()
    }

    pub fn set_filter(&mut self, filter: Filter) -> CmdResult {
        let result = self.store.set_filter(filter);
        self.refresh_labels();
        result
    }

    /// The visible todos with their labels, plus counts and the active filter.
    pub fn list(&mut self) -> Result<CmdResult> {
        if !self.store.is_ready() {
            return Err(TodozError::NotLoaded);
        }
        self.refresh_labels();

        let listed = self
            .store
            .visible_todos()
            .into_iter()
            .map(|todo| DisplayTodo {
                label: self.labels.get(todo.id).copied().unwrap_or_default(),
                todo: todo.clone(),
                editing: self.store.is_editing(todo.id),
            })
            .collect();

        let mut result = CmdResult::default()
            .with_listed_todos(listed)
            .with_counts(self.store.counts())
            .with_filter(self.store.filter());
        result.editing = self.store.editing().cloned();
        Ok(result)
    }

    /// Where the todos are stored.
    pub fn locations(&self) -> CmdResult {
        CmdResult::default().with_locations(vec![self.store.persistence().location()])
    }

    pub fn config(&mut self, action: ConfigAction) -> Result<CmdResult> {
        let mut result = CmdResult::default();
        match action {
            ConfigAction::ShowAll => {}
            ConfigAction::Get(key) => {
                let value = self.config.get(&key)?;
                result.add_message(CmdMessage::info(format!("{} = {}", key, value)));
            }
            ConfigAction::Set(key, value) => {
                let dir = self.config_dir.clone().ok_or_else(|| {
                    TodozError::Api("This backend has no place to save settings".to_string())
                })?;
                let mut updated = self.config.clone();
                updated.set(&key, &value)?;
                updated.save(&dir)?;
                self.config = updated;
                result.add_message(CmdMessage::success(format!("{} set to {}", key, value)));
            }
        }
        Ok(result.with_config(self.config.clone()))
    }

    /// Maps a user reference to an id, if anything matches.
    pub fn resolve(&self, reference: &str) -> Result<Option<TodoId>> {
        let trimmed = reference.trim();
        let (explicit_id, digits) = match trimmed.strip_prefix('#') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let n: i64 = digits
            .parse()
            .map_err(|_| TodozError::Api(format!("Invalid todo reference: {}", reference)))?;

        if !explicit_id {
            if let Ok(label) = u32::try_from(n) {
                if let Some(id) = self.labels.find(|l| *l == label) {
                    return Ok(Some(id));
                }
            }
        }
        Ok(self.store.get(TodoId(n)).map(|t| t.id))
    }

    fn settle(&mut self, result: Result<CmdResult>) -> Result<CmdResult> {
        self.refresh_labels();
        result
    }

    fn refresh_labels(&mut self) {
        let last_label = &mut self.last_label;
        self.labels.sync(self.store.visible_todos(), |_| {
            *last_label += 1;
            *last_label
        });
    }
}

fn unmatched(reference: &str) -> CmdResult {
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "No todo matches '{}'.",
        reference.trim()
    )));
    result
}
