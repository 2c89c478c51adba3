//! # Command Results
//!
//! Every store operation returns a [`CmdResult`], never a string. It carries
//! the todos that were touched, the rows to display, and leveled messages.
//! Front ends decide how to render it.
//!
//! Operations never print, prompt, or exit. The one operation that needs a
//! user decision (`clear_all`) receives it through the [`Confirm`] trait, so
//! the terminal, a browser dialog, and tests can each answer their own way.

use crate::config::TodozConfig;
use crate::model::{Filter, Todo, TodoId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// A todo as a front end shows it: the record, its row label, and whether it
/// is the one being edited.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayTodo {
    pub label: u32,
    pub todo: Todo,
    pub editing: bool,
}

/// The `completed/total` pair shown above the list. Never affected by the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Counts {
    pub completed: usize,
    pub total: usize,
}

/// The open edit session, as reported to front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditSession {
    pub id: TodoId,
    pub draft: String,
}

#[derive(Debug, Default, Serialize)]
pub struct CmdResult {
    pub affected_todos: Vec<Todo>,
    pub listed_todos: Vec<DisplayTodo>,
    pub counts: Option<Counts>,
    pub filter: Option<Filter>,
    pub editing: Option<EditSession>,
    pub locations: Vec<String>,
    pub config: Option<TodozConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_todos(mut self, todos: Vec<Todo>) -> Self {
        self.affected_todos = todos;
        self
    }

    pub fn with_listed_todos(mut self, todos: Vec<DisplayTodo>) -> Self {
        self.listed_todos = todos;
        self
    }

    pub fn with_counts(mut self, counts: Counts) -> Self {
        self.counts = Some(counts);
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_locations(mut self, locations: Vec<String>) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_config(mut self, config: TodozConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_level(&self, level: MessageLevel) -> bool {
        self.messages.iter().any(|m| m.level == level)
    }
}

/// A blocking yes/no question put to the user before a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}
