use super::KeyValueBackend;
use crate::error::{Result, TodozError};
use std::cell::Cell;
use std::collections::HashMap;

/// In-memory key-value slots for testing and development.
/// Does NOT persist data.
///
/// The error switches use a `Cell` so tests can flip them through a shared
/// reference after the backend has been handed to a store.
#[derive(Default)]
pub struct MemBackend {
    slots: HashMap<String, String>,
    simulate_read_error: Cell<bool>,
    simulate_write_error: Cell<bool>,
    writes: Cell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `get` fail like an unreadable device.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Raw value stored under `key`, bypassing deserialization.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl KeyValueBackend for MemBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.simulate_read_error.get() {
            return Err(TodozError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "Simulated read error",
            )));
        }
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(TodozError::Store("Simulated write error".to_string()));
        }
        self.slots.insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn copy_raw(&mut self, from: &str, to: &str) -> Result<bool> {
        let Some(raw) = self.slots.get(from).cloned() else {
            return Ok(false);
        };
        self.set(to, &raw)?;
        Ok(true)
    }

    fn location(&self, key: &str) -> String {
        format!("memory://{}", key)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Todo, TodoId};
    use crate::store::TODOS_KEY;
    use chrono::{TimeZone, Utc};

    pub struct BackendFixture {
        pub backend: MemBackend,
    }

    impl Default for BackendFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl BackendFixture {
        pub fn new() -> Self {
            Self {
                backend: MemBackend::new(),
            }
        }

        /// Seeds a slot with an arbitrary string, valid JSON or not.
        pub fn with_raw(mut self, key: &str, value: &str) -> Self {
            self.backend
                .slots
                .insert(key.to_string(), value.to_string());
            self
        }

        pub fn with_todos(self, todos: &[Todo]) -> Self {
            let json = serde_json::to_string(todos).unwrap();
            self.with_raw(TODOS_KEY, &json)
        }

        /// Seeds `count` todos with ids 1..=count; every `completed_every`-th one is done.
        pub fn with_numbered_todos(self, count: usize, completed_every: usize) -> Self {
            let todos: Vec<Todo> = (1..=count)
                .map(|i| {
                    let at = Utc.timestamp_millis_opt(i as i64).single().unwrap();
                    let mut todo = Todo::new(TodoId(i as i64), format!("Todo {}", i), at);
                    todo.completed = completed_every > 0 && i % completed_every == 0;
                    todo
                })
                .collect();
            self.with_todos(&todos)
        }
    }
}
