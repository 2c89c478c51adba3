//! # Storage Layer
//!
//! Storage is split the same way a browser splits it: a dumb key-value slot
//! underneath, and something that knows what is *in* the slot on top.
//!
//! - [`KeyValueBackend`]: raw string I/O by key. It knows nothing about todos.
//! - [`TodoPersistence`]: the persistence adapter. Serializes the whole
//!   collection into one JSON blob under the fixed key [`TODOS_KEY`].
//!
//! ## Implementations
//!
//! - [`fs::FileBackend`]: production storage, one `<key>.json` file per key in
//!   the data directory, written atomically (tmp file + rename).
//! - [`memory::MemBackend`]: in-memory slots for tests, with write-failure
//!   simulation.
//! - `web::LocalStorageBackend` (wasm32 only): `window.localStorage`.
//!
//! ## Persisted Layout
//!
//! ```text
//! <data_dir>/
//! ├── todos.json          # JSON array of todos (the only live slot)
//! ├── todos.corrupt.json  # Last unreadable blob, kept aside on load failure
//! └── config.json         # Settings (see config.rs)
//! ```
//!
//! There is no schema version field. The adapter mirrors the store's last
//! saved snapshot and is never a source of live mutation.

use crate::error::{Result, TodozError};
use crate::model::Todo;

#[cfg(not(target_arch = "wasm32"))]
pub mod fs;
pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

/// The fixed key the collection lives under.
pub const TODOS_KEY: &str = "todos";

/// Where an unreadable collection is moved before the store starts over.
pub const QUARANTINE_KEY: &str = "todos.corrupt";

/// Raw, synchronous key-value slot I/O.
///
/// Implementations overwrite on `set` and return `Ok(None)` from `get` when the
/// key has never been written. A value that exists but is not text is
/// [`TodozError::Corrupt`]; other errors are real I/O failures.
pub trait KeyValueBackend {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Copies the stored value of `from` to `to` as-is, even when `get` could
    /// not decode it. Returns `false` if `from` was never written.
    fn copy_raw(&mut self, from: &str, to: &str) -> Result<bool>;

    /// Human-readable location of a key (a path for files, a pseudo-URL otherwise).
    fn location(&self, key: &str) -> String;
}

/// Persistence adapter: reads and writes the whole todo collection as one blob.
pub struct TodoPersistence<B: KeyValueBackend> {
    backend: B,
}

impl<B: KeyValueBackend> TodoPersistence<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Reads the collection. A missing key is an empty list; a present but
    /// malformed blob is [`TodozError::Corrupt`].
    pub fn load(&self) -> Result<Vec<Todo>> {
        let Some(raw) = self.backend.get(TODOS_KEY)? else {
            log::debug!("no stored todos under '{}'", TODOS_KEY);
            return Ok(Vec::new());
        };

        let todos: Vec<Todo> = serde_json::from_str(&raw).map_err(|e| TodozError::Corrupt {
            key: TODOS_KEY.to_string(),
            reason: e.to_string(),
        })?;
        log::debug!("loaded {} todos from '{}'", todos.len(), TODOS_KEY);
        Ok(todos)
    }

    /// Serializes the full collection and overwrites the slot.
    pub fn save(&mut self, todos: &[Todo]) -> Result<()> {
        let content = serde_json::to_string(todos).map_err(TodozError::Serialization)?;
        self.backend.set(TODOS_KEY, &content)?;
        log::debug!("saved {} todos to '{}'", todos.len(), TODOS_KEY);
        Ok(())
    }

    /// Copies the live slot, byte for byte, to [`QUARANTINE_KEY`].
    ///
    /// Returns the location it was copied to, or `None` if the slot was empty.
    pub fn quarantine(&mut self) -> Result<Option<String>> {
        if !self.backend.copy_raw(TODOS_KEY, QUARANTINE_KEY)? {
            return Ok(None);
        }
        Ok(Some(self.backend.location(QUARANTINE_KEY)))
    }

    pub fn location(&self) -> String {
        self.backend.location(TODOS_KEY)
    }
}
