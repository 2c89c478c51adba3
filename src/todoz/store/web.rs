use super::KeyValueBackend;
use crate::error::{Result, TodozError};
use web_sys::Storage;

/// `window.localStorage` as a key-value slot.
pub struct LocalStorageBackend {
    storage: Storage,
}

impl LocalStorageBackend {
    /// Binds to the current window's storage. Fails when storage is disabled
    /// (private browsing, sandboxed iframes).
    pub fn new() -> Result<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| TodozError::Store("localStorage is not available".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueBackend for LocalStorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| TodozError::Store(format!("localStorage read failed: {:?}", e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| TodozError::Store(format!("localStorage write failed: {:?}", e)))
    }

    fn copy_raw(&mut self, from: &str, to: &str) -> Result<bool> {
        match self.get(from)? {
            Some(raw) => self.set(to, &raw).map(|_| true),
            None => Ok(false),
        }
    }

    fn location(&self, key: &str) -> String {
        format!("localStorage://{}", key)
    }
}
