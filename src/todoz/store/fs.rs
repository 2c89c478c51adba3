use super::KeyValueBackend;
use crate::error::{Result, TodozError};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// File-backed key-value slots: each key is `<root>/<key>.json`.
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(TodozError::Io)?;
        }
        Ok(())
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path).map_err(TodozError::Io)?;
        let content = String::from_utf8(bytes).map_err(|e| TodozError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(content))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;
        let target = self.slot_path(key);

        // Atomic write: a crash mid-write leaves the old value intact
        let tmp = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp, value).map_err(TodozError::Io)?;
        fs::rename(&tmp, &target).map_err(TodozError::Io)?;
        Ok(())
    }

    fn copy_raw(&mut self, from: &str, to: &str) -> Result<bool> {
        let source = self.slot_path(from);
        if !source.exists() {
            return Ok(false);
        }
        self.ensure_dir()?;
        let tmp = self.root.join(format!(".{}-{}.tmp", to, Uuid::new_v4()));
        fs::copy(&source, &tmp).map_err(TodozError::Io)?;
        fs::rename(&tmp, self.slot_path(to)).map_err(TodozError::Io)?;
        Ok(true)
    }

    fn location(&self, key: &str) -> String {
        self.slot_path(key).display().to_string()
    }
}
