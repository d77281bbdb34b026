//! JSON-file key-value store.
//!
//! The file holds one flat JSON object. Writes go to a sibling temp file
//! that is renamed over the original, so a crash never leaves a half
//! written store. Keys this client does not know about are preserved.
//! A file that cannot be parsed is moved aside to `<name>.corrupt` on the
//! next write and the store starts over empty.

use nutri_application::{KeyValueStore, StoreError};
use serde_json::{Map, Value};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Key-value store persisted as a JSON object file.
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_DATA_HOME/nutri-chat/store.json` (or the platform equivalent)
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("nutri-chat").join("store.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Map<String, Value>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StoreError::Corrupt(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(StoreError::Corrupt(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let tmp_path = self.path.with_extension("json.tmp");
        match fs::remove_file(&tmp_path) {
            Err(e) if e.kind() != ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        // The store holds an API key: owner read/write only, from creation.
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Entries to write over: the current ones, or none if the file is
    /// unreadable, in which case it is kept as `<name>.corrupt`.
    fn entries_for_write(&self) -> Result<Map<String, Value>, StoreError> {
        match self.read_entries() {
            Err(StoreError::Corrupt(reason)) => {
                let backup = self.corrupt_backup_path();
                warn!(
                    "Replacing unreadable store ({}); old contents moved to {}",
                    reason,
                    backup.display()
                );
                fs::rename(&self.path, &backup)?;
                Ok(Map::new())
            }
            other => other,
        }
    }

    fn corrupt_backup_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".corrupt");
        self.path.with_file_name(name)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.read_entries()?;
        match entries.get(key) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(StoreError::Corrupt(format!(
                "value for '{}' is not a string",
                key
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries_for_write()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.write_entries(&entries)?;
        debug!("Wrote '{}' to {}", key, self.path.display());
        Ok(())
    }
}
