//! Persistence collaborators for the snippet repository.
//!
//! Storage only ever sees an opaque JSON value; turning that value into
//! snippets is the repository's job.

use crate::config::DB_FILENAME;
use crate::error::{ObsnippetsError, Result};
use chrono::Local;
use serde_json::Value;
use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub trait SnippetStorage {
    /// Load the stored value, `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Value>>;

    /// Replace whatever was stored before with `value`.
    fn save(&mut self, value: &Value) -> Result<()>;

    /// Keep a copy of the current contents aside, returning where it went.
    /// Storages without anywhere to put it return `None`.
    fn backup(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Pretty-printed JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // `<name>.<tag>-<timestamp>` next to the store.
    fn aside_path(&self, tag: &str) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| DB_FILENAME.to_string());
        let stamp = Local::now().format("%Y%m%d%H%M%S");
        self.path
            .with_file_name(format!("{}.{}-{}", file_name, tag, stamp))
    }

    // Keep the unreadable file around instead of overwriting it on the next save.
    fn quarantine(&self) -> Result<PathBuf> {
        let target = self.aside_path("corrupt");
        fs::rename(&self.path, &target)?;
        Ok(target)
    }
}

impl SnippetStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<Value>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no snippet database yet");
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        // Handle empty database file
        if content.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                let moved_to = self.quarantine()?;
                warn!(
                    error = %err,
                    moved_to = %moved_to.display(),
                    "snippet database is not valid JSON, starting empty"
                );
                Ok(None)
            }
        }
    }

    fn save(&mut self, value: &Value) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let serialized = serde_json::to_string_pretty(value)?;
        let mut file = NamedTempFile::new_in(&dir)?;
        file.write_all(serialized.as_bytes())?;
        file.flush()?;
        file.persist(&self.path)
            .map_err(|e| ObsnippetsError::Storage(format!("{}: {}", self.path.display(), e)))?;

        debug!(path = %self.path.display(), bytes = serialized.len(), "saved snippets");
        Ok(())
    }

    fn backup(&self) -> Result<Option<String>> {
        if !self.path.is_file() {
            return Ok(None);
        }
        let target = self.aside_path("rejected");
        fs::copy(&self.path, &target)?;
        Ok(Some(target.display().to_string()))
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    value: Option<Value>,
    backups: Vec<Value>,
    fail_saves: bool,
    saves: usize,
}

/// In-process storage. Clones share the same slot, so a handle kept outside
/// the repository can inspect what was saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: Value) -> Self {
        let storage = Self::default();
        storage.state.borrow_mut().value = Some(value);
        storage
    }

    /// Make every following `save` fail until switched off again.
    pub fn set_fail_saves(&self, fail: bool) {
        self.state.borrow_mut().fail_saves = fail;
    }

    pub fn stored(&self) -> Option<Value> {
        self.state.borrow().value.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.state.borrow().saves
    }

    /// Values copied aside by `backup`, oldest first.
    pub fn backups(&self) -> Vec<Value> {
        self.state.borrow().backups.clone()
    }
}

impl SnippetStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Value>> {
        Ok(self.state.borrow().value.clone())
    }

    fn save(&mut self, value: &Value) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_saves {
            return Err(ObsnippetsError::Storage("memory storage is read-only".into()));
        }
        state.value = Some(value.clone());
        state.saves += 1;
        Ok(())
    }

    fn backup(&self) -> Result<Option<String>> {
        let mut state = self.state.borrow_mut();
        match state.value.clone() {
            Some(value) => {
                state.backups.push(value);
                Ok(Some(format!("memory backup #{}", state.backups.len())))
            }
            None => Ok(None),
        }
    }
}
