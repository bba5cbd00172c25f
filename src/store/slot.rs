//! Single-slot key-value storage.
//!
//! Stands in for the browser's localStorage: string keys, string values,
//! each read and write atomic on its own, last write wins.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("slot storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid slot key {0:?}: use letters, digits, '-' or '_'")]
    InvalidKey(String),
}

/// Key-value capability backing the session token and local posts.
pub trait SlotStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SlotError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SlotError>;
    fn remove(&self, key: &str) -> Result<(), SlotError>;
}

fn check_key(key: &str) -> Result<(), SlotError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(SlotError::InvalidKey(key.to_string()))
    }
}

/// In-process slots.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: DashMap<String, String>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemorySlotStore {
    fn get(&self, key: &str) -> Result<Option<String>, SlotError> {
        check_key(key)?;
        Ok(self.slots.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SlotError> {
        check_key(key)?;
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SlotError> {
        check_key(key)?;
        self.slots.remove(key);
        Ok(())
    }
}

/// One file per slot under a directory.
///
/// Each write goes to its own temporary sibling and is renamed into place, so
/// a reader sees either the old or the new value and concurrent writers of
/// one key never share a temp file.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    dir: PathBuf,
}

impl FileSlotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, SlotError> {
        check_key(key)?;
        Ok(self.dir.join(key))
    }
}

impl SlotStore for FileSlotStore {
    fn get(&self, key: &str) -> Result<Option<String>, SlotError> {
        match fs::read_to_string(self.path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SlotError> {
        let path = self.path(key)?;
        fs::create_dir_all(&self.dir)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(&path).map_err(|e| e.error)?;
        tracing::trace!(key, bytes = value.len(), "Slot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SlotError> {
        match fs::remove_file(self.path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn SlotStore) {
        assert_eq!(store.get("token").unwrap(), None);
        store.set("token", "abc").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));
        store.set("token", "def").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("def"));
        store.remove("token").unwrap();
        store.remove("token").unwrap();
        assert_eq!(store.get("token").unwrap(), None);
        assert!(matches!(store.set("../escape", "x"), Err(SlotError::InvalidKey(_))));
    }

    #[test]
    fn memory_store() {
        exercise(&MemorySlotStore::new());
    }

    #[test]
    fn file_store() {
        let dir = tempfile::tempdir().unwrap();
        exercise(&FileSlotStore::new(dir.path().join("slots")));
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        FileSlotStore::new(dir.path()).set("community_posts", "[]").unwrap();
        let reopened = FileSlotStore::new(dir.path());
        assert_eq!(reopened.get("community_posts").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn concurrent_writers_of_one_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSlotStore::new(dir.path());

        std::thread::scope(|scope| {
            for writer in 0..4u8 {
                let store = &store;
                scope.spawn(move || {
                    let value = char::from(b'a' + writer).to_string().repeat(200 * 1024);
                    for _ in 0..50 {
                        store.set("community_posts", &value).unwrap();
                    }
                });
            }
        });

        let value = store.get("community_posts").unwrap().unwrap();
        assert_eq!(value.len(), 200 * 1024);
        let first = value.as_bytes()[0];
        assert!(value.bytes().all(|b| b == first));

        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
