//! Directory-backed key-value store.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError};

/// Store that keeps each slot in `<root>/<key>.json`.
///
/// Writes go to a sibling temp file that is then renamed over the slot, so a
/// crash mid-write never leaves a half-written document behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "Opened file store");
        Ok(Self { root })
    }

    /// Directory holding the slot files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        let tmp = path.with_extension("json.tmp");

        let mut file = fs::File::create(&tmp)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("data")).unwrap();

        store.set("cart_lines", "[]").unwrap();
        assert!(dir.path().join("data/cart_lines.json").exists());
        assert_eq!(store.get("cart_lines").unwrap().as_deref(), Some("[]"));

        // A second handle on the same directory sees the write.
        let reopened = FileStore::open(dir.path().join("data")).unwrap();
        assert_eq!(reopened.get("cart_lines").unwrap().as_deref(), Some("[]"));

        store.remove("cart_lines").unwrap();
        assert_eq!(store.get("cart_lines").unwrap(), None);
    }

    #[test]
    fn test_remove_absent_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.remove("current_session").is_ok());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert!(matches!(
            store.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StorageError::InvalidKey(_))));
    }
}
