//! Persistent key-value storage for storefront state.
//!
//! # Layout
//!
//! Every collection lives in its own slot, holding one JSON document:
//!
//! - `users_registry` - Registered accounts, including their passwords
//! - `current_session` - The signed-in user (no password), absent when signed out
//! - `products_catalog` - All listings, in insertion order
//! - `cart_lines` - Shopping cart lines
//! - `purchase_history` - Completed purchases
//!
//! Slots are read once at start-up and rewritten after every mutation of the
//! collection they hold.
//!
//! # Backends
//!
//! - [`MemoryStore`] - Process-local, for tests and throwaway sessions
//! - [`FileStore`] - One `<key>.json` file per slot inside a data directory

mod file;
mod memory;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage slot names.
pub mod keys {
    /// Key for the registry of all accounts (with credentials).
    pub const USERS_REGISTRY: &str = "users_registry";

    /// Key for the signed-in user (without credentials).
    pub const CURRENT_SESSION: &str = "current_session";

    /// Key for the product catalog.
    pub const PRODUCTS_CATALOG: &str = "products_catalog";

    /// Key for the shopping cart lines.
    pub const CART_LINES: &str = "cart_lines";

    /// Key for the purchase history.
    pub const PURCHASE_HISTORY: &str = "purchase_history";

    /// Every slot the storefront writes.
    pub const ALL: [&str; 5] = [
        USERS_REGISTRY,
        CURRENT_SESSION,
        PRODUCTS_CATALOG,
        CART_LINES,
        PURCHASE_HISTORY,
    ];
}

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error from a file-backed store.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A slot holds data that does not decode to the expected shape.
    #[error("malformed persisted state in {key}: {reason}")]
    MalformedPersistedState {
        /// Slot that failed to decode.
        key: String,
        /// Decoder message.
        reason: String,
    },

    /// The key cannot be mapped onto the backend.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// The backend cannot serve requests (e.g. a poisoned lock).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous string key-value store.
///
/// Implementations must be durable for the lifetime they advertise and must
/// treat `set` as an all-or-nothing replacement of the slot.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot. `Ok(None)` means the slot is absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace a slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a slot. Removing an absent slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Typed JSON access to a shared [`KeyValueStore`].
///
/// This struct is cheaply cloneable via `Arc`; the session and catalog
/// managers each hold a clone of the same handle.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    /// Wrap a backend.
    #[must_use]
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Storage over a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Read and decode a slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::MalformedPersistedState` if the slot does not
    /// decode as `T`, or the backend's error if it cannot be read.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::MalformedPersistedState {
                key: key.to_owned(),
                reason: e.to_string(),
            })
    }

    /// Read a slot for start-up rehydration.
    ///
    /// Absent, unreadable, or malformed slots all yield `T::default()`; the
    /// latter two are logged at `warn` so corruption is visible without
    /// halting initialization.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.load(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding unreadable persisted state");
                T::default()
            }
        }
    }

    /// Encode and write a slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the backend write fails.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, &raw)?;
        tracing::trace!(key, bytes = raw.len(), "Persisted slot");
        Ok(())
    }

    /// Delete a slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend write fails.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.backend.remove(key)
    }

    /// Delete every storefront slot.
    ///
    /// # Errors
    ///
    /// Returns the first backend error; later slots are left untouched.
    pub fn clear_all(&self) -> Result<(), StorageError> {
        for key in keys::ALL {
            self.backend.remove(key)?;
        }
        Ok(())
    }
}
