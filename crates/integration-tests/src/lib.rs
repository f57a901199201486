//! Integration tests for `EcoFinds`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ecofinds-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_flow` - Account, browse, cart, and checkout scenarios
//! - `persistence` - On-disk layout and rehydration after restart
//!
//! Every test runs against a [`FileStore`] in its own temporary directory.

use std::path::Path;
use std::sync::Arc;

use ecofinds_storefront::clock::FixedClock;
use ecofinds_storefront::state::AppState;
use ecofinds_storefront::storage::{FileStore, Storage};
use tempfile::TempDir;

/// A data directory that lives as long as the test.
pub struct TestContext {
    dir: TempDir,
    clock: Arc<FixedClock>,
}

impl TestContext {
    /// Create an empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            clock: Arc::new(FixedClock::default()),
        }
    }

    /// Directory holding the `<key>.json` slots.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Shared test clock.
    #[must_use]
    pub fn clock(&self) -> &FixedClock {
        &self.clock
    }

    /// Start a "process": open the data directory and rehydrate state.
    ///
    /// Calling this again simulates a restart.
    ///
    /// # Panics
    ///
    /// Panics if the file store cannot be opened.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn start(&self) -> AppState {
        let store = FileStore::open(self.dir.path()).unwrap();
        AppState::with_clock(Storage::new(store), self.clock.clone())
    }

    /// Raw contents of a slot file, if present.
    #[must_use]
    pub fn read_slot(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.dir.path().join(format!("{key}.json"))).ok()
    }

    /// Overwrite a slot file with arbitrary bytes.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[allow(clippy::unwrap_used)]
    pub fn write_slot(&self, key: &str, contents: &str) {
        std::fs::write(self.dir.path().join(format!("{key}.json")), contents).unwrap();
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
