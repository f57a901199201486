//! Shared fixtures for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use ecofinds_core::{Category, Price, ProductId, UserId};

use crate::models::Product;
use crate::storage::{KeyValueStore, MemoryStore, Storage, StorageError};

/// Memory store whose writes to selected keys can be made to fail.
#[derive(Debug, Default)]
pub struct FaultyStore {
    inner: MemoryStore,
    failing: Mutex<HashSet<String>>,
}

impl FaultyStore {
    pub fn fail_writes_to(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_owned());
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    fn check(&self, key: &str) -> Result<(), StorageError> {
        if self.failing.lock().unwrap().contains(key) {
            return Err(StorageError::Unavailable(format!("injected failure for {key}")));
        }
        Ok(())
    }
}

impl KeyValueStore for FaultyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check(key)?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check(key)?;
        self.inner.remove(key)
    }
}

/// Storage plus a handle for injecting failures.
pub fn faulty_storage() -> (Storage, Arc<FaultyStore>) {
    let store = Arc::new(FaultyStore::default());
    (Storage::new(Arc::clone(&store)), store)
}

pub fn product(id: &str, title: &str, category: &str, cents: u32, seller: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_owned(),
        description: format!("A second-hand {}", title.to_lowercase()),
        category: Category::parse(category).unwrap(),
        price: Price::from_cents(cents),
        image: None,
        seller_id: UserId::new(seller),
        seller_name: seller.to_owned(),
        created_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}
