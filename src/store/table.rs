//! Category store implementation
//!
//! BTreeMap-based store with a single Mutex for concurrency.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use super::{Category, SEED_CATEGORIES};

struct Inner {
    records: BTreeMap<i64, Category>,

    /// Next id to hand out; only ever grows
    next_id: i64,
}

/// Shared, mutex-guarded map of id -> category
pub struct CategoryStore {
    inner: Mutex<Inner>,
}

impl CategoryStore {
    /// Create an empty store whose first id will be 1
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                records: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Create a store holding the three seed categories (ids 1..=3)
    pub fn seeded() -> Self {
        let store = Self::new();
        for name in SEED_CATEGORIES {
            store.insert(name);
        }
        store
    }

    /// All records, ascending by id
    pub fn list(&self) -> Vec<Category> {
        self.inner.lock().records.values().cloned().collect()
    }

    /// Look up a record by id
    pub fn get(&self, id: i64) -> Option<Category> {
        self.inner.lock().records.get(&id).cloned()
    }

    /// Allocate an id and insert a new record
    pub fn insert(&self, name: impl Into<String>) -> Category {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;

        let category = Category::new(id, name);
        inner.records.insert(id, category.clone());
        category
    }

    /// Replace the name of an existing record.
    ///
    /// Returns false if the id is absent.
    pub fn rename(&self, id: i64, name: impl Into<String>) -> bool {
        match self.inner.lock().records.get_mut(&id) {
            Some(category) => {
                category.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Remove a record. Returns false if the id is absent.
    pub fn remove(&self, id: i64) -> bool {
        self.inner.lock().records.remove(&id).is_some()
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CategoryStore {
    fn default() -> Self {
        Self::new()
    }
}
