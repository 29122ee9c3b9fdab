//! Store Module
//!
//! In-memory collection of category records.
//!
//! ## Responsibilities
//! - Own every record; callers only ever see clones
//! - Assign ids from a monotonic counter (deleted ids are never reused)
//! - Serialize all reads and writes behind a single lock
//!
//! ## Data Structure Choice
//! BTreeMap wrapped in a parking_lot Mutex:
//! - Listing returns records in ascending id order
//! - Critical sections are tiny, so one lock is enough

mod table;

pub use table::CategoryStore;

use serde::{Deserialize, Serialize};

/// A single category record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Identifier, unique for the lifetime of the store
    #[serde(rename = "cid")]
    pub id: i64,

    /// Display name
    pub name: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Names loaded by [`CategoryStore::seeded`]
pub const SEED_CATEGORIES: [&str; 3] = ["Beverages", "Condiments", "Confections"];
