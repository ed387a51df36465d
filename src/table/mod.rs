//! Tables - row storage with separate read and write calls.
//!
//! A `Table` behaves like a worksheet: rows keep their insertion order, and
//! there is no compare-and-swap. Callers that need an atomic
//! read-modify-write (the locked gateways) serialize it themselves.
//!
//! ## Example
//!
//! ```ignore
//! use prize_wheel::{InMemoryTable, PrizeRecord, Table};
//!
//! let prizes = InMemoryTable::from_rows(vec![PrizeRecord::new("Mug", 1, 3)])?;
//! let mut mug = prizes.get("Mug")?.unwrap();
//! mug.take_one();
//! prizes.put(&mug)?;
//! ```

mod in_memory;
mod json_file;

use std::path::PathBuf;

use thiserror::Error;

use crate::record::Row;

pub use in_memory::InMemoryTable;
pub use json_file::JsonFileTable;

/// Error type for table operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table lock poisoned during {0}")]
    Poisoned(&'static str),
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("row serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("duplicate key {key} in table {table}")]
    Duplicate { table: &'static str, key: String },
}

/// Ordered row storage.
pub trait Table<R: Row>: Send + Sync {
    /// Every row, in display order.
    fn rows(&self) -> Result<Vec<R>, StoreError>;

    /// The row with exactly this key, if any.
    fn get(&self, key: &str) -> Result<Option<R>, StoreError>;

    /// Overwrite the row with the same key in place, or append a new row.
    fn put(&self, row: &R) -> Result<(), StoreError>;

    /// Delete a row by key. Returns true if it existed.
    fn remove(&self, key: &str) -> Result<bool, StoreError>;
}

/// Reject row sets with repeated keys.
pub(crate) fn ensure_unique<R: Row>(rows: &[R]) -> Result<(), StoreError> {
    let mut seen = std::collections::HashSet::with_capacity(rows.len());
    for row in rows {
        if !seen.insert(row.key()) {
            return Err(StoreError::Duplicate {
                table: R::TABLE,
                key: row.key().to_string(),
            });
        }
    }
    Ok(())
}

/// Upsert rule of the in-memory table.
pub(crate) fn upsert<R: Row>(rows: &mut Vec<R>, row: &R) {
    match rows.iter_mut().find(|existing| existing.key() == row.key()) {
        Some(existing) => *existing = row.clone(),
        None => rows.push(row.clone()),
    }
}
