//! InMemoryTable - `Vec`-backed table for tests and single-process runs.

use std::sync::{Arc, RwLock};

use super::{ensure_unique, upsert, StoreError, Table};
use crate::record::Row;

/// In-memory table. Clone-friendly via `Arc`; clones share rows.
#[derive(Clone)]
pub struct InMemoryTable<R> {
    rows: Arc<RwLock<Vec<R>>>,
}

impl<R: Row> Default for InMemoryTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Row> InMemoryTable<R> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a table seeded with `rows`, keeping their order.
    pub fn from_rows(rows: Vec<R>) -> Result<Self, StoreError> {
        ensure_unique(&rows)?;
        Ok(Self {
            rows: Arc::new(RwLock::new(rows)),
        })
    }
}

impl<R: Row> Table<R> for InMemoryTable<R> {
    fn rows(&self) -> Result<Vec<R>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Poisoned("rows"))?;
        Ok(rows.clone())
    }

    fn get(&self, key: &str) -> Result<Option<R>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned("get"))?;
        Ok(rows.iter().find(|row| row.key() == key).cloned())
    }

    fn put(&self, row: &R) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned("put"))?;
        upsert(&mut rows, row);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Poisoned("remove"))?;
        let before = rows.len();
        rows.retain(|row| row.key() != key);
        Ok(rows.len() != before)
    }
}
