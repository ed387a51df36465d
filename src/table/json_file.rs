//! JsonFileTable - a flat JSON file holding one table as an array of rows.
//!
//! Every read goes to the file, so edits made by an operator between
//! requests are picked up. A row that does not decode is skipped with a
//! warning and the rest of the table keeps serving; rewrites leave such rows
//! in the file untouched. Writes go through a temporary sibling and a
//! rename, so readers never observe a half-written array.

use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ensure_unique, StoreError, Table};
use crate::record::Row;

#[derive(Clone)]
pub struct JsonFileTable<R> {
    path: PathBuf,
    // Whole-file rewrites of different keys must not interleave.
    write_lock: Arc<Mutex<()>>,
    _rows: PhantomData<fn() -> R>,
}

impl<R: Row> JsonFileTable<R> {
    /// Open the table at `path`. A missing file is an empty table and is
    /// created on the first write. An existing file must be a JSON array
    /// whose decodable rows hold unique keys.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let table = Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
            _rows: PhantomData,
        };
        ensure_unique(&table.load()?)?;
        Ok(table)
    }

    /// Create (or replace) the file at `path` with `rows`.
    pub fn create(path: impl Into<PathBuf>, rows: &[R]) -> Result<Self, StoreError> {
        ensure_unique(rows)?;
        let table = Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
            _rows: PhantomData,
        };
        table.store(rows)?;
        Ok(table)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The raw array, malformed rows included.
    fn load_values(&self) -> Result<Vec<Value>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn load(&self) -> Result<Vec<R>, StoreError> {
        let rows = self
            .load_values()?
            .iter()
            .enumerate()
            .filter_map(|(position, value)| match R::deserialize(value) {
                Ok(row) => Some(row),
                Err(err) => {
                    tracing::warn!(
                        table = R::TABLE,
                        path = %self.path.display(),
                        position,
                        error = %err,
                        "skipping malformed row"
                    );
                    None
                }
            })
            .collect();
        Ok(rows)
    }

    fn store<T: Serialize>(&self, rows: &[T]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(rows)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, bytes)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
    }

    fn rewrite(&self, edit: impl FnOnce(&mut Vec<Value>)) -> Result<(), StoreError> {
        let _writing = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Poisoned("file write"))?;
        let mut values = self.load_values()?;
        edit(&mut values);
        self.store(&values)
    }
}

/// Whether `value` decodes to the row with `key`. Malformed rows never match.
fn holds_key<R: Row>(value: &Value, key: &str) -> bool {
    R::deserialize(value).is_ok_and(|row| row.key() == key)
}

impl<R: Row> Table<R> for JsonFileTable<R> {
    fn rows(&self) -> Result<Vec<R>, StoreError> {
        self.load()
    }

    fn get(&self, key: &str) -> Result<Option<R>, StoreError> {
        Ok(self.load()?.into_iter().find(|row| row.key() == key))
    }

    fn put(&self, row: &R) -> Result<(), StoreError> {
        let value = serde_json::to_value(row)?;
        self.rewrite(|values| {
            match values.iter_mut().find(|v| holds_key::<R>(v, row.key())) {
                Some(existing) => *existing = value,
                None => values.push(value),
            }
        })
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut removed = false;
        self.rewrite(|values| {
            let before = values.len();
            values.retain(|v| !holds_key::<R>(v, key));
            removed = values.len() != before;
        })?;
        Ok(removed)
    }
}
