//! Persisted entities: prize rows and code rows.
//!
//! Both are plain serde structs so any [`Table`](crate::table::Table) can hold
//! them. The only mutators enforce the entity invariants: stock never goes
//! below zero, and a code is redeemed at most once.

mod code;
mod prize;

use serde::{de::DeserializeOwned, Serialize};

pub use code::{normalize_code, AlreadyRedeemed, CodeRecord, CodeStatus};
pub use prize::PrizeRecord;

/// A row that can be stored in a [`Table`](crate::table::Table).
pub trait Row: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Table name, e.g. `"prizes"`. Used in error messages and file names.
    const TABLE: &'static str;

    /// The row's unique key within its table.
    fn key(&self) -> &str;
}
