//! Gateways over a plain [`Table`](crate::table::Table), made atomic per key.
//!
//! The table only offers separate reads and writes, so each mutation takes
//! the key's lock from a [`LockManager`](crate::lock::LockManager), re-reads
//! the row, applies the change, writes it back, then releases the lock.
//! Lock acquisition is bounded; on expiry nothing has been read or written
//! yet, so a [`GatewayError::Timeout`](super::GatewayError::Timeout) from
//! these gateways always means "not applied".
//!
//! This only serializes callers inside one process. Processes sharing one
//! store need the store's own atomic primitive.

mod inventory;
mod ledger;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use inventory::LockedInventory;
pub use ledger::LockedLedger;

/// Default bound on waiting for a key lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// What happens to a code row once it has been redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Retention {
    /// Keep the row as REDEEMED with redeemer and prize (audit trail).
    #[default]
    AuditTrail,
    /// Delete the row; a consumed code looks like one that never existed.
    Consume,
}

fn prize_key(name: &str) -> String {
    format!("prize:{}", name)
}

fn code_key(normalized: &str) -> String {
    format!("code:{}", normalized)
}
