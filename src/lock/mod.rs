//! Per-key mutual exclusion for stores without an atomic update primitive.
//!
//! A spreadsheet or flat file only offers separate read and write calls, so
//! a naive "read stock, write stock - 1" races. The gateway implementations
//! take a lock per key from a [`LockManager`] and hold a [`KeyGuard`] for the
//! whole read-modify-write.

mod error;
mod in_memory;
mod lock;
mod lock_manager;

pub use error::LockError;
pub use in_memory::{InMemoryLock, InMemoryLockManager};
pub use lock::{KeyGuard, Lock};
pub use lock_manager::LockManager;
