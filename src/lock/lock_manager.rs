use std::sync::Arc;
use std::time::Duration;

use super::{KeyGuard, Lock, LockError};

/// Hands out one lock per key.
///
/// The locked gateways ask for `prize:<name>` and `code:<CODE>` keys, so two
/// redemptions only contend when they touch the same prize or the same code.
pub trait LockManager: Send + Sync {
    /// The concrete lock type returned by this manager.
    type Lock: Lock;

    /// Get (or create) the lock for `key`.
    ///
    /// Repeated calls with the same key must return the same logical lock.
    fn get_lock(&self, key: &str) -> Result<Arc<Self::Lock>, LockError>;

    /// Acquire the lock for `key` and return a guard that releases it on drop.
    fn acquire(&self, key: &str, timeout: Duration) -> Result<KeyGuard<Self::Lock>, LockError> {
        let lock = self.get_lock(key)?;
        KeyGuard::acquire(lock, key, timeout)
    }
}
