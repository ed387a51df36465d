use std::sync::Arc;
use std::time::Duration;

use super::LockError;

/// A single lock instance.
///
/// In-memory locks use `Mutex` + `Condvar`; a multi-process deployment would
/// back this with row locks or advisory locks in the shared store.
pub trait Lock: Send + Sync {
    /// Acquire the lock, waiting at most `timeout`.
    /// Returns `Ok(false)` if the lock was still held when the wait expired.
    fn lock_within(&self, timeout: Duration) -> Result<bool, LockError>;

    /// Try to acquire the lock without blocking.
    fn try_lock(&self) -> Result<bool, LockError>;

    /// Release the lock.
    fn unlock(&self) -> Result<(), LockError>;
}

/// Holds a lock for one key and releases it on drop.
pub struct KeyGuard<L: Lock> {
    lock: Arc<L>,
    key: String,
}

impl<L: Lock> KeyGuard<L> {
    /// Acquire `lock` for `key`, failing with [`LockError::Timeout`] once
    /// `timeout` has elapsed.
    pub fn acquire(lock: Arc<L>, key: &str, timeout: Duration) -> Result<Self, LockError> {
        if !lock.lock_within(timeout)? {
            return Err(LockError::Timeout {
                key: key.to_string(),
                waited: timeout,
            });
        }
        Ok(Self {
            lock,
            key: key.to_string(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<L: Lock> Drop for KeyGuard<L> {
    fn drop(&mut self) {
        if let Err(err) = self.lock.unlock() {
            tracing::error!(key = %self.key, error = %err, "failed to release key lock");
        }
    }
}
