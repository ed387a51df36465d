use std::time::Duration;

use super::{prize_key, DEFAULT_LOCK_TIMEOUT};
use crate::gateway::{GatewayError, InventoryGateway, StockDecrement, StockRestore};
use crate::lock::{InMemoryLockManager, LockManager};
use crate::record::PrizeRecord;
use crate::table::Table;

/// Prize inventory over a table, with one lock per prize name.
pub struct LockedInventory<T, L = InMemoryLockManager> {
    table: T,
    locks: L,
    timeout: Duration,
}

impl<T: Table<PrizeRecord>> LockedInventory<T> {
    pub fn new(table: T) -> Self {
        Self::with_locks(table, InMemoryLockManager::new())
    }
}

impl<T: Table<PrizeRecord>, L: LockManager> LockedInventory<T, L> {
    pub fn with_locks(table: T, locks: L) -> Self {
        Self {
            table,
            locks,
            timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Bound on waiting for a prize's lock.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Access the underlying table.
    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn locks(&self) -> &L {
        &self.locks
    }
}

impl<T: Table<PrizeRecord>, L: LockManager> InventoryGateway for LockedInventory<T, L> {
    fn list_all(&self) -> Result<Vec<PrizeRecord>, GatewayError> {
        Ok(self.table.rows()?)
    }

    fn decrement_stock(&self, name: &str) -> Result<StockDecrement, GatewayError> {
        let _guard = self.locks.acquire(&prize_key(name), self.timeout)?;

        let Some(mut prize) = self.table.get(name)? else {
            return Ok(StockDecrement::NotFound);
        };
        if !prize.take_one() {
            return Ok(StockDecrement::AlreadyZero);
        }
        self.table.put(&prize)?;
        tracing::debug!(prize = %name, remaining = prize.stock, "stock decremented");
        Ok(StockDecrement::Decremented {
            remaining: prize.stock,
        })
    }

    fn restore_stock(&self, name: &str) -> Result<StockRestore, GatewayError> {
        let _guard = self.locks.acquire(&prize_key(name), self.timeout)?;

        let Some(mut prize) = self.table.get(name)? else {
            return Ok(StockRestore::NotFound);
        };
        prize.put_back();
        self.table.put(&prize)?;
        tracing::debug!(prize = %name, remaining = prize.stock, "stock restored");
        Ok(StockRestore::Restored {
            remaining: prize.stock,
        })
    }
}
