use std::time::Duration;

use super::{code_key, Retention, DEFAULT_LOCK_TIMEOUT};
use crate::gateway::{CodeLedgerGateway, GatewayError, LedgerCommit};
use crate::lock::{InMemoryLockManager, LockManager};
use crate::record::{normalize_code, CodeRecord};
use crate::table::Table;

/// Code ledger over a table, with one lock per normalized code.
///
/// Rows may have been provisioned in any letter case; lookups scan for a
/// case-insensitive match the way a spreadsheet "find" would.
pub struct LockedLedger<T, L = InMemoryLockManager> {
    table: T,
    locks: L,
    timeout: Duration,
    retention: Retention,
}

impl<T: Table<CodeRecord>> LockedLedger<T> {
    pub fn new(table: T) -> Self {
        Self::with_locks(table, InMemoryLockManager::new())
    }
}

impl<T: Table<CodeRecord>, L: LockManager> LockedLedger<T, L> {
    pub fn with_locks(table: T, locks: L) -> Self {
        Self {
            table,
            locks,
            timeout: DEFAULT_LOCK_TIMEOUT,
            retention: Retention::default(),
        }
    }

    /// Bound on waiting for a code's lock.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    /// Access the underlying table.
    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn locks(&self) -> &L {
        &self.locks
    }

    pub fn retention(&self) -> Retention {
        self.retention
    }

    fn locate(&self, normalized: &str) -> Result<Option<CodeRecord>, GatewayError> {
        if let Some(row) = self.table.get(normalized)? {
            return Ok(Some(row));
        }
        Ok(self
            .table
            .rows()?
            .into_iter()
            .find(|row| row.matches(normalized)))
    }
}

impl<T: Table<CodeRecord>, L: LockManager> CodeLedgerGateway for LockedLedger<T, L> {
    fn find_by_code(&self, code: &str) -> Result<Option<CodeRecord>, GatewayError> {
        let normalized = normalize_code(code);
        if normalized.is_empty() {
            return Ok(None);
        }
        self.locate(&normalized)
    }

    fn try_redeem(
        &self,
        code: &str,
        redeemer: &str,
        prize: &str,
    ) -> Result<LedgerCommit, GatewayError> {
        let normalized = normalize_code(code);
        let _guard = self.locks.acquire(&code_key(&normalized), self.timeout)?;

        let Some(mut row) = self.locate(&normalized)? else {
            return Ok(LedgerCommit::NotFound);
        };
        if row.redeem(redeemer, prize).is_err() {
            return Ok(LedgerCommit::AlreadyRedeemed);
        }

        match self.retention {
            Retention::AuditTrail => self.table.put(&row)?,
            Retention::Consume => {
                self.table.remove(&row.code)?;
            }
        }
        tracing::debug!(code = %normalized, %redeemer, %prize, retention = ?self.retention, "code redeemed");
        Ok(LedgerCommit::Committed)
    }
}
