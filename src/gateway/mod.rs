//! Gateways - the only paths through which prize stock and code status change.
//!
//! Each mutating call is one atomic step relative to other calls on the same
//! key and reports a single definitive outcome; retries and compensation are
//! the coordinator's business, never the gateway's.

mod error;
pub mod locked;

use crate::record::{CodeRecord, PrizeRecord};

pub use error::GatewayError;
pub use locked::{LockedInventory, LockedLedger, Retention};

/// Outcome of [`InventoryGateway::decrement_stock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDecrement {
    Decremented { remaining: u32 },
    NotFound,
    AlreadyZero,
}

/// Outcome of [`InventoryGateway::restore_stock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockRestore {
    Restored { remaining: u32 },
    NotFound,
}

/// Outcome of [`CodeLedgerGateway::try_redeem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerCommit {
    Committed,
    AlreadyRedeemed,
    NotFound,
}

/// Read/write access to the prize pool.
pub trait InventoryGateway: Send + Sync {
    /// Every configured prize, zero-stock ones included, in display order.
    fn list_all(&self) -> Result<Vec<PrizeRecord>, GatewayError>;

    /// Take one unit of `name` iff its stock is above zero. Two racing calls
    /// against a stock of 1 yield exactly one `Decremented`.
    ///
    /// A [`GatewayError::Timeout`] from this call means the unit was not
    /// taken. An implementation whose timeout can fire after the write must
    /// reconcile before returning, reporting `Decremented` if it landed.
    fn decrement_stock(&self, name: &str) -> Result<StockDecrement, GatewayError>;

    /// Give back a unit taken by `decrement_stock` for a redemption that did
    /// not commit.
    fn restore_stock(&self, name: &str) -> Result<StockRestore, GatewayError>;
}

/// Read/write access to code status and redemption metadata.
pub trait CodeLedgerGateway: Send + Sync {
    /// Case-insensitive exact-match lookup.
    fn find_by_code(&self, code: &str) -> Result<Option<CodeRecord>, GatewayError>;

    /// Mark `code` redeemed by `redeemer` with `prize`. Of any number of
    /// racing calls for one code, at most one observes `Committed`.
    fn try_redeem(
        &self,
        code: &str,
        redeemer: &str,
        prize: &str,
    ) -> Result<LedgerCommit, GatewayError>;
}

impl<G: InventoryGateway + ?Sized> InventoryGateway for std::sync::Arc<G> {
    fn list_all(&self) -> Result<Vec<PrizeRecord>, GatewayError> {
        (**self).list_all()
    }

    fn decrement_stock(&self, name: &str) -> Result<StockDecrement, GatewayError> {
        (**self).decrement_stock(name)
    }

    fn restore_stock(&self, name: &str) -> Result<StockRestore, GatewayError> {
        (**self).restore_stock(name)
    }
}

impl<G: CodeLedgerGateway + ?Sized> CodeLedgerGateway for std::sync::Arc<G> {
    fn find_by_code(&self, code: &str) -> Result<Option<CodeRecord>, GatewayError> {
        (**self).find_by_code(code)
    }

    fn try_redeem(
        &self,
        code: &str,
        redeemer: &str,
        prize: &str,
    ) -> Result<LedgerCommit, GatewayError> {
        (**self).try_redeem(code, redeemer, prize)
    }
}
