//! Single-use code redemption against a weighted, stock-bounded prize pool.
//!
//! A redemption validates a code, draws a prize among those still in stock
//! with probability proportional to weight, takes one unit of it, and marks
//! the code redeemed. Under any number of concurrent attempts each code is
//! honored at most once and no prize is oversold.
//!
//! ## Quick Start
//!
//! ```ignore
//! use prize_wheel::{
//!     CodeRecord, InMemoryTable, LockedInventory, LockedLedger, PrizeRecord, RedemptionCoordinator,
//! };
//!
//! let prizes = InMemoryTable::from_rows(vec![
//!     PrizeRecord::new("Sticker", 5, 100),
//!     PrizeRecord::new("Hoodie", 1, 3),
//! ])?;
//! let codes = InMemoryTable::from_rows(vec![CodeRecord::unused("X1")])?;
//!
//! let coordinator = RedemptionCoordinator::new(LockedInventory::new(prizes), LockedLedger::new(codes));
//! let outcome = coordinator.redeem("x1", "Ann");
//! assert!(outcome.is_ok());
//! ```

pub mod config;
pub mod draw;
pub mod gateway;
pub mod lock;
pub mod record;
pub mod redeem;
pub mod table;

#[cfg(feature = "http")]
pub mod http;

pub use config::{ConfigError, RedemptionConfig, WheelConfig};
pub use draw::{draw, DrawError, DrawRequest, DrawResult, RandomSource, RngSource, ScriptedSource};
pub use gateway::{
    CodeLedgerGateway, GatewayError, InventoryGateway, LedgerCommit, LockedInventory, LockedLedger,
    Retention, StockDecrement, StockRestore,
};
pub use lock::{InMemoryLock, InMemoryLockManager, KeyGuard, Lock, LockError, LockManager};
pub use record::{normalize_code, CodeRecord, CodeStatus, PrizeRecord, Row};
pub use redeem::{
    DisplayPool, DisplaySegment, RedeemOutcome, RedeemStatus, RedemptionCoordinator,
    FALLBACK_SEGMENT,
};
pub use table::{InMemoryTable, JsonFileTable, StoreError, Table};
