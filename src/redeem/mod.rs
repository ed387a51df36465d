//! Redemption - consume a code, draw a prize, record the outcome.
//!
//! [`RedemptionCoordinator`] is the boundary of the core: `redeem(code,
//! redeemer)` and `list_available_prizes_for_display()`. Input errors are
//! rejected before any I/O, domain outcomes come back as distinct
//! [`RedeemStatus`] values, stock races are retried up to a bound, and a
//! reserved unit is given back whenever the ledger commit does not happen.

mod coordinator;
mod error;
mod outcome;

pub use coordinator::{RedemptionCoordinator, DEFAULT_MAX_DRAW_ATTEMPTS};
pub use outcome::{DisplayPool, DisplaySegment, RedeemOutcome, RedeemStatus, FALLBACK_SEGMENT};
