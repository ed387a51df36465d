//! The check → reserve → draw → commit sequence.
//!
//! Stock is reserved before the ledger commit: many users racing for the
//! last unit of a popular prize is the common conflict, two users sharing
//! one code is the rare one. A lost stock race is retried against a fresh
//! snapshot; a lost ledger race gives the reserved unit back.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;

use super::error::{RedeemError, Stage};
use super::outcome::{DisplayPool, RedeemOutcome};
use crate::config::RedemptionConfig;
use crate::draw::{draw, DrawRequest, DrawResult, RandomSource, RngSource};
use crate::gateway::{
    CodeLedgerGateway, GatewayError, InventoryGateway, LedgerCommit, StockDecrement, StockRestore,
};
use crate::record::normalize_code;

pub const DEFAULT_MAX_DRAW_ATTEMPTS: usize = 3;

/// Orchestrates one redemption per call; safe to share across threads.
///
/// Holds no state of its own besides the random source. All mutation goes
/// through the two gateways.
///
/// ## Example
///
/// ```ignore
/// use prize_wheel::{InMemoryTable, LockedInventory, LockedLedger, RedemptionCoordinator};
///
/// let coordinator = RedemptionCoordinator::new(
///     LockedInventory::new(InMemoryTable::from_rows(prizes)?),
///     LockedLedger::new(InMemoryTable::from_rows(codes)?),
/// );
/// let outcome = coordinator.redeem("x1", "Ann");
/// ```
pub struct RedemptionCoordinator<I, C, S = RngSource<StdRng>> {
    inventory: I,
    ledger: C,
    random: Mutex<S>,
    max_draw_attempts: usize,
}

impl<I: InventoryGateway, C: CodeLedgerGateway> RedemptionCoordinator<I, C> {
    /// Coordinator drawing from an entropy-seeded generator.
    pub fn new(inventory: I, ledger: C) -> Self {
        Self {
            inventory,
            ledger,
            random: Mutex::new(RngSource::from_entropy()),
            max_draw_attempts: DEFAULT_MAX_DRAW_ATTEMPTS,
        }
    }
}

impl<I, C, S> RedemptionCoordinator<I, C, S>
where
    I: InventoryGateway,
    C: CodeLedgerGateway,
    S: RandomSource + Send,
{
    /// Replace the random source, e.g. with a seeded or scripted one.
    pub fn with_random_source<T: RandomSource + Send>(
        self,
        source: T,
    ) -> RedemptionCoordinator<I, C, T> {
        RedemptionCoordinator {
            inventory: self.inventory,
            ledger: self.ledger,
            random: Mutex::new(source),
            max_draw_attempts: self.max_draw_attempts,
        }
    }

    /// Bound on draws per redemption when stock is contended. At least 1.
    pub fn with_max_draw_attempts(mut self, attempts: usize) -> Self {
        self.max_draw_attempts = attempts.max(1);
        self
    }

    pub fn with_config(self, config: &RedemptionConfig) -> Self {
        self.with_max_draw_attempts(config.max_draw_attempts)
    }

    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    pub fn ledger(&self) -> &C {
        &self.ledger
    }

    /// The whole pool for rendering the wheel before a code is entered.
    ///
    /// An unreachable prize source yields the single fallback segment with
    /// `degraded` set, never an error.
    pub fn list_available_prizes_for_display(&self) -> DisplayPool {
        match self.inventory.list_all() {
            Ok(prizes) => DisplayPool::from_prizes(&prizes),
            Err(err) => {
                tracing::warn!(error = %err, "prize pool unavailable, showing fallback segment");
                DisplayPool::fallback()
            }
        }
    }

    /// Redeem `code` for `redeemer`. Every path returns a distinct status;
    /// nothing here panics or propagates an error.
    pub fn redeem(&self, code: &str, redeemer: &str) -> RedeemOutcome {
        let span = tracing::debug_span!("redeem", code = %code.trim());
        let _entered = span.enter();
        tracing::debug!(stage = %Stage::Received, "redemption received");

        match self.attempt(code, redeemer) {
            Ok(award) => {
                tracing::info!(
                    stage = %Stage::LedgerCommitted,
                    redeemer = %redeemer.trim(),
                    prize = %award.prize,
                    index = award.index,
                    "prize awarded"
                );
                RedeemOutcome::awarded(award)
            }
            Err(err) => {
                match &err {
                    RedeemError::Unavailable(_) => {
                        tracing::error!(stage = %err.stage(), error = %err, "redemption failed")
                    }
                    RedeemError::StockRace { .. } => {
                        tracing::warn!(stage = %err.stage(), error = %err, "redemption failed")
                    }
                    _ => tracing::debug!(stage = %err.stage(), reason = %err, "redemption rejected"),
                }
                RedeemOutcome::rejected(err.status())
            }
        }
    }

    fn attempt(&self, code: &str, redeemer: &str) -> Result<DrawResult, RedeemError> {
        let code = normalize_code(code);
        let redeemer = redeemer.trim();
        if code.is_empty() {
            return Err(RedeemError::BadInput("code"));
        }
        if redeemer.is_empty() {
            return Err(RedeemError::BadInput("redeemer"));
        }

        match self.ledger.find_by_code(&code)? {
            None => return Err(RedeemError::CodeInvalid),
            Some(record) if record.is_redeemed() => return Err(RedeemError::CodeUsed),
            Some(_) => {}
        }
        tracing::debug!(stage = %Stage::CodeValidated, "code is unused");

        let award = match self.reserve_stock() {
            Ok(award) => award,
            Err(err @ (RedeemError::PoolEmpty | RedeemError::StockRace { .. })) => {
                return Err(self.recheck_code(&code, err));
            }
            Err(err) => return Err(err),
        };
        self.commit(&code, redeemer, award)
    }

    /// Callers sharing one code all pass validation before any of them
    /// commits, then compete for stock. A loser whose code has since been
    /// redeemed reports CODE_USED, not the stock failure it hit.
    fn recheck_code(&self, code: &str, stock_failure: RedeemError) -> RedeemError {
        match self.ledger.find_by_code(code) {
            Ok(Some(record)) if record.is_redeemed() => {
                tracing::debug!(reason = %stock_failure, "code redeemed concurrently while stock ran out");
                RedeemError::CodeUsed
            }
            Ok(_) => stock_failure,
            Err(err) => {
                tracing::warn!(error = %err, "cannot recheck code after stock failure");
                stock_failure
            }
        }
    }

    /// Draw and take one unit of the drawn prize, retrying on lost races.
    fn reserve_stock(&self) -> Result<DrawResult, RedeemError> {
        let mut exhausted: Vec<String> = Vec::new();

        for attempt in 1..=self.max_draw_attempts {
            let pool = self.inventory.list_all()?;
            let request = DrawRequest::new(&pool).excluding(&exhausted);
            tracing::debug!(stage = %Stage::PoolSnapshotTaken, attempt, segments = pool.len(), "pool snapshot taken");

            let award = {
                let mut source = self.random.lock().unwrap_or_else(PoisonError::into_inner);
                draw(&request, &mut *source).map_err(|_| RedeemError::PoolEmpty)?
            };
            tracing::debug!(stage = %Stage::PrizeDrawn, attempt, prize = %award.prize, "prize drawn");

            // A timeout here means nothing was taken; see `InventoryGateway::decrement_stock`.
            match self.inventory.decrement_stock(&award.prize)? {
                StockDecrement::Decremented { remaining } => {
                    tracing::debug!(stage = %Stage::StockReserved, prize = %award.prize, remaining, "unit reserved");
                    return Ok(award);
                }
                StockDecrement::AlreadyZero | StockDecrement::NotFound => {
                    tracing::warn!(attempt, prize = %award.prize, "prize sold out between snapshot and reservation");
                    exhausted.push(award.prize);
                }
            }
        }

        Err(RedeemError::StockRace {
            attempts: self.max_draw_attempts,
        })
    }

    /// Record the award in the ledger, or give the reserved unit back.
    fn commit(&self, code: &str, redeemer: &str, award: DrawResult) -> Result<DrawResult, RedeemError> {
        match self.ledger.try_redeem(code, redeemer, &award.prize) {
            Ok(LedgerCommit::Committed) => Ok(award),
            Ok(LedgerCommit::AlreadyRedeemed) | Ok(LedgerCommit::NotFound) => {
                tracing::warn!(prize = %award.prize, "code consumed by a concurrent redemption");
                self.compensate(&award.prize);
                Err(RedeemError::CodeUsed)
            }
            Err(err) if err.is_timeout() => self.reconcile(code, redeemer, award, err),
            Err(err) => {
                self.compensate(&award.prize);
                Err(err.into())
            }
        }
    }

    /// The ledger call timed out, so it may or may not have landed. Look
    /// again before deciding.
    fn reconcile(
        &self,
        code: &str,
        redeemer: &str,
        award: DrawResult,
        cause: GatewayError,
    ) -> Result<DrawResult, RedeemError> {
        match self.ledger.find_by_code(code) {
            Ok(Some(record))
                if record.is_redeemed()
                    && record.redeemer() == Some(redeemer)
                    && record.awarded_prize() == Some(award.prize.as_str()) =>
            {
                tracing::warn!(prize = %award.prize, "ledger commit landed despite timeout");
                Ok(award)
            }
            Ok(Some(record)) if record.is_redeemed() => {
                self.compensate(&award.prize);
                Err(RedeemError::CodeUsed)
            }
            Ok(_) => {
                self.compensate(&award.prize);
                Err(cause.into())
            }
            Err(err) => {
                // Restoring here could oversell if the commit did land.
                tracing::error!(
                    prize = %award.prize,
                    error = %err,
                    "cannot tell whether ledger commit landed, reserved unit kept"
                );
                Err(cause.into())
            }
        }
    }

    fn compensate(&self, prize: &str) {
        match self.inventory.restore_stock(prize) {
            Ok(StockRestore::Restored { remaining }) => {
                tracing::warn!(%prize, remaining, "reserved unit restored")
            }
            Ok(StockRestore::NotFound) => {
                tracing::error!(%prize, "cannot restore reserved unit, prize no longer exists")
            }
            Err(err) => {
                tracing::error!(%prize, error = %err, "cannot restore reserved unit")
            }
        }
    }
}
