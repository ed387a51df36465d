use std::fmt;

use thiserror::Error;

use super::outcome::RedeemStatus;
use crate::gateway::GatewayError;

/// Why a redemption attempt ended without an award.
#[derive(Debug, Error)]
pub(crate) enum RedeemError {
    #[error("missing {0}")]
    BadInput(&'static str),
    #[error("code not found")]
    CodeInvalid,
    #[error("code already used")]
    CodeUsed,
    #[error("all prizes are out of stock")]
    PoolEmpty,
    #[error("lost the race for stock {attempts} times")]
    StockRace { attempts: usize },
    #[error("gateway unavailable: {0}")]
    Unavailable(#[from] GatewayError),
}

impl RedeemError {
    pub(crate) fn status(&self) -> RedeemStatus {
        match self {
            RedeemError::BadInput(_) => RedeemStatus::BadInput,
            RedeemError::CodeInvalid => RedeemStatus::CodeInvalid,
            RedeemError::CodeUsed => RedeemStatus::CodeUsed,
            RedeemError::PoolEmpty => RedeemStatus::PoolEmpty,
            RedeemError::StockRace { .. } => RedeemStatus::StockRace,
            RedeemError::Unavailable(_) => RedeemStatus::Unavailable,
        }
    }

    /// The terminal failure state this error leaves the attempt in.
    pub(crate) fn stage(&self) -> Stage {
        match self {
            RedeemError::BadInput(_) => Stage::RejectedBadInput,
            RedeemError::CodeInvalid => Stage::RejectedCodeInvalid,
            RedeemError::CodeUsed => Stage::RejectedCodeUsed,
            RedeemError::PoolEmpty => Stage::RejectedPoolEmpty,
            RedeemError::StockRace { .. } => Stage::FailedStockRace,
            RedeemError::Unavailable(_) => Stage::FailedUnavailable,
        }
    }
}

/// States of a single redemption attempt, logged as it advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Received,
    CodeValidated,
    PoolSnapshotTaken,
    PrizeDrawn,
    StockReserved,
    LedgerCommitted,
    RejectedBadInput,
    RejectedCodeInvalid,
    RejectedCodeUsed,
    RejectedPoolEmpty,
    FailedStockRace,
    FailedUnavailable,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "RECEIVED",
            Stage::CodeValidated => "CODE_VALIDATED",
            Stage::PoolSnapshotTaken => "POOL_SNAPSHOT_TAKEN",
            Stage::PrizeDrawn => "PRIZE_DRAWN",
            Stage::StockReserved => "STOCK_RESERVED",
            Stage::LedgerCommitted => "LEDGER_COMMITTED",
            Stage::RejectedBadInput => "REJECTED_BAD_INPUT",
            Stage::RejectedCodeInvalid => "REJECTED_CODE_INVALID",
            Stage::RejectedCodeUsed => "REJECTED_CODE_USED",
            Stage::RejectedPoolEmpty => "REJECTED_POOL_EMPTY",
            Stage::FailedStockRace => "FAILED_STOCK_RACE",
            Stage::FailedUnavailable => "FAILED_UNAVAILABLE",
        };
        f.write_str(name)
    }
}
