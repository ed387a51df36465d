use serde::{Deserialize, Serialize};

use crate::draw::DrawResult;
use crate::record::PrizeRecord;

/// Segment label shown when the prize source cannot be read, so a broken
/// upstream is distinguishable from a pool with nothing configured.
pub const FALLBACK_SEGMENT: &str = "Error";

/// Stable, distinct status per outcome of a redemption attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedeemStatus {
    Ok,
    BadInput,
    CodeInvalid,
    CodeUsed,
    PoolEmpty,
    StockRace,
    Unavailable,
}

impl RedeemStatus {
    /// Map this status to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            RedeemStatus::Ok => 200,
            RedeemStatus::BadInput => 400,
            RedeemStatus::CodeUsed => 403,
            RedeemStatus::CodeInvalid => 404,
            RedeemStatus::StockRace => 409,
            RedeemStatus::PoolEmpty => 410,
            RedeemStatus::Unavailable => 503,
        }
    }

    /// Whether re-submitting the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RedeemStatus::StockRace | RedeemStatus::Unavailable)
    }
}

/// Result of [`RedemptionCoordinator::redeem`](super::RedemptionCoordinator::redeem).
///
/// `prize`, `index`, `total_segments` and `all_names` are present iff
/// `status` is `Ok`; they are everything a client needs to spin a wheel to
/// the right segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemOutcome {
    pub status: RedeemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prize: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_segments: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_names: Option<Vec<String>>,
}

impl RedeemOutcome {
    pub fn awarded(draw: DrawResult) -> Self {
        Self {
            status: RedeemStatus::Ok,
            prize: Some(draw.prize),
            index: Some(draw.index),
            total_segments: Some(draw.all_names.len()),
            all_names: Some(draw.all_names),
        }
    }

    pub fn rejected(status: RedeemStatus) -> Self {
        Self {
            status,
            prize: None,
            index: None,
            total_segments: None,
            all_names: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == RedeemStatus::Ok
    }
}

/// One wheel segment as shown before any code is entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySegment {
    pub name: String,
    pub has_stock: bool,
}

/// The full pool for rendering, zero-stock prizes included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPool {
    pub segments: Vec<DisplaySegment>,
    /// Set when the prize source was unreachable and `segments` is the
    /// single [`FALLBACK_SEGMENT`].
    pub degraded: bool,
}

impl DisplayPool {
    pub fn from_prizes(prizes: &[PrizeRecord]) -> Self {
        Self {
            segments: prizes
                .iter()
                .map(|p| DisplaySegment {
                    name: p.name.clone(),
                    has_stock: p.in_stock(),
                })
                .collect(),
            degraded: false,
        }
    }

    pub fn fallback() -> Self {
        Self {
            segments: vec![DisplaySegment {
                name: FALLBACK_SEGMENT.to_string(),
                has_stock: false,
            }],
            degraded: true,
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.name.as_str()).collect()
    }
}
