use thiserror::Error;

use crate::lock::LockError;
use crate::table::StoreError;

/// Infrastructure failure behind a gateway. Domain outcomes (not found,
/// already redeemed, sold out) are never errors.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("lock error: {0}")]
    Lock(LockError),
    /// The call did not finish in time. The caller cannot assume it was or
    /// was not applied unless the operation documents otherwise
    /// (`InventoryGateway::decrement_stock` does).
    #[error("gateway call timed out on {key}")]
    Timeout { key: String },
}

impl From<LockError> for GatewayError {
    fn from(err: LockError) -> Self {
        match err {
            LockError::Timeout { key, .. } => GatewayError::Timeout { key },
            other => GatewayError::Lock(other),
        }
    }
}

impl GatewayError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Timeout { .. })
    }
}
