//! `prize-wheel` - serve the redemption API over HTTP from JSON-file tables.
//!
//! Configuration comes from the file named by `PRIZE_WHEEL_CONFIG` plus
//! `PORT`; log filtering from `RUST_LOG` (default `info`).

use std::error::Error;
use std::sync::Arc;

use prize_wheel::{
    http, CodeRecord, ConfigError, JsonFileTable, LockedInventory, LockedLedger, PrizeRecord,
    RedemptionCoordinator, WheelConfig,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = WheelConfig::from_env()?;
    let prizes_path = config
        .prizes_path
        .clone()
        .ok_or_else(|| ConfigError::Invalid("prizes_path is required".into()))?;
    let codes_path = config
        .codes_path
        .clone()
        .ok_or_else(|| ConfigError::Invalid("codes_path is required".into()))?;
    let timeout = config.redemption.gateway_timeout();

    let inventory =
        LockedInventory::new(JsonFileTable::<PrizeRecord>::open(&prizes_path)?).with_timeout(timeout);
    let ledger = LockedLedger::new(JsonFileTable::<CodeRecord>::open(&codes_path)?)
        .with_timeout(timeout)
        .with_retention(config.redemption.retention);

    tracing::info!(
        prizes = %prizes_path.display(),
        codes = %codes_path.display(),
        retention = ?config.redemption.retention,
        "tables opened"
    );

    let coordinator =
        Arc::new(RedemptionCoordinator::new(inventory, ledger).with_config(&config.redemption));
    http::serve(coordinator, &config.bind_addr).await?;
    Ok(())
}
