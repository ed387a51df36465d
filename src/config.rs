//! Runtime configuration.
//!
//! Loaded from a JSON file (path in `PRIZE_WHEEL_CONFIG`) with every field
//! optional, then `PORT` overrides the port of `bind_addr`.
//!
//! ```json
//! {
//!   "bind_addr": "0.0.0.0:5000",
//!   "prizes_path": "data/prizes.json",
//!   "codes_path": "data/codes.json",
//!   "redemption": { "max_draw_attempts": 3, "gateway_timeout_ms": 5000, "retention": "audit_trail" }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gateway::locked::DEFAULT_LOCK_TIMEOUT;
use crate::gateway::Retention;
use crate::redeem::DEFAULT_MAX_DRAW_ATTEMPTS;

pub const CONFIG_PATH_ENV: &str = "PRIZE_WHEEL_CONFIG";
pub const PORT_ENV: &str = "PORT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Knobs of the redemption coordinator and the locked gateways.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedemptionConfig {
    /// Draw attempts before giving up with STOCK_RACE.
    pub max_draw_attempts: usize,
    /// Bound on waiting for a per-key gateway lock.
    pub gateway_timeout_ms: u64,
    pub retention: Retention,
}

impl Default for RedemptionConfig {
    fn default() -> Self {
        Self {
            max_draw_attempts: DEFAULT_MAX_DRAW_ATTEMPTS,
            gateway_timeout_ms: DEFAULT_LOCK_TIMEOUT.as_millis() as u64,
            retention: Retention::AuditTrail,
        }
    }
}

impl RedemptionConfig {
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_millis(self.gateway_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    pub bind_addr: String,
    /// JSON array of prize rows.
    pub prizes_path: Option<PathBuf>,
    /// JSON array of code rows.
    pub codes_path: Option<PathBuf>,
    pub redemption: RedemptionConfig,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            prizes_path: None,
            codes_path: None,
            redemption: RedemptionConfig::default(),
        }
    }
}

impl WheelConfig {
    /// Parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&bytes)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// File named by `PRIZE_WHEEL_CONFIG` (defaults otherwise), then `PORT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load(PathBuf::from(path))?,
            None => Self::default(),
        };
        if let Ok(port) = std::env::var(PORT_ENV) {
            config.apply_port(&port)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Replace the port of `bind_addr`, keeping its host.
    pub fn apply_port(&mut self, port: &str) -> Result<(), ConfigError> {
        let port: u16 = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("{} is not a port: {:?}", PORT_ENV, port)))?;
        let host = match self.bind_addr.rsplit_once(':') {
            Some((host, _)) => host,
            None => self.bind_addr.as_str(),
        };
        self.bind_addr = format!("{}:{}", host, port);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.redemption.max_draw_attempts == 0 {
            return Err(ConfigError::Invalid(
                "redemption.max_draw_attempts must be at least 1".into(),
            ));
        }
        if self.redemption.gateway_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "redemption.gateway_timeout_ms must be positive".into(),
            ));
        }
        if self.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_addr is empty".into()));
        }
        Ok(())
    }
}
