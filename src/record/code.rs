use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Row;

/// Trim and case-fold a user-supplied code. Empty input stays empty.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodeStatus {
    #[default]
    Unused,
    Redeemed,
}

/// Returned by [`CodeRecord::redeem`] when the code was already consumed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("code {code} already redeemed")]
pub struct AlreadyRedeemed {
    pub code: String,
}

/// One single-use access code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRecord {
    pub code: String,
    #[serde(default)]
    status: CodeStatus,
    #[serde(default)]
    redeemer: Option<String>,
    #[serde(default, rename = "prize")]
    awarded_prize: Option<String>,
}

impl CodeRecord {
    /// A freshly provisioned, unused code.
    pub fn unused(code: &str) -> Self {
        Self {
            code: normalize_code(code),
            status: CodeStatus::Unused,
            redeemer: None,
            awarded_prize: None,
        }
    }

    pub fn status(&self) -> CodeStatus {
        self.status
    }

    pub fn is_redeemed(&self) -> bool {
        self.status == CodeStatus::Redeemed
    }

    pub fn redeemer(&self) -> Option<&str> {
        self.redeemer.as_deref()
    }

    pub fn awarded_prize(&self) -> Option<&str> {
        self.awarded_prize.as_deref()
    }

    /// Whether `raw` names this code, ignoring surrounding whitespace and case.
    pub fn matches(&self, raw: &str) -> bool {
        normalize_code(&self.code) == normalize_code(raw)
    }

    /// The one-way UNUSED → REDEEMED transition.
    pub fn redeem(&mut self, redeemer: &str, prize: &str) -> Result<(), AlreadyRedeemed> {
        if self.is_redeemed() {
            return Err(AlreadyRedeemed {
                code: self.code.clone(),
            });
        }
        self.status = CodeStatus::Redeemed;
        self.redeemer = Some(redeemer.to_string());
        self.awarded_prize = Some(prize.to_string());
        Ok(())
    }
}

impl Row for CodeRecord {
    const TABLE: &'static str = "codes";

    fn key(&self) -> &str {
        &self.code
    }
}
