// src/config.rs
//
// Boundary between the control panel's configuration shapes and the
// engine's internal ones. All input validation lives here: the scheduling
// core trusts well-typed callers and never validates.

use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::EngineError;
use crate::stealth::types::{StealthConfig, TransactionIntent, TxKind};

/// Subtree of the externally persisted bundle configuration this engine
/// consumes, in the panel's camelCase JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedBundleConfig {
    pub execution_params: ExecutionParams,
    pub transaction_settings: TransactionSettings,
    pub purchase_amount: PurchaseAmount,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionParams {
    pub stealth_mode: StealthModeParams,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StealthModeParams {
    pub enabled: bool,
    pub random_timing: bool,
    pub variation_percent: f64,
    pub proxy_usage: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSettings {
    pub mev_protection: MevProtectionParams,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MevProtectionParams {
    pub enabled: bool,
    pub sandwich_protection: bool,
    pub frontrunning_protection: bool,
    pub use_private_mempool: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseAmount {
    pub total_bnb: f64,
}

impl EnhancedBundleConfig {
    /// Loads the panel-exported JSON config from disk.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| EngineError::IoError(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| EngineError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    pub fn total_budget(&self) -> f64 {
        self.purchase_amount.total_bnb
    }

    /// Maps the external subtree into the engine's config, clamping
    /// `variationPercent` into [0, 100] at this boundary.
    pub fn to_stealth_config(&self) -> StealthConfig {
        let stealth = &self.execution_params.stealth_mode;
        let mev = &self.transaction_settings.mev_protection;

        let variation_percent = if (0.0..=100.0).contains(&stealth.variation_percent) {
            stealth.variation_percent
        } else {
            let clamped = stealth.variation_percent.clamp(0.0, 100.0);
            warn!(
                "⚠️ variationPercent {} outside [0, 100], clamped to {}",
                stealth.variation_percent, clamped
            );
            clamped
        };

        StealthConfig {
            enabled: stealth.enabled,
            random_timing: stealth.random_timing,
            variation_percent,
            proxy_usage: stealth.proxy_usage,
            mev_protection: mev.enabled,
            sandwich_protection: mev.sandwich_protection,
            frontrunning_protection: mev.frontrunning_protection,
            use_private_mempool: mev.use_private_mempool,
        }
    }

    pub fn validate_and_log(&self) {
        if self.purchase_amount.total_bnb <= 0.0 {
            warn!(
                "⚠️ totalBnb is {}, sandwich thresholds will never trigger",
                self.purchase_amount.total_bnb
            );
        }
        let variation = self.execution_params.stealth_mode.variation_percent;
        if !(0.0..=100.0).contains(&variation) {
            warn!("⚠️ variationPercent {} outside [0, 100]", variation);
        }
    }

    pub fn test_default() -> Self {
        Self {
            execution_params: ExecutionParams {
                stealth_mode: StealthModeParams {
                    enabled: true,
                    random_timing: true,
                    variation_percent: 30.0,
                    proxy_usage: false,
                },
            },
            transaction_settings: TransactionSettings {
                mev_protection: MevProtectionParams {
                    enabled: true,
                    sandwich_protection: false,
                    frontrunning_protection: false,
                    use_private_mempool: false,
                },
            },
            purchase_amount: PurchaseAmount { total_bnb: 100.0 },
        }
    }
}

/// One transaction entry as submitted by the bundle-building flow: the
/// amount is a decimal string, the gas price an integer string in wei.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub gas_price: String,
}

/// Parses the raw list into intents. Malformed numerics become 0 and
/// unknown type labels fall back to transfer; both are logged, neither is
/// fatal.
pub fn parse_transactions(raw: &[RawTransaction]) -> Vec<TransactionIntent> {
    raw.iter()
        .map(|entry| {
            let value = entry.value.parse::<f64>().unwrap_or_else(|_| {
                warn!("⚠️ malformed transaction value '{}', using 0", entry.value);
                0.0
            });
            let gas_price_wei = entry.gas_price.parse::<u64>().unwrap_or_else(|_| {
                warn!("⚠️ malformed gas price '{}', using 0", entry.gas_price);
                0
            });
            TransactionIntent {
                kind: TxKind::from_label(&entry.kind),
                value,
                gas_price_wei,
            }
        })
        .collect()
}

/// Loads the raw transaction list from a panel-exported JSON file.
pub fn load_transactions(path: &Path) -> Result<Vec<TransactionIntent>, EngineError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| EngineError::IoError(format!("{}: {}", path.display(), e)))?;
    let entries: Vec<RawTransaction> = serde_json::from_str(&raw)
        .map_err(|e| EngineError::ParseError(format!("{}: {}", path.display(), e)))?;
    Ok(parse_transactions(&entries))
}
