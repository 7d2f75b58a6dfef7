// src/stealth/types.rs
use serde::{Deserialize, Serialize};

/// Scheduling and protection flags consumed per bundle build. Immutable
/// snapshot: replaced wholesale on re-initialization, or merged through
/// [`StealthConfigPatch`] — never partially corrupted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StealthConfig {
    pub enabled: bool,
    pub random_timing: bool,
    /// Delay variation half-width in percent, expected in [0, 100].
    /// Validated at the configuration adapter, not here.
    pub variation_percent: f64,
    pub proxy_usage: bool,
    pub mev_protection: bool,
    pub sandwich_protection: bool,
    pub frontrunning_protection: bool,
    pub use_private_mempool: bool,
}

impl Default for StealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            random_timing: true,
            variation_percent: 30.0,
            proxy_usage: false,
            mev_protection: true,
            sandwich_protection: false,
            frontrunning_protection: false,
            use_private_mempool: false,
        }
    }
}

impl StealthConfig {
    /// Preset with every protection flag switched on.
    pub fn full_protection() -> Self {
        Self {
            enabled: true,
            random_timing: true,
            variation_percent: 30.0,
            proxy_usage: true,
            mev_protection: true,
            sandwich_protection: true,
            frontrunning_protection: true,
            use_private_mempool: true,
        }
    }

    /// Shallow merge: fields present in the patch replace the current value.
    pub fn merge(&mut self, patch: StealthConfigPatch) {
        if let Some(v) = patch.enabled {
            self.enabled = v;
        }
        if let Some(v) = patch.random_timing {
            self.random_timing = v;
        }
        if let Some(v) = patch.variation_percent {
            self.variation_percent = v;
        }
        if let Some(v) = patch.proxy_usage {
            self.proxy_usage = v;
        }
        if let Some(v) = patch.mev_protection {
            self.mev_protection = v;
        }
        if let Some(v) = patch.sandwich_protection {
            self.sandwich_protection = v;
        }
        if let Some(v) = patch.frontrunning_protection {
            self.frontrunning_protection = v;
        }
        if let Some(v) = patch.use_private_mempool {
            self.use_private_mempool = v;
        }
    }

    pub fn protection_level(&self) -> ProtectionLevel {
        if self.use_private_mempool && self.mev_protection {
            ProtectionLevel::Maximum
        } else if self.mev_protection && self.random_timing {
            ProtectionLevel::Advanced
        } else {
            ProtectionLevel::Basic
        }
    }

    /// Heuristic confidence score in [0, 100], not a probability.
    pub fn safety_score(&self) -> u8 {
        let mut score: u32 = 50;
        if self.random_timing {
            score += 20;
        }
        if self.mev_protection {
            score += 15;
        }
        if self.use_private_mempool {
            score += 10;
        }
        if self.sandwich_protection {
            score += 5;
        }
        score.min(100) as u8
    }
}

/// Partial update for [`StealthConfig::merge`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StealthConfigPatch {
    pub enabled: Option<bool>,
    pub random_timing: Option<bool>,
    pub variation_percent: Option<f64>,
    pub proxy_usage: Option<bool>,
    pub mev_protection: Option<bool>,
    pub sandwich_protection: Option<bool>,
    pub frontrunning_protection: Option<bool>,
    pub use_private_mempool: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Buy,
    Sell,
    Approve,
    Transfer,
}

impl TxKind {
    /// Unrecognized labels deliberately fall back to `Transfer`, matching
    /// the tolerant handling of free-form type strings from the panel.
    pub fn from_label(label: &str) -> Self {
        match label {
            "buy" => Self::Buy,
            "sell" => Self::Sell,
            "approve" => Self::Approve,
            "transfer" => Self::Transfer,
            _ => Self::Transfer,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Approve => "approve",
            Self::Transfer => "transfer",
        }
    }

    /// Per-type delay weight: sells linger, approvals hurry.
    pub fn delay_weight(&self) -> f64 {
        match self {
            Self::Buy => 1.0,
            Self::Sell => 1.2,
            Self::Approve => 0.8,
            Self::Transfer => 0.9,
        }
    }
}

/// One transaction as handed over by the bundle builder. Read-only input;
/// the assembler produces annotated copies, never mutates these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionIntent {
    pub kind: TxKind,
    /// Amount in native-currency units (BNB).
    pub value: f64,
    pub gas_price_wei: u64,
}

/// A transaction stamped with its scheduling metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledTransaction {
    pub intent: TransactionIntent,
    pub stagger_delay_ms: u64,
    pub is_private_mempool: bool,
    pub batch_position: usize,
    pub bundle_hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtectionLevel {
    Basic,
    Advanced,
    Maximum,
}

/// Output of one bundle assembly. `total_delay_ms` is a sequential
/// scheduling plan for the external executor, not a measured duration.
#[derive(Debug, Clone, Serialize)]
pub struct BundlePlan {
    pub bundle_id: String,
    pub transactions: Vec<ScheduledTransaction>,
    pub total_delay_ms: u64,
    pub mev_protection_level: ProtectionLevel,
    pub estimated_safety: u8,
}
