//! MEV threat classification for individual bundle transactions.
//!
//! Inspects one transaction against the aggregate bundle configuration and
//! flags sandwich, frontrunning, and large-exposure risk. Rules are
//! independent; results are the union of everything that triggered.

use log::debug;
use serde::Serialize;

use crate::stealth::metrics::MetricsTracker;
use crate::stealth::types::{StealthConfig, TransactionIntent, TxKind};

/// Reference gas price: 5 Gwei in wei.
pub const STANDARD_GAS_PRICE_WEI: u64 = 5_000_000_000;
/// Gas price above this multiple of standard reads as a frontrun bid.
pub const FRONTRUN_GAS_MULTIPLIER: f64 = 1.5;
/// Buys above this fraction of the bundle budget attract sandwichers.
pub const SANDWICH_BUDGET_FRACTION: f64 = 0.10;
/// Absolute value (native units) above which splitting is recommended.
pub const LARGE_EXPOSURE_THRESHOLD: f64 = 10.0;

pub const PROTECTION_DELAYED_EXECUTION: &str = "delayed_execution";
pub const PROTECTION_SLIPPAGE: &str = "slippage_protection";
pub const PROTECTION_GAS_OBFUSCATION: &str = "gas_price_obfuscation";
pub const PROTECTION_TIMING_RANDOMIZATION: &str = "timing_randomization";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatKind {
    Sandwich,
    Frontrunning,
    LargeExposure,
}

impl ThreatKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sandwich => "sandwich",
            Self::Frontrunning => "frontrunning",
            Self::LargeExposure => "large_exposure",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThreatAssessment {
    pub threats_detected: Vec<ThreatKind>,
    pub protection_applied: Vec<&'static str>,
    pub recommendations: Vec<String>,
    pub risk_level: RiskLevel,
}

impl ThreatAssessment {
    /// Suggested priority-fee multiplier for the external fee layer,
    /// scaled with assessed risk.
    pub fn priority_fee_multiplier(&self) -> f64 {
        match self.risk_level {
            RiskLevel::High => 3.0,
            RiskLevel::Medium => 2.0,
            RiskLevel::Low => 1.0,
        }
    }
}

/// Evaluates all threat rules for one transaction, records a threat event,
/// and returns the union of findings.
pub fn assess(
    tracker: &MetricsTracker,
    tx: &TransactionIntent,
    config: &StealthConfig,
    total_budget: f64,
) -> ThreatAssessment {
    let mut threats = Vec::new();
    let mut protections: Vec<&'static str> = Vec::new();
    let mut recommendations = Vec::new();

    // sandwich exposure: only buys move the price in a direction worth
    // wrapping
    if tx.kind == TxKind::Buy && tx.value > SANDWICH_BUDGET_FRACTION * total_budget {
        threats.push(ThreatKind::Sandwich);
        if config.sandwich_protection {
            protections.push(PROTECTION_DELAYED_EXECUTION);
            protections.push(PROTECTION_SLIPPAGE);
        } else {
            recommendations
                .push("Enable sandwich protection for large buy transactions".to_string());
        }
    }

    if tx.gas_price_wei as f64 > FRONTRUN_GAS_MULTIPLIER * STANDARD_GAS_PRICE_WEI as f64 {
        threats.push(ThreatKind::Frontrunning);
        if config.frontrunning_protection {
            protections.push(PROTECTION_GAS_OBFUSCATION);
            protections.push(PROTECTION_TIMING_RANDOMIZATION);
        } else {
            recommendations
                .push("Enable frontrunning protection for high gas price transactions".to_string());
        }
    }

    // no automatic mitigation for raw size, only advice
    if tx.value > LARGE_EXPOSURE_THRESHOLD {
        threats.push(ThreatKind::LargeExposure);
        recommendations
            .push("Split large transactions to reduce MEV exposure".to_string());
    }

    let risk_level = if threats.is_empty() {
        RiskLevel::Low
    } else if threats.len() <= 2 && protections.len() >= threats.len() {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };

    let threat_types = threats
        .iter()
        .map(|t| t.label())
        .collect::<Vec<_>>()
        .join(",");

    debug!(
        "🎯 threat assessment {:?} {}: threats=[{}] protections={} risk={:?}",
        tx.kind,
        tx.value,
        threat_types,
        protections.len(),
        risk_level
    );

    tracker.record_threat(threat_types, !threats.is_empty(), !protections.is_empty());

    ThreatAssessment {
        threats_detected: threats,
        protection_applied: protections,
        recommendations,
        risk_level,
    }
}
