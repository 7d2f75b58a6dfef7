//! Stealth scheduling and MEV-risk assessment for transaction bundles.

pub mod bundle;
pub mod delay;
pub mod engine;
pub mod metrics;
pub mod sampler;
pub mod threat;
pub mod types;

pub use engine::{ProtectionStatus, StealthEngine};
pub use metrics::{DetectionRisk, StealthMetrics};
pub use sampler::{DistributionShape, RandomSource, SeededRng, ThreadRngSource};
pub use threat::{RiskLevel, ThreatAssessment, ThreatKind};
pub use types::{
    BundlePlan, ProtectionLevel, ScheduledTransaction, StealthConfig, StealthConfigPatch,
    TransactionIntent, TxKind,
};
