pub mod config;
pub mod error;
pub mod stealth;
pub mod utils;

// Re-export the engine surface consumed by the panel-facing layers
pub use config::{EnhancedBundleConfig, RawTransaction};
pub use error::EngineError;
pub use stealth::{
    BundlePlan, ProtectionLevel, ProtectionStatus, RiskLevel, ScheduledTransaction, SeededRng,
    StealthConfig, StealthConfigPatch, StealthEngine, StealthMetrics, ThreatAssessment,
    TransactionIntent, TxKind,
};
