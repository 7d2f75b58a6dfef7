//! The stealth scheduling engine instance.
//!
//! One engine owns its configuration, its bounded metric histories, and its
//! random source, so independent schedulers (and deterministic tests) can
//! coexist without shared global state.

use log::info;
use serde::Serialize;
use std::sync::{Mutex, RwLock};

use crate::config::EnhancedBundleConfig;
use crate::stealth::bundle::assemble;
use crate::stealth::delay::compute_delay;
use crate::stealth::metrics::{MetricsTracker, StealthMetrics};
use crate::stealth::sampler::{RandomSource, ThreadRngSource};
use crate::stealth::threat::{assess, ThreatAssessment};
use crate::stealth::types::{
    BundlePlan, ProtectionLevel, StealthConfig, StealthConfigPatch, TransactionIntent, TxKind,
};

/// Dashboard-facing snapshot of the engine's protection posture.
#[derive(Debug, Clone, Serialize)]
pub struct ProtectionStatus {
    pub config: StealthConfig,
    pub protection_level: ProtectionLevel,
    pub stealth_score: u8,
    pub timing_samples: usize,
    pub threat_samples: usize,
    pub metrics: StealthMetrics,
}

pub struct StealthEngine {
    config: RwLock<StealthConfig>,
    tracker: MetricsTracker,
    rng: Mutex<Box<dyn RandomSource>>,
}

impl StealthEngine {
    pub fn new(config: StealthConfig) -> Self {
        Self::with_random_source(config, Box::new(ThreadRngSource))
    }

    /// Constructs the engine on a caller-supplied random source, for
    /// seeded, reproducible scheduling runs.
    pub fn with_random_source(config: StealthConfig, rng: Box<dyn RandomSource>) -> Self {
        info!(
            "🥷 stealth engine initialized: enabled={} random_timing={} mev_protection={} private_mempool={}",
            config.enabled, config.random_timing, config.mev_protection, config.use_private_mempool
        );
        Self {
            config: RwLock::new(config),
            tracker: MetricsTracker::new(),
            rng: Mutex::new(rng),
        }
    }

    /// Builds the engine straight from the externally supplied bundle
    /// configuration via the adapter.
    pub fn from_bundle_config(bundle: &EnhancedBundleConfig) -> Self {
        Self::new(bundle.to_stealth_config())
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> StealthConfig {
        self.config.read().unwrap().clone()
    }

    /// Shallow-merges a partial update into the current configuration.
    pub fn update_config(&self, patch: StealthConfigPatch) {
        let mut config = self.config.write().unwrap();
        config.merge(patch);
        info!("🔧 stealth configuration updated");
    }

    /// Replaces the configuration wholesale, as on re-initialization.
    pub fn replace_config(&self, config: StealthConfig) {
        *self.config.write().unwrap() = config;
        info!("🔧 stealth configuration replaced");
    }

    /// Computes the stagger delay for one transaction and records it.
    pub fn compute_delay(
        &self,
        base_delay_ms: u64,
        index: usize,
        total: usize,
        kind: TxKind,
    ) -> u64 {
        let config = self.config.read().unwrap().clone();
        let mut rng = self.rng.lock().unwrap();
        compute_delay(
            rng.as_mut(),
            &self.tracker,
            base_delay_ms,
            index,
            total,
            kind,
            &config,
        )
    }

    /// Assesses one transaction's MEV exposure and records the event.
    pub fn assess(&self, tx: &TransactionIntent, total_budget: f64) -> ThreatAssessment {
        let config = self.config.read().unwrap().clone();
        assess(&self.tracker, tx, &config, total_budget)
    }

    /// Assembles a full scheduling plan for an ordered transaction list.
    pub fn build_bundle(&self, intents: &[TransactionIntent], total_budget: f64) -> BundlePlan {
        let config = self.config.read().unwrap().clone();
        let mut rng = self.rng.lock().unwrap();
        assemble(rng.as_mut(), &self.tracker, intents, &config, total_budget)
    }

    /// Effectiveness statistics over the recent history windows.
    pub fn analyze_effectiveness(&self) -> StealthMetrics {
        let random_timing = self.config.read().unwrap().random_timing;
        self.tracker.analyze(random_timing)
    }

    /// Clears both rolling histories.
    pub fn reset_metrics(&self) {
        self.tracker.reset();
        info!("🧹 stealth metrics reset");
    }

    pub fn protection_status(&self) -> ProtectionStatus {
        let config = self.config.read().unwrap().clone();
        ProtectionStatus {
            protection_level: config.protection_level(),
            stealth_score: config.safety_score(),
            timing_samples: self.tracker.timing_samples(),
            threat_samples: self.tracker.threat_samples(),
            metrics: self.tracker.analyze(config.random_timing),
            config,
        }
    }
}
