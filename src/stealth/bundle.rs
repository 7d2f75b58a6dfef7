// src/stealth/bundle.rs
//
// Bundle assembly: walks an ordered transaction list, stamps every entry
// with scheduling metadata, and derives the aggregate protection posture.

use log::info;

use crate::stealth::delay::compute_delay;
use crate::stealth::metrics::MetricsTracker;
use crate::stealth::sampler::RandomSource;
use crate::stealth::threat::assess;
use crate::stealth::types::{BundlePlan, ScheduledTransaction, StealthConfig, TransactionIntent};

/// Reference base delay every transaction starts from before perturbation.
pub const BASE_DELAY_MS: u64 = 2_000;

const BUNDLE_ID_SUFFIX_LEN: usize = 8;

/// Time-based id with a random suffix. Uniqueness is best-effort, not
/// cryptographically guaranteed.
fn generate_bundle_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = (0..BUNDLE_ID_SUFFIX_LEN)
        .map(|_| fastrand::alphanumeric())
        .collect();
    format!("bundle_{}_{}", millis, suffix)
}

/// Assembles a scheduling plan for an ordered transaction list.
///
/// Each transaction is assessed for MEV threats (recorded into the threat
/// history) and assigned a stagger delay from the reference base. The
/// returned `total_delay_ms` is the sequential sum the external executor
/// spaces submissions by; nothing here sleeps.
pub fn assemble(
    rng: &mut dyn RandomSource,
    tracker: &MetricsTracker,
    intents: &[TransactionIntent],
    config: &StealthConfig,
    total_budget: f64,
) -> BundlePlan {
    let bundle_id = generate_bundle_id();
    let mut transactions = Vec::with_capacity(intents.len());
    let mut total_delay_ms: u64 = 0;

    for (index, intent) in intents.iter().enumerate() {
        let stagger_delay_ms = compute_delay(
            rng,
            tracker,
            BASE_DELAY_MS,
            index,
            intents.len(),
            intent.kind,
            config,
        );
        assess(tracker, intent, config, total_budget);

        total_delay_ms += stagger_delay_ms;
        transactions.push(ScheduledTransaction {
            intent: intent.clone(),
            stagger_delay_ms,
            is_private_mempool: config.use_private_mempool,
            batch_position: index,
            bundle_hash: bundle_id.clone(),
        });
    }

    let plan = BundlePlan {
        bundle_id,
        transactions,
        total_delay_ms,
        mev_protection_level: config.protection_level(),
        estimated_safety: config.safety_score(),
    };

    info!(
        "📦 bundle {} assembled: {} transactions, {}ms planned, level={:?}, safety={}",
        plan.bundle_id,
        plan.transactions.len(),
        plan.total_delay_ms,
        plan.mev_protection_level,
        plan.estimated_safety
    );

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stealth::delay::{MAX_STAGGER_DELAY_MS, MIN_STAGGER_DELAY_MS};
    use crate::stealth::sampler::SeededRng;
    use crate::stealth::types::{ProtectionLevel, TxKind};
    use pretty_assertions::assert_eq;

    fn intents(n: usize) -> Vec<TransactionIntent> {
        (0..n)
            .map(|i| TransactionIntent {
                kind: if i % 2 == 0 { TxKind::Buy } else { TxKind::Sell },
                value: 0.5,
                gas_price_wei: 5_000_000_000,
            })
            .collect()
    }

    #[test]
    fn private_mempool_and_mev_yield_maximum_level() {
        let config = StealthConfig {
            use_private_mempool: true,
            mev_protection: true,
            ..StealthConfig::default()
        };
        let mut rng = SeededRng::new(21);
        let tracker = MetricsTracker::new();
        let plan = assemble(&mut rng, &tracker, &intents(5), &config, 100.0);
        assert_eq!(plan.mev_protection_level, ProtectionLevel::Maximum);
        assert_eq!(plan.transactions.len(), 5);
        assert!(plan.transactions.iter().all(|tx| tx.is_private_mempool));
    }

    #[test]
    fn plan_metadata_is_consistent() {
        let mut rng = SeededRng::new(22);
        let tracker = MetricsTracker::new();
        let plan = assemble(
            &mut rng,
            &tracker,
            &intents(7),
            &StealthConfig::default(),
            100.0,
        );

        let sum: u64 = plan.transactions.iter().map(|tx| tx.stagger_delay_ms).sum();
        assert_eq!(plan.total_delay_ms, sum);
        assert!(plan.estimated_safety <= 100);
        for (i, tx) in plan.transactions.iter().enumerate() {
            assert_eq!(tx.batch_position, i);
            assert_eq!(tx.bundle_hash, plan.bundle_id);
            assert!(
                (MIN_STAGGER_DELAY_MS..=MAX_STAGGER_DELAY_MS).contains(&tx.stagger_delay_ms)
            );
        }
    }

    #[test]
    fn assembly_feeds_both_histories() {
        let mut rng = SeededRng::new(23);
        let tracker = MetricsTracker::new();
        assemble(
            &mut rng,
            &tracker,
            &intents(4),
            &StealthConfig::default(),
            100.0,
        );
        assert_eq!(tracker.timing_samples(), 4);
        assert_eq!(tracker.threat_samples(), 4);
    }

    #[test]
    fn disabled_stealth_stamps_the_base_delay() {
        let config = StealthConfig {
            enabled: false,
            ..StealthConfig::default()
        };
        let mut rng = SeededRng::new(24);
        let tracker = MetricsTracker::new();
        let plan = assemble(&mut rng, &tracker, &intents(3), &config, 100.0);
        assert!(plan
            .transactions
            .iter()
            .all(|tx| tx.stagger_delay_ms == BASE_DELAY_MS));
        // bypassed delays are not recorded, assessments still are
        assert_eq!(tracker.timing_samples(), 0);
        assert_eq!(tracker.threat_samples(), 3);
    }

    #[test]
    fn bundle_ids_carry_the_expected_shape() {
        let mut rng = SeededRng::new(25);
        let tracker = MetricsTracker::new();
        let plan = assemble(
            &mut rng,
            &tracker,
            &intents(1),
            &StealthConfig::default(),
            100.0,
        );
        let parts: Vec<&str> = plan.bundle_id.splitn(3, '_').collect();
        assert_eq!(parts[0], "bundle");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), BUNDLE_ID_SUFFIX_LEN);
    }

    #[test]
    fn empty_bundle_is_a_valid_plan() {
        let mut rng = SeededRng::new(26);
        let tracker = MetricsTracker::new();
        let plan = assemble(&mut rng, &tracker, &[], &StealthConfig::default(), 100.0);
        assert!(plan.transactions.is_empty());
        assert_eq!(plan.total_delay_ms, 0);
    }
}
