// src/stealth/delay.rs
//
// Per-transaction stagger delay computation. Layers independent
// multiplicative and additive perturbations so no single periodic
// signature survives across a bundle.

use log::debug;
use std::f64::consts::PI;

use crate::stealth::metrics::MetricsTracker;
use crate::stealth::sampler::{sample, DistributionShape, RandomSource};
use crate::stealth::types::{StealthConfig, TxKind};

/// Hard bounds on every scheduled delay, regardless of upstream config.
pub const MIN_STAGGER_DELAY_MS: u64 = 1_000;
pub const MAX_STAGGER_DELAY_MS: u64 = 30_000;

/// Flat extra padding for MEV-protected buys, the highest-value target.
pub const MEV_PADDING_MIN_MS: f64 = 2_000.0;
pub const MEV_PADDING_MAX_MS: f64 = 5_000.0;

/// Amplitude of the position-based variation.
const POSITION_SWING: f64 = 0.2;

/// Computes the stagger delay for one transaction and records it.
///
/// Step order is fixed: bypass, randomized re-draw, type weight, position
/// factor, MEV padding, clamp. With stealth disabled the base delay passes
/// through untouched and nothing is recorded.
pub fn compute_delay(
    rng: &mut dyn RandomSource,
    tracker: &MetricsTracker,
    base_delay_ms: u64,
    index: usize,
    total: usize,
    kind: TxKind,
    config: &StealthConfig,
) -> u64 {
    if !config.enabled {
        return base_delay_ms;
    }

    let mut delay = base_delay_ms as f64;

    if config.random_timing {
        let v = config.variation_percent / 100.0;
        let (lo, hi) = (delay * (1.0 - v), delay * (1.0 + v));
        // adversarial variation_percent can invert the window; normalize
        // instead of panicking, the final clamp stays authoritative
        delay = sample(rng, lo.min(hi), lo.max(hi), DistributionShape::Normal);
    }

    delay *= kind.delay_weight();

    // two full sine periods across the batch: successive delays form
    // neither an arithmetic nor a geometric progression
    let phase = 4.0 * PI * index as f64 / total.max(1) as f64;
    delay *= 1.0 + POSITION_SWING * phase.sin();

    if config.mev_protection && kind == TxKind::Buy {
        delay += sample(
            rng,
            MEV_PADDING_MIN_MS,
            MEV_PADDING_MAX_MS,
            DistributionShape::Uniform,
        );
    }

    let clamped = delay
        .clamp(MIN_STAGGER_DELAY_MS as f64, MAX_STAGGER_DELAY_MS as f64)
        .floor() as u64;

    debug!(
        "⏱️ delay {}_{}: base={}ms -> {}ms",
        kind.label(),
        index,
        base_delay_ms,
        clamped
    );

    tracker.record_timing(clamped, format!("{}_{}", kind.label(), index));
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stealth::sampler::SeededRng;

    fn disabled_config() -> StealthConfig {
        StealthConfig {
            enabled: false,
            ..StealthConfig::default()
        }
    }

    #[test]
    fn disabled_stealth_passes_base_through() {
        let mut rng = SeededRng::new(1);
        let tracker = MetricsTracker::new();
        let delay = compute_delay(
            &mut rng,
            &tracker,
            2_000,
            0,
            1,
            TxKind::Approve,
            &disabled_config(),
        );
        assert_eq!(delay, 2_000);
        // bypass appends no timing record
        assert_eq!(tracker.timing_samples(), 0);
    }

    #[test]
    fn disabled_stealth_skips_the_clamp() {
        let mut rng = SeededRng::new(2);
        let tracker = MetricsTracker::new();
        let delay = compute_delay(
            &mut rng,
            &tracker,
            100,
            0,
            1,
            TxKind::Buy,
            &disabled_config(),
        );
        assert_eq!(delay, 100);
    }

    #[test]
    fn delays_stay_in_bounds_for_any_inputs() {
        let mut rng = SeededRng::new(3);
        let tracker = MetricsTracker::new();
        let kinds = [TxKind::Buy, TxKind::Sell, TxKind::Approve, TxKind::Transfer];
        for base in [0u64, 500, 2_000, 10_000, 100_000] {
            for total in [1usize, 5, 20] {
                for index in 0..total {
                    for kind in kinds {
                        let delay = compute_delay(
                            &mut rng,
                            &tracker,
                            base,
                            index,
                            total,
                            kind,
                            &StealthConfig::default(),
                        );
                        assert!(
                            (MIN_STAGGER_DELAY_MS..=MAX_STAGGER_DELAY_MS).contains(&delay),
                            "delay {} out of bounds for base={} index={} kind={:?}",
                            delay,
                            base,
                            index,
                            kind
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn adversarial_variation_percent_does_not_panic() {
        let mut rng = SeededRng::new(4);
        let tracker = MetricsTracker::new();
        for variation in [-50.0, 250.0, 10_000.0] {
            let config = StealthConfig {
                variation_percent: variation,
                ..StealthConfig::default()
            };
            let delay =
                compute_delay(&mut rng, &tracker, 2_000, 1, 4, TxKind::Sell, &config);
            assert!((MIN_STAGGER_DELAY_MS..=MAX_STAGGER_DELAY_MS).contains(&delay));
        }
    }

    #[test]
    fn mev_padding_only_raises_buys() {
        let config = StealthConfig {
            random_timing: false,
            mev_protection: true,
            ..StealthConfig::default()
        };
        let tracker = MetricsTracker::new();

        // index 0 of 1: position factor is sin(0) = 0, so the unpadded
        // delay is exactly base * weight
        let mut rng = SeededRng::new(5);
        let buy = compute_delay(&mut rng, &tracker, 2_000, 0, 1, TxKind::Buy, &config);
        assert!(buy >= 4_000 && buy <= 7_000, "buy delay {} outside padded window", buy);

        let mut rng = SeededRng::new(5);
        let transfer = compute_delay(&mut rng, &tracker, 2_000, 0, 1, TxKind::Transfer, &config);
        assert_eq!(transfer, 1_800);
    }

    #[test]
    fn type_weights_order_fixed_delays() {
        let config = StealthConfig {
            random_timing: false,
            mev_protection: false,
            ..StealthConfig::default()
        };
        let tracker = MetricsTracker::new();
        let mut rng = SeededRng::new(6);
        let base = 2_000;
        let approve = compute_delay(&mut rng, &tracker, base, 0, 1, TxKind::Approve, &config);
        let transfer = compute_delay(&mut rng, &tracker, base, 0, 1, TxKind::Transfer, &config);
        let buy = compute_delay(&mut rng, &tracker, base, 0, 1, TxKind::Buy, &config);
        let sell = compute_delay(&mut rng, &tracker, base, 0, 1, TxKind::Sell, &config);
        assert_eq!((approve, transfer, buy, sell), (1_600, 1_800, 2_000, 2_400));
    }

    #[test]
    fn every_computed_delay_is_recorded_with_its_label() {
        let mut rng = SeededRng::new(7);
        let tracker = MetricsTracker::new();
        compute_delay(
            &mut rng,
            &tracker,
            2_000,
            3,
            5,
            TxKind::Buy,
            &StealthConfig::default(),
        );
        assert_eq!(tracker.timing_samples(), 1);
    }
}
