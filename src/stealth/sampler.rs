//! Randomized distribution sampling for stagger-delay generation.
//!
//! All entropy flows through the injectable [`RandomSource`] trait so that
//! schedulers can run on a seeded generator for reproducible tests and
//! replayable scheduling decisions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Source of uniform random draws in `[0, 1)`.
pub trait RandomSource: Send {
    fn next_f64(&mut self) -> f64;
}

/// Default source backed by the thread-local generator.
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn next_f64(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Deterministic source for reproducible runs.
pub struct SeededRng {
    inner: StdRng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRng {
    fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionShape {
    Uniform,
    Normal,
    Exponential,
}

/// Draws one value from `[min, max]` under the given shape. Callers must
/// pass `min <= max`.
///
/// The normal shape maps a Box-Muller standard variate to mean
/// `(min+max)/2` and std dev `(max-min)/6`, then clamps back into range;
/// near the bounds the clamped result is not a true normal. The exponential
/// shape is deliberately unclamped: rare tail values above `max` are
/// acceptable, the delay calculator's final clamp is the hard bound.
pub fn sample(rng: &mut dyn RandomSource, min: f64, max: f64, shape: DistributionShape) -> f64 {
    match shape {
        DistributionShape::Uniform => min + rng.next_f64() * (max - min),
        DistributionShape::Normal => {
            // ln(0) guard: a zero draw would produce an infinite variate
            let u1 = rng.next_f64().max(f64::EPSILON);
            let u2 = rng.next_f64();
            let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
            let mean = (min + max) / 2.0;
            let std_dev = (max - min) / 6.0;
            (mean + z * std_dev).clamp(min, max)
        }
        DistributionShape::Exponential => {
            let rate = 2.0 / (max - min);
            min + (-(1.0 - rng.next_f64()).ln()) / rate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn uniform_stays_in_range() {
        let mut rng = SeededRng::new(7);
        for _ in 0..1_000 {
            let v = sample(&mut rng, 100.0, 500.0, DistributionShape::Uniform);
            assert!((100.0..500.0).contains(&v), "out of range: {}", v);
        }
    }

    #[test]
    fn normal_is_clamped_and_centered() {
        let mut rng = SeededRng::new(11);
        let (min, max) = (1_000.0, 3_000.0);
        let mut sum = 0.0;
        let n = 10_000;
        for _ in 0..n {
            let v = sample(&mut rng, min, max, DistributionShape::Normal);
            assert!(v >= min && v <= max);
            sum += v;
        }
        // mean should sit near the midpoint of the range
        assert_approx_eq!(sum / n as f64, 2_000.0, 30.0);
    }

    #[test]
    fn exponential_offsets_from_min_and_may_exceed_max() {
        let mut rng = SeededRng::new(13);
        let (min, max) = (0.0, 100.0);
        let mut sum = 0.0;
        let mut above_max = 0u32;
        let n = 10_000;
        for _ in 0..n {
            let v = sample(&mut rng, min, max, DistributionShape::Exponential);
            assert!(v >= min);
            if v > max {
                above_max += 1;
            }
            sum += v;
        }
        // mean of Exp(rate = 2/(max-min)) is (max-min)/2
        assert_approx_eq!(sum / n as f64, 50.0, 3.0);
        // the tail above max exists but is rare (P = e^-2)
        assert!(above_max > 0);
        assert!((above_max as f64) < n as f64 * 0.25);
    }

    #[test]
    fn degenerate_range_collapses_to_min() {
        let mut rng = SeededRng::new(17);
        for shape in [
            DistributionShape::Uniform,
            DistributionShape::Normal,
            DistributionShape::Exponential,
        ] {
            let v = sample(&mut rng, 42.0, 42.0, shape);
            assert_eq!(v, 42.0);
        }
    }

    #[test]
    fn seeded_source_is_reproducible() {
        let mut a = SeededRng::new(99);
        let mut b = SeededRng::new(99);
        for _ in 0..100 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }
}
