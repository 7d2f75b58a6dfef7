//! Rolling-window effectiveness tracking for scheduling decisions.
//!
//! Every computed delay and every threat evaluation lands in one of two
//! bounded histories; effectiveness statistics are recomputed on demand
//! from the most recent slice of each, never persisted.

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;

pub const TIMING_HISTORY_CAP: usize = 1_000;
pub const THREAT_HISTORY_CAP: usize = 500;
pub const TIMING_ANALYSIS_WINDOW: usize = 100;
pub const THREAT_ANALYSIS_WINDOW: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct TimingRecord {
    pub timestamp: DateTime<Utc>,
    pub delay_ms: u64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThreatEvent {
    pub timestamp: DateTime<Utc>,
    /// Comma-joined threat labels, empty when nothing triggered.
    pub threat_types: String,
    pub detected: bool,
    pub prevented: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionRisk {
    Low,
    Medium,
    High,
}

/// Derived effectiveness snapshot. Recomputed per call; identical inputs
/// yield identical snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StealthMetrics {
    pub average_delay_ms: f64,
    pub delay_variation_ms: f64,
    pub mev_evaded: usize,
    pub frontrunning_attempts: usize,
    pub success_rate: f64,
    pub detection_risk: DetectionRisk,
}

/// Owns the bounded histories. Both are Mutex-guarded so concurrent bundle
/// builds cannot interleave trims and corrupt the caps.
pub struct MetricsTracker {
    timing_history: Mutex<VecDeque<TimingRecord>>,
    threat_history: Mutex<VecDeque<ThreatEvent>>,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self {
            timing_history: Mutex::new(VecDeque::with_capacity(TIMING_HISTORY_CAP)),
            threat_history: Mutex::new(VecDeque::with_capacity(THREAT_HISTORY_CAP)),
        }
    }

    pub fn record_timing(&self, delay_ms: u64, label: String) {
        let mut history = self.timing_history.lock().unwrap();
        history.push_back(TimingRecord {
            timestamp: Utc::now(),
            delay_ms,
            label,
        });
        while history.len() > TIMING_HISTORY_CAP {
            history.pop_front();
        }
    }

    pub fn record_threat(&self, threat_types: String, detected: bool, prevented: bool) {
        let mut history = self.threat_history.lock().unwrap();
        history.push_back(ThreatEvent {
            timestamp: Utc::now(),
            threat_types,
            detected,
            prevented,
        });
        while history.len() > THREAT_HISTORY_CAP {
            history.pop_front();
        }
    }

    pub fn timing_samples(&self) -> usize {
        self.timing_history.lock().unwrap().len()
    }

    pub fn threat_samples(&self) -> usize {
        self.threat_history.lock().unwrap().len()
    }

    /// Scores scheduling effectiveness over the most recent
    /// [`TIMING_ANALYSIS_WINDOW`] timings and [`THREAT_ANALYSIS_WINDOW`]
    /// threat events. `random_timing` feeds the detection-risk heuristic:
    /// low timing variance is itself a fingerprint.
    pub fn analyze(&self, random_timing: bool) -> StealthMetrics {
        let (average_delay_ms, delay_variation_ms) = {
            let history = self.timing_history.lock().unwrap();
            let recent: Vec<f64> = history
                .iter()
                .rev()
                .take(TIMING_ANALYSIS_WINDOW)
                .map(|r| r.delay_ms as f64)
                .collect();
            if recent.is_empty() {
                (0.0, 0.0)
            } else {
                let n = recent.len() as f64;
                let mean = recent.iter().sum::<f64>() / n;
                let variance = recent.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
                (mean, variance.sqrt())
            }
        };

        let (mev_evaded, frontrunning_attempts, total_events) = {
            let history = self.threat_history.lock().unwrap();
            let recent: Vec<&ThreatEvent> =
                history.iter().rev().take(THREAT_ANALYSIS_WINDOW).collect();
            let evaded = recent.iter().filter(|e| e.prevented).count();
            let frontruns = recent
                .iter()
                .filter(|e| e.threat_types.contains("frontrunning"))
                .count();
            (evaded, frontruns, recent.len())
        };

        // no events recorded counts as vacuous success
        let success_rate = if total_events == 0 {
            100.0
        } else {
            mev_evaded as f64 / total_events as f64 * 100.0
        };

        let detection_risk = if delay_variation_ms > 0.5 * average_delay_ms && random_timing {
            DetectionRisk::Low
        } else if delay_variation_ms > 0.2 * average_delay_ms {
            DetectionRisk::Medium
        } else {
            DetectionRisk::High
        };

        debug!(
            "📊 effectiveness: avg={:.0}ms sd={:.0}ms evaded={} frontruns={} success={:.1}%",
            average_delay_ms, delay_variation_ms, mev_evaded, frontrunning_attempts, success_rate
        );

        StealthMetrics {
            average_delay_ms,
            delay_variation_ms,
            mev_evaded,
            frontrunning_attempts,
            success_rate,
            detection_risk,
        }
    }

    pub fn reset(&self) {
        self.timing_history.lock().unwrap().clear();
        self.threat_history.lock().unwrap().clear();
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}
