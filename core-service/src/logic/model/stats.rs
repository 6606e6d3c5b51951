//! Inference counters (lock-free)

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Count + cumulative latency for one model
#[derive(Debug, Default)]
pub struct InferenceStats {
    count: AtomicU64,
    latency_sum_us: AtomicU64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub inference_count: u64,
    pub avg_latency_ms: f64,
}

impl InferenceStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, elapsed: Duration) {
        self.latency_sum_us
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let count = self.count.load(Ordering::Relaxed);
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f64 / count as f64) / 1000.0 } else { 0.0 };

        StatsSnapshot {
            inference_count: count,
            avg_latency_ms: avg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_latency() {
        let stats = InferenceStats::new();
        assert_eq!(stats.snapshot().avg_latency_ms, 0.0);

        stats.record(Duration::from_millis(2));
        stats.record(Duration::from_millis(4));

        let snap = stats.snapshot();
        assert_eq!(snap.inference_count, 2);
        assert!((snap.avg_latency_ms - 3.0).abs() < 1e-9);
    }
}
