//! Fusion Rules & Thresholds
//!
//! Chỉ constants và config, không chứa logic decide.

use serde::{Deserialize, Serialize};

/// Sensor score at or above this counts as "elevated"
pub const SENSOR_SCORE_THRESHOLD: f64 = 0.6;

/// Disaster-labelled posts needed to corroborate an elevated sensor
pub const MIN_TWEET_ALERTS: usize = 2;

/// Thresholds for fusion (configurable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionThresholds {
    pub sensor_score_min: f64,
    pub tweet_alerts_min: usize,
}

impl Default for FusionThresholds {
    fn default() -> Self {
        Self {
            sensor_score_min: SENSOR_SCORE_THRESHOLD,
            tweet_alerts_min: MIN_TWEET_ALERTS,
        }
    }
}
