//! Feature Vector - Core data structure for the sensor model input
//!
//! **Fixed-width vector with layout metadata**
//!
//! Every window produces exactly `layout.feature_count()` values, even an
//! empty one. The scorer relies on this.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::layout::FeatureLayout;
use super::window::SensorRecord;

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Named feature values in layout order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// CRC32 hash of the layout that produced this vector
    pub layout_hash: u32,
    /// Feature names, same order as `values`
    pub names: Vec<String>,
    /// Feature values
    pub values: Vec<f64>,
}

impl FeatureVector {
    /// Create a zero-filled vector for a layout
    pub fn zeros(layout: &FeatureLayout) -> Self {
        Self {
            layout_hash: layout.hash(),
            names: layout.feature_names(),
            values: vec![0.0; layout.feature_count()],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get feature by name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    /// Values in the given column order.
    ///
    /// Unknown columns are filled with 0.0, features not listed are dropped.
    pub fn reindex(&self, columns: &[String]) -> Vec<f64> {
        columns
            .iter()
            .map(|c| self.get(c).unwrap_or(0.0))
            .collect()
    }

    /// Name → value map (for logging / JSON output)
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.names
            .iter()
            .cloned()
            .zip(self.values.iter().copied())
            .collect()
    }
}

// ============================================================================
// CHANNEL STATISTICS
// ============================================================================

/// Summary statistics of one channel inside a window
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelStats {
    pub mean: f64,
    pub std: f64,
    pub max: f64,
}

impl ChannelStats {
    /// Population statistics (ddof = 0). Empty input → all zeros.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            mean,
            std: variance.sqrt(),
            max,
        }
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Summarise a window into a fixed-width feature vector.
///
/// Missing or entirely non-numeric channels are zero-filled; this never fails.
pub fn extract(window: &[SensorRecord], layout: &FeatureLayout) -> FeatureVector {
    let mut vector = FeatureVector::zeros(layout);

    for (i, channel) in layout.channels().iter().enumerate() {
        let values: Vec<f64> = window
            .iter()
            .filter_map(|record| record.channel(channel))
            .collect();

        let stats = ChannelStats::from_values(&values);
        let base = i * super::layout::STATS_PER_CHANNEL;
        vector.values[base] = stats.mean;
        vector.values[base + 1] = stats.std;
        vector.values[base + 2] = stats.max;
    }

    vector
}

/// Extract with the default channel layout
pub fn featurize_window(window: &[SensorRecord]) -> FeatureVector {
    extract(window, &FeatureLayout::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_stats_population_std() {
        let stats = ChannelStats::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert!((stats.std - 2.0).abs() < 1e-12);
        assert_eq!(stats.max, 9.0);
    }

    #[test]
    fn test_reindex_fills_and_drops() {
        let mut vector = FeatureVector::zeros(&FeatureLayout::new(["water"]));
        vector.values = vec![1.0, 2.0, 3.0];

        let columns = vec![
            "water_max".to_string(),
            "smoke_mean".to_string(),
            "water_mean".to_string(),
        ];
        assert_eq!(vector.reindex(&columns), vec![3.0, 0.0, 1.0]);
    }
}
