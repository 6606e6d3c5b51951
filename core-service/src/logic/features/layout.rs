//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the sensor feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add channel or statistic → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//!
//! The layout hash is stored inside the sensor model artifact so a model
//! trained against another layout is detected at load time.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// DEFAULT LAYOUT
// ============================================================================

/// Tracked sensor channels, in vector order
pub const DEFAULT_CHANNELS: &[&str] = &["vibration", "flame", "water"];

/// Per-channel statistics, in vector order
pub const CHANNEL_STATS: &[&str] = &["mean", "std", "max"];

/// Number of features derived per channel
pub const STATS_PER_CHANNEL: usize = 3;

/// Ordered list of tracked channels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLayout {
    channels: Vec<String>,
}

impl FeatureLayout {
    pub fn new<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            channels: channels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Total number of features (3 per channel)
    pub fn feature_count(&self) -> usize {
        self.channels.len() * STATS_PER_CHANNEL
    }

    /// Feature names in exact vector order: `<channel>_mean`, `<channel>_std`, `<channel>_max`
    pub fn feature_names(&self) -> Vec<String> {
        self.channels
            .iter()
            .flat_map(|c| CHANNEL_STATS.iter().map(move |s| feature_name(c, s)))
            .collect()
    }

    /// CRC32 of version + feature names
    pub fn hash(&self) -> u32 {
        let mut hasher = Hasher::new();
        hasher.update(&[FEATURE_VERSION]);
        for name in self.feature_names() {
            hasher.update(name.as_bytes());
            hasher.update(&[0]); // Separator
        }
        hasher.finalize()
    }
}

impl Default for FeatureLayout {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNELS.iter().copied())
    }
}

/// Build the derived feature name for a channel statistic
pub fn feature_name(channel: &str, stat: &str) -> String {
    format!("{}_{}", channel, stat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_feature_names() {
        let layout = FeatureLayout::default();
        assert_eq!(layout.feature_count(), 9);
        assert_eq!(
            layout.feature_names(),
            vec![
                "vibration_mean", "vibration_std", "vibration_max",
                "flame_mean", "flame_std", "flame_max",
                "water_mean", "water_std", "water_max",
            ]
        );
    }

    #[test]
    fn test_layout_hash_depends_on_order() {
        let a = FeatureLayout::new(["vibration", "water"]);
        let b = FeatureLayout::new(["water", "vibration"]);
        assert_eq!(a.hash(), FeatureLayout::new(["vibration", "water"]).hash());
        assert_ne!(a.hash(), b.hash());
    }
}
