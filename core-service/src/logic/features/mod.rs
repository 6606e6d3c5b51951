//! Features Module - Sensor Feature Extraction
//!
//! Tách logic trích xuất features khỏi model.
//! Raw rows → fixed-width summary vector (mean / std / max per channel).

pub mod layout;
pub mod vector;
pub mod window;


// Re-export common types
pub use layout::{FeatureLayout, DEFAULT_CHANNELS, FEATURE_VERSION};
pub use vector::{extract, featurize_window, ChannelStats, FeatureVector};
pub use window::{coerce_value, SensorRecord};
