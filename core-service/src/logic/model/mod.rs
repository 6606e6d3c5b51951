//! Model Module - AI/ML Inference Engine
//!
//! Tách logic inference khỏi feature extraction và HTTP layer.
//!
//! - `isolation_forest` / `sensor`: unsupervised sensor window scorer
//! - `tfidf` / `logistic` / `text`: supervised social post classifier
//! - `artifact`: JSON artifacts + sha256 sidecar
//! - `store`: loads artifacts once, hands out read-only references
//! - `stats`: inference counters for status reporting

pub mod artifact;
pub mod isolation_forest;
pub mod logistic;
pub mod sensor;
pub mod stats;
pub mod store;
pub mod text;
pub mod tfidf;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export common types
pub use isolation_forest::{IsolationForest, IsolationForestConfig};
pub use logistic::{LogisticConfig, LogisticRegression};
pub use sensor::{score_window, SensorModel, SensorVerdict};
pub use stats::{InferenceStats, StatsSnapshot};
pub use store::ModelStore;
pub use text::{classify, classify_value, Explanation, TextPipeline, TextVerdict};
pub use tfidf::{SparseVector, TfidfConfig, TfidfVectorizer};

/// Artifact format version written by this crate
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Error)]
pub enum ModelError {
    /// No artifact available and none supplied
    #[error("model not loaded: {0}")]
    NotLoaded(String),

    #[error("artifact I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("training data is empty")]
    EmptyTrainingSet,
}

// ============================================================================
// MODEL TRAITS
// ============================================================================

/// Unsupervised anomaly model over a fixed-width numeric row
pub trait AnomalyModel: Send + Sync {
    /// Normality score: higher = more normal, negative = outlier
    fn decision_function(&self, x: &[f64]) -> f64;

    /// Binary outlier flag
    fn is_outlier(&self, x: &[f64]) -> bool {
        self.is_outlier_from(self.decision_function(x))
    }

    /// Outlier flag for an already computed decision value
    fn is_outlier_from(&self, decision: f64) -> bool {
        decision < 0.0
    }

    fn name(&self) -> &str;
}

/// Supervised binary text model over already-cleaned text
pub trait TextModel: Send + Sync {
    /// `[P(label=0), P(label=1)]`
    fn predict_proba(&self, cleaned: &str) -> [f64; 2];

    fn name(&self) -> &str;
}

// ============================================================================
// METADATA
// ============================================================================

/// Model metadata stored in every artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_type: String,
    pub format_version: u32,
    pub training_samples: usize,
    pub trained_at: DateTime<Utc>,
}

impl ModelMetadata {
    pub fn new(model_type: &str, training_samples: usize) -> Self {
        Self {
            model_type: model_type.to_string(),
            format_version: ARTIFACT_FORMAT_VERSION,
            training_samples,
            trained_at: Utc::now(),
        }
    }

    pub fn check_version(&self) -> Result<(), ModelError> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ModelError::InvalidArtifact(format!(
                "unsupported format version {} (expected {})",
                self.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }
        Ok(())
    }
}
