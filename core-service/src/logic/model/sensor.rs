//! Sensor anomaly scorer
//!
//! Explicit contract: features + model + column order in, verdict out.
//! Loading (or failing with `NotLoaded`) is the caller's job, see `store`.

use serde::{Deserialize, Serialize};

use super::isolation_forest::IsolationForest;
use super::{AnomalyModel, ModelError, ModelMetadata};
use crate::logic::features::{FeatureLayout, FeatureVector};

/// Sensor window verdict
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorVerdict {
    pub is_anomaly: bool,
    /// Higher = more anomalous, whatever the model's own sign convention
    pub score: f64,
}

/// Score one feature vector.
///
/// The vector is reindexed to `columns` (missing → 0.0, extras dropped)
/// before the model sees it.
pub fn score_window(features: &FeatureVector, model: &dyn AnomalyModel, columns: &[String]) -> SensorVerdict {
    let row = features.reindex(columns);
    let decision = model.decision_function(&row);

    SensorVerdict {
        is_anomaly: model.is_outlier_from(decision),
        score: -decision,
    }
}

// ============================================================================
// ARTIFACT
// ============================================================================

/// Trained sensor model + the column order it was trained on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorModel {
    pub metadata: ModelMetadata,
    pub columns: Vec<String>,
    pub layout_hash: u32,
    pub forest: IsolationForest,
}

impl SensorModel {
    pub fn new(forest: IsolationForest, layout: &FeatureLayout, training_samples: usize) -> Self {
        Self {
            metadata: ModelMetadata::new("isolation_forest", training_samples),
            columns: layout.feature_names(),
            layout_hash: layout.hash(),
            forest,
        }
    }

    pub fn score(&self, features: &FeatureVector) -> SensorVerdict {
        score_window(features, &self.forest, &self.columns)
    }

    /// Check a freshly loaded artifact
    pub fn validate(&self) -> Result<(), ModelError> {
        self.metadata.check_version()?;
        self.forest.validate()?;

        if self.columns.len() != self.forest.n_features() {
            return Err(ModelError::InvalidArtifact(format!(
                "{} columns but forest expects {} features",
                self.columns.len(),
                self.forest.n_features()
            )));
        }

        let runtime = FeatureLayout::default().hash();
        if self.layout_hash != runtime {
            // Reindexing still lines the columns up; just make it visible
            log::warn!(
                "Sensor model layout {:08x} differs from runtime layout {:08x}",
                self.layout_hash,
                runtime
            );
        }

        Ok(())
    }
}
