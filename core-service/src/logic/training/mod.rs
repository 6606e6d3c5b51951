//! Training Module - Offline model fitting
//!
//! Huấn luyện sensor model (isolation forest) và text model
//! (TF-IDF + logistic regression) từ CSV, lưu artifact JSON.

pub mod metrics;
pub mod sensor;
pub mod text;

use thiserror::Error;

use crate::logic::ingest::IngestError;
use crate::logic::model::ModelError;

pub use metrics::{ClassMetrics, ClassificationReport, ConfusionMatrix};
pub use sensor::{fit_sensor_model, train_sensor_model, SensorTrainingReport};
pub use text::{fit_text_model, stratified_split, train_text_model, TextTrainingReport};

/// Default RNG seed for training
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("failed to read training data: {0}")]
    Input(#[from] IngestError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("not enough training data: {0}")]
    NoData(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
