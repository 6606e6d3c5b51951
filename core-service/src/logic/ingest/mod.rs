//! Ingest Module - Sensor and social post data sources
//!
//! Degrade-to-empty policy: a failed fetch is logged (and counted) and
//! yields an empty batch. Callers never see fetch errors.

pub mod csv_source;
pub mod firebase;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::logic::config::CoreConfig;
use crate::logic::features::SensorRecord;

pub use csv_source::{read_labelled_posts, read_sensor_rows, CsvSource, LabelledPost};
pub use firebase::FirebaseSource;

// ============================================================================
// TYPES
// ============================================================================

/// A social media post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPost {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<f64>,
}

impl SocialPost {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ts: None }
    }

    /// Read from a raw record; records without string `text` are skipped
    pub fn from_value(value: &Value) -> Option<Self> {
        let text = value.get("text")?.as_str()?.to_string();
        let ts = value.get("ts").and_then(crate::logic::features::coerce_value);
        Some(Self { text, ts })
    }
}

impl AsRef<str> for SocialPost {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected payload: {0}")]
    Payload(String),
}

// ============================================================================
// DATA SOURCE
// ============================================================================

/// Where the orchestrator reads recent data from
pub enum DataSource {
    Firebase(FirebaseSource),
    Csv(CsvSource),
}

impl DataSource {
    /// Realtime Database when configured, demo CSVs otherwise
    pub fn from_config(config: &CoreConfig) -> Self {
        match &config.data_source_url {
            Some(url) => DataSource::Firebase(FirebaseSource::new(
                url,
                &config.sensor_path,
                &config.posts_path,
                config.request_timeout_secs,
            )),
            None => DataSource::Csv(CsvSource::demo()),
        }
    }

    /// Most recent `limit` sensor records, oldest first
    pub async fn fetch_sensor_data(&self, limit: usize) -> Vec<SensorRecord> {
        match self {
            DataSource::Firebase(source) => source.fetch_sensor_data(limit).await,
            DataSource::Csv(source) => source.fetch_sensor_data(limit),
        }
    }

    /// Most recent `limit` posts, oldest first
    pub async fn fetch_posts(&self, limit: usize) -> Vec<SocialPost> {
        match self {
            DataSource::Firebase(source) => source.fetch_posts(limit).await,
            DataSource::Csv(source) => source.fetch_posts(limit),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataSource::Firebase(_) => "firebase",
            DataSource::Csv(_) => "csv",
        }
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Failed-fetch counter shared by sources
#[derive(Debug, Default)]
pub struct FetchFailures(AtomicU64);

impl FetchFailures {
    pub fn record(&self, source: &str, path: &str, error: &IngestError) -> u64 {
        let total = self.0.fetch_add(1, Ordering::Relaxed) + 1;
        log::warn!(
            "fetch failed; returning empty batch source={} path={} failures={} error={}",
            source,
            path,
            total,
            error
        );
        total
    }

    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Order by `ts` ascending (untimestamped first, stable) and keep the last `limit`
pub fn latest<T>(mut items: Vec<T>, limit: usize, ts: impl Fn(&T) -> Option<f64>) -> Vec<T> {
    items.sort_by(|a, b| {
        let (a, b) = (ts(a).unwrap_or(f64::NEG_INFINITY), ts(b).unwrap_or(f64::NEG_INFINITY));
        a.total_cmp(&b)
    });
    let skip = items.len().saturating_sub(limit);
    items.into_iter().skip(skip).collect()
}
