//! Core runtime configuration
//!
//! Đọc cấu hình từ environment (qua `constants`), dùng chung cho
//! orchestrator và trainer.

use std::path::{Path, PathBuf};

use crate::constants;

/// Core configuration
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Prediction API base URL
    pub api_url: String,

    /// Directory holding model artifacts
    pub model_dir: PathBuf,

    /// Realtime Database root URL (None = use demo CSV data)
    pub data_source_url: Option<String>,

    /// Data source path for sensor records
    pub sensor_path: String,

    /// Data source path for social posts
    pub posts_path: String,

    /// Max posts fetched per cycle
    pub fetch_limit: usize,

    /// Sensor rows per window
    pub window_size: usize,

    /// Seconds between orchestrator cycles
    pub poll_interval_secs: u64,

    /// Optional HTTP timeout for API calls
    pub request_timeout_secs: Option<u64>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            api_url: constants::DEFAULT_API_URL.to_string(),
            model_dir: PathBuf::from(constants::DEFAULT_MODEL_DIR),
            data_source_url: None,
            sensor_path: constants::DEFAULT_SENSOR_PATH.to_string(),
            posts_path: constants::DEFAULT_POSTS_PATH.to_string(),
            fetch_limit: constants::DEFAULT_FETCH_LIMIT,
            window_size: constants::DEFAULT_WINDOW_SIZE,
            poll_interval_secs: constants::DEFAULT_POLL_INTERVAL,
            request_timeout_secs: None,
        }
    }
}

impl CoreConfig {
    /// Load `.env` (if present), then read the environment
    pub fn load() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("Ignoring unreadable .env file: {}", e);
            }
        }
        Self::from_env()
    }

    /// Load a specific env file, then read the environment.
    /// Variables already set in the process win.
    pub fn load_from(path: &Path) -> Result<Self, dotenvy::Error> {
        dotenvy::from_path(path)?;
        Ok(Self::from_env())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            api_url: constants::get_api_url(),
            model_dir: constants::get_model_dir(),
            data_source_url: constants::get_data_source_url(),
            sensor_path: std::env::var("SENSOR_PATH")
                .unwrap_or_else(|_| constants::DEFAULT_SENSOR_PATH.to_string()),
            posts_path: std::env::var("POSTS_PATH")
                .unwrap_or_else(|_| constants::DEFAULT_POSTS_PATH.to_string()),
            fetch_limit: constants::get_fetch_limit(),
            window_size: constants::get_window_size(),
            poll_interval_secs: constants::get_poll_interval(),
            request_timeout_secs: constants::get_request_timeout(),
        }
    }

    /// Path of the sensor model artifact
    pub fn sensor_model_path(&self) -> PathBuf {
        self.model_dir.join(constants::SENSOR_MODEL_FILE)
    }

    /// Path of the text model artifact
    pub fn text_model_path(&self) -> PathBuf {
        self.model_dir.join(constants::TEXT_MODEL_FILE)
    }
}
