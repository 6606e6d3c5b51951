//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change default API server or model locations, only edit this file.

/// Default prediction API URL
///
/// This is the fallback URL when no environment variable is set.
/// For development: http://localhost:5000
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Default model directory (relative to the working directory)
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Sensor model artifact file name
pub const SENSOR_MODEL_FILE: &str = "sensor_iforest.json";

/// Text model artifact file name
pub const TEXT_MODEL_FILE: &str = "disaster_model.json";

/// Default data source path for sensor records
pub const DEFAULT_SENSOR_PATH: &str = "sensors";

/// Default data source path for social posts
pub const DEFAULT_POSTS_PATH: &str = "tweets";

/// Demo sensor CSV (used when no data source URL is configured)
pub const DEMO_SENSOR_CSV: &str = "demo_data/sensor_demo.csv";

/// Demo social posts CSV
pub const DEMO_POSTS_CSV: &str = "demo_data/tweets_demo.csv";

/// Default number of records fetched per cycle
pub const DEFAULT_FETCH_LIMIT: usize = 100;

/// Default sensor window size (rows per window)
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Default orchestrator poll interval (seconds)
pub const DEFAULT_POLL_INTERVAL: u64 = 30;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Disaster AI";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get prediction API URL from environment or use default
pub fn get_api_url() -> String {
    std::env::var("API_URL")
        .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Get model directory from environment or use default
///
/// An empty `MODEL_DIR` selects the per-user data directory.
pub fn get_model_dir() -> std::path::PathBuf {
    match std::env::var("MODEL_DIR") {
        Ok(dir) if dir.trim().is_empty() => dirs::data_local_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("disaster-ai")
            .join("models"),
        Ok(dir) => std::path::PathBuf::from(dir),
        Err(_) => std::path::PathBuf::from(DEFAULT_MODEL_DIR),
    }
}

/// Get data source base URL (Realtime Database root), if configured
pub fn get_data_source_url() -> Option<String> {
    std::env::var("DATA_SOURCE_URL")
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Get fetch limit from environment or use default
pub fn get_fetch_limit() -> usize {
    std::env::var("FETCH_LIMIT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FETCH_LIMIT)
}

/// Get window size from environment or use default
pub fn get_window_size() -> usize {
    std::env::var("WINDOW_SIZE")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|n: &usize| *n > 0)
        .unwrap_or(DEFAULT_WINDOW_SIZE)
}

/// Get poll interval from environment or use default
pub fn get_poll_interval() -> u64 {
    std::env::var("POLL_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_POLL_INTERVAL)
}

/// Get request timeout; unset means requests block until the transport returns
pub fn get_request_timeout() -> Option<u64> {
    std::env::var("REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
}
