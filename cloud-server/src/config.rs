//! Configuration module

use std::env;
use std::path::PathBuf;

use disaster_core::constants;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory holding model artifacts
    pub model_dir: PathBuf,

    /// Sensor model artifact (defaults to `<model_dir>/sensor_iforest.json`)
    pub sensor_model_path: PathBuf,

    /// Text model artifact (defaults to `<model_dir>/disaster_model.json`)
    pub text_model_path: PathBuf,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let model_dir = constants::get_model_dir();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),

            sensor_model_path: env::var("SENSOR_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| model_dir.join(constants::SENSOR_MODEL_FILE)),

            text_model_path: env::var("TEXT_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| model_dir.join(constants::TEXT_MODEL_FILE)),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            model_dir,
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
