//! Prediction API Client
//!
//! HTTP client for the disaster prediction server.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::config::CoreConfig;
use crate::logic::features::SensorRecord;
use crate::logic::model::{SensorVerdict, TextVerdict};

// Request/Response types

#[derive(Debug, Serialize)]
pub struct SensorRequest<'a> {
    pub window: &'a [SensorRecord],
}

#[derive(Debug, Serialize)]
pub struct TextRequest<'a> {
    pub text: &'a str,
}

/// Lenient: every field may be missing (error payloads included)
#[derive(Debug, Default, Deserialize)]
pub struct SensorResponse {
    #[serde(default)]
    pub alert: Option<bool>,
    #[serde(default)]
    pub score: Option<f64>,
}

impl From<SensorResponse> for SensorVerdict {
    fn from(r: SensorResponse) -> Self {
        SensorVerdict {
            is_anomaly: r.alert.unwrap_or(false),
            score: r.score.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TextResponse {
    #[serde(default)]
    pub label: Option<u8>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl From<TextResponse> for TextVerdict {
    fn from(r: TextResponse) -> Self {
        TextVerdict {
            label: r.label.unwrap_or(0),
            confidence: r.confidence.unwrap_or(0.0),
        }
    }
}

/// Prediction client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Prediction API client
pub struct PredictClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl PredictClient {
    /// Create a client; no timeout unless one is given
    pub fn new(base_url: &str, timeout_secs: Option<u64>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder
            .build()
            .map_err(|e| ClientError::NetworkError(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn from_config(config: &CoreConfig) -> Result<Self, ClientError> {
        Self::new(&config.api_url, config.request_timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Score one sensor window
    pub async fn predict_sensor(&self, window: &[SensorRecord]) -> Result<SensorVerdict, ClientError> {
        let response: SensorResponse = self.post("/predict/sensor", &SensorRequest { window }).await?;
        Ok(response.into())
    }

    /// Classify one post
    pub async fn predict_text(&self, text: &str) -> Result<TextVerdict, ClientError> {
        let response: TextResponse = self.post("/predict/text", &TextRequest { text }).await?;
        Ok(response.into())
    }

    /// POST JSON and decode the body whatever the status.
    ///
    /// Error payloads (`{"error", "status"}`) decode to all-default
    /// responses; the status is logged.
    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("{} returned {}; using response defaults", path, status.as_u16());
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let sensor: SensorResponse = serde_json::from_str(r#"{"error": "bad", "status": 400}"#).unwrap();
        let verdict: SensorVerdict = sensor.into();
        assert!(!verdict.is_anomaly);
        assert_eq!(verdict.score, 0.0);

        let text: TextResponse = serde_json::from_str(r#"{"label": null}"#).unwrap();
        let verdict: TextVerdict = text.into();
        assert_eq!(verdict.label, 0);
        assert_eq!(verdict.confidence, 0.0);
    }

    #[test]
    fn test_full_response() {
        let text: TextResponse = serde_json::from_str(r#"{"label": 1, "confidence": 0.93}"#).unwrap();
        let verdict: TextVerdict = text.into();
        assert_eq!(verdict, TextVerdict { label: 1, confidence: 0.93 });
    }

    #[test]
    fn test_base_url_trimmed() {
        let client = PredictClient::new("http://localhost:5000/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_error() {
        let client = PredictClient::new("http://127.0.0.1:9", Some(2)).unwrap();
        let result = client.predict_text("flood").await;
        assert!(matches!(result, Err(ClientError::NetworkError(_))));
    }
}
