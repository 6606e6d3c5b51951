//! Prediction models

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use disaster_core::logic::features::SensorRecord;
use disaster_core::logic::model::{SensorVerdict, TextVerdict};

// ============================================================================
// REQUESTS
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TextPredictRequest {
    /// Usually a string; other JSON values are accepted and classified as empty text
    #[serde(default)]
    pub text: Value,
}

impl TextPredictRequest {
    /// Null, false, 0, "" and empty containers count as "no text"
    pub fn has_text(&self) -> bool {
        match &self.text {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SensorPredictRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "window required"))]
    pub window: Vec<SensorRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ExplainQuery {
    pub n: Option<usize>,
}

// ============================================================================
// RESPONSES
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct TextPredictResponse {
    pub label: u8,
    pub confidence: f64,
}

impl From<TextVerdict> for TextPredictResponse {
    fn from(v: TextVerdict) -> Self {
        Self { label: v.label, confidence: v.confidence }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SensorPredictResponse {
    pub alert: bool,
    pub score: f64,
}

impl From<SensorVerdict> for SensorPredictResponse {
    fn from(v: SensorVerdict) -> Self {
        Self { alert: v.is_anomaly, score: v.score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text_request(value: Value) -> TextPredictRequest {
        serde_json::from_value(json!({ "text": value })).unwrap()
    }

    #[test]
    fn test_text_truthiness() {
        assert!(text_request(json!("flood")).has_text());
        assert!(text_request(json!(" ")).has_text());
        assert!(text_request(json!(12)).has_text());
        assert!(!text_request(json!("")).has_text());
        assert!(!text_request(json!(0)).has_text());
        assert!(!text_request(json!(false)).has_text());
        assert!(!text_request(json!([])).has_text());

        let missing: TextPredictRequest = serde_json::from_value(json!({})).unwrap();
        assert!(!missing.has_text());
    }

    #[test]
    fn test_empty_window_fails_validation() {
        let request: SensorPredictRequest = serde_json::from_value(json!({ "window": [] })).unwrap();
        assert!(request.validate().is_err());

        let missing: SensorPredictRequest = serde_json::from_value(json!({})).unwrap();
        assert!(missing.validate().is_err());

        let ok: SensorPredictRequest =
            serde_json::from_value(json!({ "window": [{"vibration": 10}] })).unwrap();
        assert!(ok.validate().is_ok());
    }
}
