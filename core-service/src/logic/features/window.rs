//! Sensor records and value coercion
//!
//! A record is whatever the device pushed: a JSON object keyed by channel
//! (plus extras such as `ts`). Values are coerced lazily when features are
//! extracted; anything that does not read as a number is simply skipped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One raw sensor reading row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorRecord(Map<String, Value>);

impl SensorRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Set a raw value (builder style)
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Build from string cells (CSV rows)
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let map = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        Self(map)
    }

    /// Raw value for a key
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Channel reading coerced to f64, if present and numeric
    pub fn channel(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(coerce_value)
    }

    /// Timestamp used for ordering (`ts` key)
    pub fn ts(&self) -> Option<f64> {
        self.channel("ts")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for SensorRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Coerce a JSON value to f64.
///
/// Numbers pass through, numeric strings are parsed, booleans map to 1/0.
/// Null, NaN, non-numeric strings, arrays and objects yield `None`.
pub fn coerce_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    parsed.filter(|v| !v.is_nan())
}
