//! Realtime Database REST source
//!
//! `GET {base}/{path}.json?orderBy="ts"&limitToLast=N`

use std::time::Duration;

use serde_json::Value;

use super::{latest, FetchFailures, IngestError, SocialPost};
use crate::logic::features::SensorRecord;

pub struct FirebaseSource {
    base_url: String,
    sensor_path: String,
    posts_path: String,
    http_client: reqwest::Client,
    failures: FetchFailures,
}

impl FirebaseSource {
    pub fn new(base_url: &str, sensor_path: &str, posts_path: &str, timeout_secs: Option<u64>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().unwrap_or_else(|e| {
            log::warn!("HTTP client config rejected ({}), using defaults", e);
            reqwest::Client::new()
        });

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            sensor_path: sensor_path.trim_matches('/').to_string(),
            posts_path: posts_path.trim_matches('/').to_string(),
            http_client,
            failures: FetchFailures::default(),
        }
    }

    pub async fn fetch_sensor_data(&self, limit: usize) -> Vec<SensorRecord> {
        match self.fetch_records(&self.sensor_path, limit).await {
            Ok(records) => {
                let records = records
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::Object(map) => Some(SensorRecord::from(map)),
                        _ => None,
                    })
                    .collect();
                latest(records, limit, SensorRecord::ts)
            }
            Err(e) => {
                self.failures.record("firebase", &self.sensor_path, &e);
                Vec::new()
            }
        }
    }

    pub async fn fetch_posts(&self, limit: usize) -> Vec<SocialPost> {
        match self.fetch_records(&self.posts_path, limit).await {
            Ok(records) => {
                let posts = records.iter().filter_map(SocialPost::from_value).collect();
                latest(posts, limit, |p: &SocialPost| p.ts)
            }
            Err(e) => {
                self.failures.record("firebase", &self.posts_path, &e);
                Vec::new()
            }
        }
    }

    pub fn failure_count(&self) -> u64 {
        self.failures.count()
    }

    async fn fetch_records(&self, path: &str, limit: usize) -> Result<Vec<Value>, IngestError> {
        let url = format!("{}/{}.json", self.base_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("orderBy", "\"ts\"".to_string()), ("limitToLast", limit.to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IngestError::Status(response.status().as_u16()));
        }

        let body: Value = response.json().await?;
        records_from_payload(body)
    }
}

/// Node payload → list of child records
///
/// Push-id keyed objects come back as a map, integer keys as an array
/// (with nulls for gaps), and an empty node as `null`.
pub fn records_from_payload(body: Value) -> Result<Vec<Value>, IngestError> {
    match body {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => Ok(map.into_iter().map(|(_, v)| v).collect()),
        Value::Array(items) => Ok(items.into_iter().filter(|v| !v.is_null()).collect()),
        other => Err(IngestError::Payload(format!("expected object or array, got {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_shapes() {
        assert!(records_from_payload(json!(null)).unwrap().is_empty());

        let keyed = records_from_payload(json!({"-Nabc": {"ts": 2}, "-Nabd": {"ts": 1}})).unwrap();
        assert_eq!(keyed.len(), 2);

        let indexed = records_from_payload(json!([null, {"ts": 1}, {"ts": 2}])).unwrap();
        assert_eq!(indexed.len(), 2);

        assert!(records_from_payload(json!("oops")).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_host_degrades_to_empty() {
        // Nothing listens on port 9 (discard) on loopback in CI
        let source = FirebaseSource::new("http://127.0.0.1:9", "sensors", "tweets", Some(2));

        assert!(source.fetch_sensor_data(10).await.is_empty());
        assert!(source.fetch_posts(10).await.is_empty());
        assert_eq!(source.failure_count(), 2);
    }
}
