//! Model store - load once, read-only afterwards
//!
//! The only place that decides "load or reuse". Scoring functions always
//! receive a model explicitly.

use std::path::Path;

use super::artifact::load_artifact;
use super::sensor::SensorModel;
use super::text::TextPipeline;
use super::ModelError;

#[derive(Debug, Default)]
pub struct ModelStore {
    sensor: Option<SensorModel>,
    text: Option<TextPipeline>,
}

impl ModelStore {
    /// Build from already-constructed models (tests, embedding)
    pub fn from_models(sensor: Option<SensorModel>, text: Option<TextPipeline>) -> Self {
        Self { sensor, text }
    }

    /// Load both artifacts.
    ///
    /// A missing file leaves that model unavailable (logged). Corrupt or
    /// tampered artifacts are errors.
    pub fn load(sensor_path: &Path, text_path: &Path) -> Result<Self, ModelError> {
        let sensor = load_optional::<SensorModel>(sensor_path)?;
        if let Some(model) = &sensor {
            model.validate()?;
        }

        let text = load_optional::<TextPipeline>(text_path)?;
        if let Some(model) = &text {
            model.validate()?;
        }

        Ok(Self { sensor, text })
    }

    pub fn sensor(&self) -> Result<&SensorModel, ModelError> {
        self.sensor
            .as_ref()
            .ok_or_else(|| ModelError::NotLoaded("sensor model".to_string()))
    }

    pub fn text(&self) -> Result<&TextPipeline, ModelError> {
        self.text
            .as_ref()
            .ok_or_else(|| ModelError::NotLoaded("text model".to_string()))
    }

    pub fn has_sensor(&self) -> bool {
        self.sensor.is_some()
    }

    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }
}

fn load_optional<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, ModelError> {
    match load_artifact::<T>(path) {
        Ok(model) => Ok(Some(model)),
        Err(ModelError::NotLoaded(reason)) => {
            log::warn!("{} - continuing without it", reason);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_artifacts_leave_store_empty() {
        let dir = tempdir().unwrap();
        let store = ModelStore::load(&dir.path().join("s.json"), &dir.path().join("t.json")).unwrap();

        assert!(!store.has_sensor());
        assert!(!store.has_text());
        assert!(matches!(store.sensor(), Err(ModelError::NotLoaded(_))));
        assert!(matches!(store.text(), Err(ModelError::NotLoaded(_))));
    }

    #[test]
    fn test_corrupt_artifact_is_error() {
        let dir = tempdir().unwrap();
        let sensor_path = dir.path().join("s.json");
        std::fs::write(&sensor_path, "{not json").unwrap();

        let result = ModelStore::load(&sensor_path, &dir.path().join("t.json"));
        assert!(matches!(result, Err(ModelError::Parse(_))));
    }
}
