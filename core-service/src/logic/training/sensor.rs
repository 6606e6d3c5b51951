//! Sensor model training: CSV rows → windows → isolation forest

use std::path::Path;

use ndarray::Array2;

use super::TrainingError;
use crate::logic::features::{extract, FeatureLayout, SensorRecord};
use crate::logic::ingest::read_sensor_rows;
use crate::logic::model::artifact::save_artifact;
use crate::logic::model::{AnomalyModel, IsolationForest, IsolationForestConfig, SensorModel};

#[derive(Debug)]
pub struct SensorTrainingReport {
    pub model: SensorModel,
    pub windows: usize,
    /// Training windows the fitted model flags as outliers
    pub flagged: usize,
}

/// Fit on in-memory rows, chunked in file order (last window may be short)
pub fn fit_sensor_model(
    rows: &[SensorRecord],
    window_size: usize,
    config: IsolationForestConfig,
) -> Result<SensorTrainingReport, TrainingError> {
    if window_size == 0 {
        return Err(TrainingError::InvalidParameter("window_size must be > 0".to_string()));
    }
    if rows.is_empty() {
        return Err(TrainingError::NoData("no sensor rows".to_string()));
    }

    let layout = FeatureLayout::default();
    let features: Vec<_> = rows.chunks(window_size).map(|w| extract(w, &layout)).collect();
    let n_windows = features.len();
    let n_features = layout.feature_count();

    let flat: Vec<f64> = features.iter().flat_map(|f| f.values.iter().copied()).collect();
    let data = Array2::from_shape_vec((n_windows, n_features), flat)
        .map_err(|e| TrainingError::InvalidParameter(e.to_string()))?;

    let forest = IsolationForest::fit(&data, config)?;
    let flagged = data
        .rows()
        .into_iter()
        .filter(|row| forest.is_outlier(&row.to_vec()))
        .count();

    log::info!(
        "Sensor model trained on {} rows ({} windows of {}), {} flagged",
        rows.len(),
        n_windows,
        window_size,
        flagged
    );

    Ok(SensorTrainingReport {
        model: SensorModel::new(forest, &layout, n_windows),
        windows: n_windows,
        flagged,
    })
}

/// Read a sensor CSV, fit, and save the artifact to `out`
pub fn train_sensor_model(
    csv_path: &Path,
    out: &Path,
    window_size: usize,
    config: IsolationForestConfig,
) -> Result<SensorTrainingReport, TrainingError> {
    let rows = read_sensor_rows(csv_path)?;
    let report = fit_sensor_model(&rows, window_size, config)?;
    save_artifact(out, &report.model)?;
    log::info!("Saved sensor model: {}", out.display());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::featurize_window;
    use crate::logic::model::ModelStore;
    use std::io::Write;
    use tempfile::TempDir;

    fn calm_row(i: usize) -> SensorRecord {
        let t = i as f64;
        SensorRecord::new()
            .with("vibration", 10.0 + (t * 0.37).sin() * 2.0)
            .with("flame", ((t * 0.11).cos() * 0.2).abs())
            .with("water", 30.0 + (t * 0.23).sin() * 2.0)
    }

    fn calm_rows(n: usize) -> Vec<SensorRecord> {
        (0..n).map(calm_row).collect()
    }

    #[test]
    fn test_fit_counts_windows() {
        let report = fit_sensor_model(&calm_rows(95), 10, IsolationForestConfig::default()).unwrap();
        assert_eq!(report.windows, 10);
        assert_eq!(report.model.columns.len(), 9);
        assert!(report.flagged <= report.windows);
    }

    #[test]
    fn test_spike_window_scores_higher() {
        let report = fit_sensor_model(&calm_rows(400), 10, IsolationForestConfig::default()).unwrap();

        let middle: Vec<SensorRecord> = (200..210).map(calm_row).collect();
        let calm = report.model.score(&featurize_window(&middle));
        let spike: Vec<SensorRecord> = (0..10)
            .map(|_| SensorRecord::new().with("vibration", 900).with("flame", 1).with("water", 300))
            .collect();
        let spike = report.model.score(&featurize_window(&spike));

        assert!(spike.score > calm.score);
        assert!(spike.is_anomaly);
    }

    #[test]
    fn test_rejects_empty_and_zero_window() {
        assert!(matches!(
            fit_sensor_model(&[], 10, IsolationForestConfig::default()),
            Err(TrainingError::NoData(_))
        ));
        assert!(matches!(
            fit_sensor_model(&calm_rows(5), 0, IsolationForestConfig::default()),
            Err(TrainingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_train_from_csv_and_reload() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("sensor.csv");
        let mut file = std::fs::File::create(&csv_path).unwrap();
        writeln!(file, "ts,vibration,flame,water").unwrap();
        for i in 0..200 {
            writeln!(file, "{},{},0,{}", i, 10 + i % 4, 30 + i % 3).unwrap();
        }
        drop(file);

        let out = dir.path().join("models").join("sensor_iforest.json");
        let report = train_sensor_model(&csv_path, &out, 10, IsolationForestConfig::default()).unwrap();
        assert_eq!(report.windows, 20);

        let store = ModelStore::load(&out, &dir.path().join("missing.json")).unwrap();
        let loaded = store.sensor().unwrap();
        let features = featurize_window(&calm_rows(10));
        let (before, after) = (report.model.score(&features), loaded.score(&features));
        assert_eq!(before.is_anomaly, after.is_anomaly);
        assert!((before.score - after.score).abs() < 1e-9);
        assert!(!store.has_text());
    }
}
