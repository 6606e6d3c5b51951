//! CSV-backed source (demo data, training input)

use std::path::{Path, PathBuf};

use super::{latest, FetchFailures, IngestError, SocialPost};
use crate::constants;
use crate::logic::features::SensorRecord;

/// Post with an optional 0/1 label (training CSV row)
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledPost {
    pub text: String,
    pub label: Option<u8>,
}

pub struct CsvSource {
    sensor_csv: PathBuf,
    posts_csv: PathBuf,
    failures: FetchFailures,
}

impl CsvSource {
    pub fn new(sensor_csv: impl Into<PathBuf>, posts_csv: impl Into<PathBuf>) -> Self {
        Self {
            sensor_csv: sensor_csv.into(),
            posts_csv: posts_csv.into(),
            failures: FetchFailures::default(),
        }
    }

    pub fn demo() -> Self {
        Self::new(constants::DEMO_SENSOR_CSV, constants::DEMO_POSTS_CSV)
    }

    /// Last `limit` rows in file order
    pub fn fetch_sensor_data(&self, limit: usize) -> Vec<SensorRecord> {
        match read_sensor_rows(&self.sensor_csv) {
            Ok(rows) => latest(rows, limit, SensorRecord::ts),
            Err(e) => {
                self.failures.record("csv", &self.sensor_csv.display().to_string(), &e);
                Vec::new()
            }
        }
    }

    pub fn fetch_posts(&self, limit: usize) -> Vec<SocialPost> {
        match read_labelled_posts(&self.posts_csv) {
            Ok(rows) => {
                let posts = rows.into_iter().map(|row| SocialPost::new(row.text)).collect();
                latest(posts, limit, |p: &SocialPost| p.ts)
            }
            Err(e) => {
                self.failures.record("csv", &self.posts_csv.display().to_string(), &e);
                Vec::new()
            }
        }
    }

    pub fn failure_count(&self) -> u64 {
        self.failures.count()
    }
}

// ============================================================================
// READERS
// ============================================================================

/// Read every row as a raw record keyed by header
pub fn read_sensor_rows(path: &Path) -> Result<Vec<SensorRecord>, IngestError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(SensorRecord::from_pairs(headers.iter().zip(record.iter())));
    }
    Ok(rows)
}

/// Read `text` (required column) and `label` (optional column)
pub fn read_labelled_posts(path: &Path) -> Result<Vec<LabelledPost>, IngestError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let text_idx = headers
        .iter()
        .position(|h| h.trim() == "text")
        .ok_or_else(|| IngestError::Payload(format!("{}: missing 'text' column", path.display())))?;
    let label_idx = headers.iter().position(|h| h.trim() == "label");

    let mut posts = Vec::new();
    for result in reader.records() {
        let record = result?;
        let text = record.get(text_idx).unwrap_or_default().to_string();
        let label = label_idx.and_then(|i| record.get(i)).and_then(parse_label);
        posts.push(LabelledPost { text, label });
    }
    Ok(posts)
}

/// "1", "0", "1.0" → Some; anything else → None
fn parse_label(cell: &str) -> Option<u8> {
    let value: f64 = cell.trim().parse().ok()?;
    match value as i64 {
        0 if value == 0.0 => Some(0),
        1 if value == 1.0 => Some(1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_sensor_rows() {
        let file = csv_file("vibration,flame,water\n10,0,30\n12,,31\n");
        let rows = read_sensor_rows(file.path()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].channel("vibration"), Some(10.0));
        assert_eq!(rows[1].channel("flame"), None);
    }

    #[test]
    fn test_read_labelled_posts() {
        let file = csv_file("id,text,label\n1,Flood near river,1\n2,Nice day,0\n3,,1\n4,Huh,maybe\n");
        let posts = read_labelled_posts(file.path()).unwrap();

        assert_eq!(posts.len(), 4);
        assert_eq!(posts[0], LabelledPost { text: "Flood near river".into(), label: Some(1) });
        assert_eq!(posts[1].label, Some(0));
        assert_eq!(posts[2].text, "");
        assert_eq!(posts[3].label, None);
    }

    #[test]
    fn test_missing_text_column() {
        let file = csv_file("body,label\nhello,1\n");
        assert!(matches!(read_labelled_posts(file.path()), Err(IngestError::Payload(_))));
    }

    #[test]
    fn test_source_keeps_latest_rows() {
        let sensors = csv_file("vibration\n1\n2\n3\n4\n");
        let posts = csv_file("text\na\nb\nc\n");
        let source = CsvSource::new(sensors.path(), posts.path());

        let window = source.fetch_sensor_data(2);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].channel("vibration"), Some(3.0));

        let latest_posts = source.fetch_posts(2);
        assert_eq!(latest_posts.iter().map(|p| p.text.as_str()).collect::<Vec<_>>(), ["b", "c"]);
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let source = CsvSource::new("/nonexistent/sensors.csv", "/nonexistent/posts.csv");
        assert!(source.fetch_sensor_data(10).is_empty());
        assert!(source.fetch_posts(10).is_empty());
        assert_eq!(source.failure_count(), 2);
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(parse_label(" 1 "), Some(1));
        assert_eq!(parse_label("0.0"), Some(0));
        assert_eq!(parse_label("2"), None);
        assert_eq!(parse_label("0.5"), None);
    }
}
