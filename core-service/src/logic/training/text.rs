//! Text model training: labelled posts → TF-IDF + logistic regression

use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::metrics::{ClassificationReport, ConfusionMatrix};
use super::TrainingError;
use crate::logic::ingest::{read_labelled_posts, LabelledPost};
use crate::logic::model::artifact::save_artifact;
use crate::logic::model::{LogisticConfig, LogisticRegression, TextModel, TextPipeline, TfidfConfig, TfidfVectorizer};
use crate::logic::text::clean_text;

/// Held-out share of each class
pub const TEST_FRACTION: f64 = 0.2;

#[derive(Debug)]
pub struct TextTrainingReport {
    pub pipeline: TextPipeline,
    pub train_size: usize,
    pub test_size: usize,
    pub report: ClassificationReport,
    pub confusion: ConfusionMatrix,
}

/// Stratified split: each class contributes `round(n_c * TEST_FRACTION)`
/// (at least one) shuffled rows to the test set.
///
/// Returns (train, test) index lists. Every class needs two rows.
pub fn stratified_split(labels: &[u8], seed: u64) -> Result<(Vec<usize>, Vec<usize>), TrainingError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in [0u8, 1] {
        let mut members: Vec<usize> = (0..labels.len()).filter(|&i| labels[i] == class).collect();
        if members.len() < 2 {
            return Err(TrainingError::NoData(format!(
                "class {} has {} rows; need at least 2 per class",
                class,
                members.len()
            )));
        }
        members.shuffle(&mut rng);

        let n_test = ((members.len() as f64 * TEST_FRACTION).round() as usize).clamp(1, members.len() - 1);
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok((train, test))
}

/// Fit on in-memory posts; rows without text or label are dropped
pub fn fit_text_model(posts: &[LabelledPost], seed: u64) -> Result<TextTrainingReport, TrainingError> {
    let (texts, labels): (Vec<String>, Vec<u8>) = posts
        .iter()
        .filter(|p| !p.text.trim().is_empty())
        .filter_map(|p| p.label.map(|label| (clean_text(&p.text), label)))
        .unzip();

    let dropped = posts.len() - texts.len();
    if dropped > 0 {
        log::info!("Dropped {} rows with missing text or label", dropped);
    }

    let (train_idx, test_idx) = stratified_split(&labels, seed)?;
    let pick_texts = |idx: &[usize]| idx.iter().map(|&i| texts[i].clone()).collect::<Vec<_>>();
    let pick_labels = |idx: &[usize]| idx.iter().map(|&i| labels[i]).collect::<Vec<_>>();

    let (train_texts, train_labels) = (pick_texts(&train_idx), pick_labels(&train_idx));
    let (test_texts, test_labels) = (pick_texts(&test_idx), pick_labels(&test_idx));

    let vectorizer = TfidfVectorizer::fit(&train_texts, TfidfConfig::default())?;
    let rows: Vec<_> = train_texts.iter().map(|t| vectorizer.transform(t)).collect();
    let classifier = LogisticRegression::fit(
        &rows,
        &train_labels,
        vectorizer.n_features(),
        &LogisticConfig::default(),
    )?;

    let pipeline = TextPipeline::new(vectorizer, classifier, train_texts.len());

    let predicted: Vec<u8> = test_texts
        .iter()
        .map(|t| {
            let proba = pipeline.predict_proba(t);
            u8::from(proba[1] > proba[0])
        })
        .collect();
    let confusion = ConfusionMatrix::from_predictions(&test_labels, &predicted);
    let report = ClassificationReport::from_confusion(&confusion);

    log::info!(
        "Text model trained: {} train / {} test rows, {} terms, accuracy {:.3}",
        train_texts.len(),
        test_texts.len(),
        pipeline.vectorizer.n_features(),
        report.accuracy
    );

    Ok(TextTrainingReport {
        pipeline,
        train_size: train_texts.len(),
        test_size: test_texts.len(),
        report,
        confusion,
    })
}

/// Read a `text,label` CSV, fit, and save the artifact to `out`
pub fn train_text_model(csv_path: &Path, out: &Path, seed: u64) -> Result<TextTrainingReport, TrainingError> {
    let posts = read_labelled_posts(csv_path)?;
    let report = fit_text_model(&posts, seed)?;
    save_artifact(out, &report.pipeline)?;
    log::info!("Saved text model: {}", out.display());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::ModelStore;
    use std::io::Write;
    use tempfile::TempDir;

    /// Small labelled corpus with obvious vocabulary per class
    fn corpus() -> Vec<LabelledPost> {
        let disaster = [
            "Flood water rising near the river bank, evacuate now",
            "Earthquake shook the city, buildings collapsed",
            "Wildfire spreading fast, smoke everywhere, need help",
            "Flash flood warning issued, roads under water",
            "Fire crews battling huge blaze near homes",
            "Earthquake aftershock felt downtown, people trapped",
            "River flood destroyed the bridge, rescue teams deployed",
            "Emergency: fire and smoke in the apartment block",
            "Storm surge flooding coastal homes, evacuation ordered",
            "Rescue teams searching rubble after the earthquake",
        ];
        let calm = [
            "Beautiful sunny day at the park with friends",
            "Just had the best coffee of my life",
            "Watching a movie tonight, any recommendations?",
            "New album from my favourite band is out",
            "Lovely dinner with family this evening",
            "Going for a run along the beach this morning",
            "Reading a great book about history",
            "The cat is sleeping on my keyboard again",
            "Weekend plans: gardening and baking bread",
            "Happy birthday to my best friend",
        ];

        disaster
            .iter()
            .map(|t| LabelledPost { text: t.to_string(), label: Some(1) })
            .chain(calm.iter().map(|t| LabelledPost { text: t.to_string(), label: Some(0) }))
            .collect()
    }

    #[test]
    fn test_stratified_split_keeps_both_classes() {
        let labels = [0, 0, 0, 0, 0, 1, 1, 1, 1, 1];
        let (train, test) = stratified_split(&labels, 42).unwrap();

        assert_eq!(train.len() + test.len(), labels.len());
        assert!(test.iter().any(|&i| labels[i] == 0));
        assert!(test.iter().any(|&i| labels[i] == 1));
        assert!(train.iter().all(|i| !test.contains(i)));
    }

    #[test]
    fn test_split_is_seeded() {
        let labels = [0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1];
        assert_eq!(stratified_split(&labels, 7).unwrap(), stratified_split(&labels, 7).unwrap());
    }

    #[test]
    fn test_split_needs_two_per_class() {
        assert!(matches!(stratified_split(&[0, 0, 0, 1], 42), Err(TrainingError::NoData(_))));
    }

    #[test]
    fn test_fit_classifies_obvious_examples() {
        let result = fit_text_model(&corpus(), 42).unwrap();

        assert_eq!(result.train_size, 16);
        assert_eq!(result.test_size, 4);
        assert_eq!(result.confusion.total(), 4);

        let alert = result.pipeline.classify("Flood and fire, evacuate, earthquake rescue needed");
        assert_eq!(alert.label, 1);
        let calm = result.pipeline.classify("Lovely coffee with friends at the park");
        assert_eq!(calm.label, 0);
    }

    #[test]
    fn test_drops_unlabelled_rows() {
        let mut posts = corpus();
        posts.push(LabelledPost { text: "unlabelled".into(), label: None });
        posts.push(LabelledPost { text: "   ".into(), label: Some(1) });

        let result = fit_text_model(&posts, 42).unwrap();
        assert_eq!(result.train_size + result.test_size, 20);
    }

    #[test]
    fn test_train_from_csv_and_reload() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("tweets.csv");
        let mut file = std::fs::File::create(&csv_path).unwrap();
        writeln!(file, "text,label").unwrap();
        for post in corpus() {
            writeln!(file, "\"{}\",{}", post.text, post.label.unwrap()).unwrap();
        }
        drop(file);

        let out = dir.path().join("disaster_model.json");
        train_text_model(&csv_path, &out, 42).unwrap();

        let store = ModelStore::load(&dir.path().join("missing.json"), &out).unwrap();
        let pipeline = store.text().unwrap();
        assert_eq!(pipeline.classify("earthquake flood evacuate").label, 1);
    }
}
