//! Text classifier: cleaner → TF-IDF → logistic regression

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::logistic::LogisticRegression;
use super::tfidf::TfidfVectorizer;
use super::{ModelError, ModelMetadata, TextModel};
use crate::logic::text::{clean_text, clean_value};

/// Social post verdict
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextVerdict {
    /// 1 = disaster related
    pub label: u8,
    /// Max class probability, whichever class wins
    pub confidence: f64,
}

impl TextVerdict {
    fn from_proba(proba: [f64; 2]) -> Self {
        if proba[1] > proba[0] {
            Self { label: 1, confidence: proba[1] }
        } else {
            Self { label: 0, confidence: proba[0] }
        }
    }
}

/// Classify a raw post
pub fn classify(text: &str, model: &dyn TextModel) -> TextVerdict {
    let cleaned = clean_text(text);
    TextVerdict::from_proba(model.predict_proba(&cleaned))
}

/// Classify an arbitrary JSON value; non-strings are classified as empty text
pub fn classify_value(value: &Value, model: &dyn TextModel) -> TextVerdict {
    let cleaned = clean_value(value);
    TextVerdict::from_proba(model.predict_proba(&cleaned))
}

// ============================================================================
// PIPELINE ARTIFACT
// ============================================================================

/// Most indicative vocabulary terms per class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub positive: Vec<(String, f64)>,
    pub negative: Vec<(String, f64)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPipeline {
    pub metadata: ModelMetadata,
    pub vectorizer: TfidfVectorizer,
    pub classifier: LogisticRegression,
}

impl TextPipeline {
    pub fn new(vectorizer: TfidfVectorizer, classifier: LogisticRegression, training_samples: usize) -> Self {
        Self {
            metadata: ModelMetadata::new("tfidf_logistic", training_samples),
            vectorizer,
            classifier,
        }
    }

    pub fn classify(&self, text: &str) -> TextVerdict {
        classify(text, self)
    }

    /// Top `n` positive and negative terms by coefficient
    pub fn top_features(&self, n: usize) -> Explanation {
        let names = self.vectorizer.feature_names();
        let mut ranked: Vec<(String, f64)> = names
            .into_iter()
            .zip(self.classifier.coef().iter().copied())
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

        let negative = ranked.iter().take(n).cloned().collect();
        let positive = ranked.iter().rev().take(n).cloned().collect();

        Explanation { positive, negative }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        self.metadata.check_version()?;
        self.vectorizer.validate()?;
        if self.classifier.coef().len() != self.vectorizer.n_features() {
            return Err(ModelError::InvalidArtifact(format!(
                "classifier has {} weights for {} vocabulary terms",
                self.classifier.coef().len(),
                self.vectorizer.n_features()
            )));
        }
        Ok(())
    }
}

impl TextModel for TextPipeline {
    fn predict_proba(&self, cleaned: &str) -> [f64; 2] {
        let row = self.vectorizer.transform(cleaned);
        self.classifier.predict_proba(&row)
    }

    fn name(&self) -> &str {
        "tfidf_logistic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Returns a fixed probability for any non-empty input
    struct Fixed(f64);

    impl TextModel for Fixed {
        fn predict_proba(&self, cleaned: &str) -> [f64; 2] {
            let p1 = if cleaned.is_empty() { 0.1 } else { self.0 };
            [1.0 - p1, p1]
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_confidence_is_max_probability() {
        let positive = classify("flood!", &Fixed(0.8));
        assert_eq!(positive.label, 1);
        assert!((positive.confidence - 0.8).abs() < 1e-12);

        let negative = classify("flood!", &Fixed(0.3));
        assert_eq!(negative.label, 0);
        assert!((negative.confidence - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_non_string_classified_as_empty() {
        let verdict = classify_value(&json!(12345), &Fixed(0.99));
        assert_eq!(verdict.label, 0);
        assert!((verdict.confidence - 0.9).abs() < 1e-12);
    }
}
