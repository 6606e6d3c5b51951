//! TF-IDF vectorizer
//!
//! Word n-grams over `\b\w\w+\b` tokens, smoothed idf
//! (`ln((1 + n) / (1 + df)) + 1`), l2-normalised rows.

use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ModelError;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

/// Sparse row: (feature index, value), sorted by index
pub type SparseVector = Vec<(usize, f64)>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfConfig {
    /// Smallest and largest n-gram length
    pub ngram_range: (usize, usize),
    /// Keep only the most frequent terms (by corpus count)
    pub max_features: Option<usize>,
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            max_features: Some(8000),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config: TfidfConfig,
    /// term → column, columns assigned in alphabetical term order
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and idf from a corpus
    pub fn fit(docs: &[String], config: TfidfConfig) -> Result<Self, ModelError> {
        let mut corpus_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in docs {
            let terms = analyze(doc, config.ngram_range);
            let unique: HashSet<&String> = terms.iter().collect();
            for term in unique {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            for term in terms {
                *corpus_counts.entry(term).or_insert(0) += 1;
            }
        }

        if corpus_counts.is_empty() {
            return Err(ModelError::InvalidArtifact(
                "empty vocabulary; documents contain only stop words".to_string(),
            ));
        }

        // BTreeMap iterates alphabetically; the stable sort keeps that order on ties
        let mut ranked: Vec<(String, usize)> = corpus_counts.into_iter().collect();
        if let Some(limit) = config.max_features {
            ranked.sort_by(|a, b| b.1.cmp(&a.1));
            ranked.truncate(limit);
        }

        let mut terms: Vec<String> = ranked.into_iter().map(|(t, _)| t).collect();
        terms.sort();

        let n_docs = docs.len() as f64;
        let idf = terms
            .iter()
            .map(|t| {
                let df = doc_freq.get(t).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let vocabulary = terms.into_iter().enumerate().map(|(i, t)| (t, i)).collect();

        Ok(Self { config, vocabulary, idf })
    }

    /// Vectorize one document
    pub fn transform(&self, doc: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in analyze(doc, self.config.ngram_range) {
            if let Some(&col) = self.vocabulary.get(&term) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut row: SparseVector = counts
            .into_iter()
            .map(|(col, tf)| (col, tf * self.idf[col]))
            .collect();

        let norm = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, v) in row.iter_mut() {
                *v /= norm;
            }
        }
        row
    }

    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Column → term
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = vec![String::new(); self.idf.len()];
        for (term, &col) in &self.vocabulary {
            if let Some(slot) = names.get_mut(col) {
                *slot = term.clone();
            }
        }
        names
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.vocabulary.len() != self.idf.len()
            || self.vocabulary.values().any(|&col| col >= self.idf.len())
        {
            return Err(ModelError::InvalidArtifact(
                "vocabulary and idf table disagree".to_string(),
            ));
        }
        Ok(())
    }
}

/// Tokens then n-grams joined by a single space
fn analyze(doc: &str, (min_n, max_n): (usize, usize)) -> Vec<String> {
    let lowered = doc.to_lowercase();
    let tokens: Vec<&str> = TOKEN_RE.find_iter(&lowered).map(|m| m.as_str()).collect();

    let mut terms = Vec::new();
    for n in min_n.max(1)..=max_n {
        if n > tokens.len() {
            break;
        }
        terms.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    terms
}
