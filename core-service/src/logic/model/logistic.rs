//! Binary logistic regression over sparse rows
//!
//! Objective: `0.5 * (|w|² + b²) + C * Σ sᵢ · logloss(yᵢ, w·xᵢ + b)`,
//! with the intercept penalised like any other weight and per-sample
//! weights `sᵢ` from balanced class weighting. Solved by accelerated
//! gradient descent (the objective is smooth and strongly convex).

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::tfidf::SparseVector;
use super::ModelError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticConfig {
    /// Inverse regularisation strength
    pub c: f64,
    pub max_iter: usize,
    /// Stop when the gradient norm drops below this
    pub tol: f64,
    /// Weight classes by `n / (2 * count_c)`
    pub balanced: bool,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            tol: 1e-6,
            balanced: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    coef: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    /// Fit on sparse rows with labels in {0, 1}
    pub fn fit(
        rows: &[SparseVector],
        labels: &[u8],
        n_features: usize,
        config: &LogisticConfig,
    ) -> Result<Self, ModelError> {
        if rows.is_empty() || rows.len() != labels.len() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if labels.iter().any(|&y| y > 1) {
            return Err(ModelError::InvalidArtifact("labels must be 0 or 1".to_string()));
        }

        let positives = labels.iter().filter(|&&y| y == 1).count();
        let negatives = labels.len() - positives;
        if positives == 0 || negatives == 0 {
            return Err(ModelError::InvalidArtifact(
                "training data needs both classes".to_string(),
            ));
        }

        let n = labels.len() as f64;
        let sample_weights: Vec<f64> = labels
            .iter()
            .map(|&y| match (config.balanced, y) {
                (false, _) => 1.0,
                (true, 1) => n / (2.0 * positives as f64),
                (true, _) => n / (2.0 * negatives as f64),
            })
            .collect();

        // Lipschitz bound of the gradient; rows are l2-normalised or small
        let max_sq_norm = rows
            .iter()
            .map(|r| r.iter().map(|(_, v)| v * v).sum::<f64>() + 1.0)
            .fold(0.0, f64::max);
        let lipschitz = 1.0 + 0.25 * config.c * max_sq_norm * sample_weights.iter().sum::<f64>();
        let step = 1.0 / lipschitz;
        let kappa = lipschitz.sqrt();
        let momentum = (kappa - 1.0) / (kappa + 1.0);

        // Last slot holds the intercept
        let dim = n_features + 1;
        let mut w = Array1::<f64>::zeros(dim);
        let mut v = w.clone();
        let mut iterations = 0;

        for _ in 0..config.max_iter {
            iterations += 1;
            let grad = gradient(&v, rows, labels, &sample_weights, config.c);
            let grad_norm = grad.dot(&grad).sqrt();
            let next = &v - &(grad * step);

            if grad_norm < config.tol {
                w = next;
                break;
            }

            v = &next + &((&next - &w) * momentum);
            w = next;
        }

        log::info!(
            "LogisticRegression fitted: {} rows, {} features, {} iterations",
            rows.len(),
            n_features,
            iterations
        );

        let intercept = w[n_features];
        let coef = w.slice(ndarray::s![..n_features]).to_vec();
        Ok(Self { coef, intercept })
    }

    /// Raw margin `w·x + b`
    pub fn decision_function(&self, row: &SparseVector) -> f64 {
        row.iter()
            .filter_map(|&(col, v)| self.coef.get(col).map(|w| w * v))
            .sum::<f64>()
            + self.intercept
    }

    /// `[P(0), P(1)]`
    pub fn predict_proba(&self, row: &SparseVector) -> [f64; 2] {
        let p1 = sigmoid(self.decision_function(row));
        [1.0 - p1, p1]
    }

    pub fn coef(&self) -> &[f64] {
        &self.coef
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

fn gradient(
    params: &Array1<f64>,
    rows: &[SparseVector],
    labels: &[u8],
    weights: &[f64],
    c: f64,
) -> Array1<f64> {
    let n_features = params.len() - 1;
    let intercept = params[n_features];

    // Regularisation term covers the intercept too
    let mut grad = params.clone();

    for ((row, &y), &s) in rows.iter().zip(labels).zip(weights) {
        let margin = row
            .iter()
            .filter(|(col, _)| *col < n_features)
            .map(|&(col, v)| params[col] * v)
            .sum::<f64>()
            + intercept;
        let residual = c * s * (sigmoid(margin) - y as f64);

        for &(col, v) in row.iter().filter(|(col, _)| *col < n_features) {
            grad[col] += residual * v;
        }
        grad[n_features] += residual;
    }

    grad
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
