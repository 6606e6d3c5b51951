//! Isolation Forest
//!
//! Random isolation trees over sub-samples. Points that isolate in few
//! splits are anomalous. Scoring follows the usual convention:
//!
//! - `score_samples = -2^(-E[h(x)] / c(ψ))` (ψ = samples per tree)
//! - `offset = percentile(train scores, 100 * contamination)`
//! - `decision_function = score_samples - offset` (< 0 → outlier)

use ndarray::{Array2, ArrayView2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{AnomalyModel, ModelError};

/// Euler–Mascheroni constant
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForestConfig {
    /// Number of trees
    pub n_estimators: usize,
    /// Sub-sample size per tree (capped at the number of rows)
    pub max_samples: usize,
    /// Expected outlier fraction, in (0, 0.5]
    pub contamination: f64,
    /// RNG seed
    pub seed: u64,
}

impl Default for IsolationForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_samples: 256,
            contamination: 0.02,
            seed: 42,
        }
    }
}

// ============================================================================
// TREE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        size: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    fn fit(data: ArrayView2<f64>, rows: Vec<usize>, max_depth: usize, rng: &mut StdRng) -> Self {
        let mut nodes = Vec::new();
        grow(&mut nodes, data, rows, 0, max_depth, rng);
        Self { nodes }
    }

    /// Edges to the leaf plus the expected remaining depth of the leaf
    fn path_length(&self, x: &[f64]) -> f64 {
        let mut index = 0;
        let mut depth = 0usize;

        loop {
            match &self.nodes[index] {
                Node::Leaf { size } => return depth as f64 + average_path_length(*size),
                Node::Split { feature, threshold, left, right } => {
                    let value = x.get(*feature).copied().unwrap_or(0.0);
                    index = if value <= *threshold { *left } else { *right };
                    depth += 1;
                }
            }
        }
    }

    /// Children sit after their parent (as `grow` lays them out), so
    /// every walk ends at a leaf.
    fn is_well_formed(&self) -> bool {
        let len = self.nodes.len();
        len > 0
            && self.nodes.iter().enumerate().all(|(index, n)| match n {
                Node::Split { left, right, .. } => {
                    *left > index && *right > index && *left < len && *right < len
                }
                Node::Leaf { .. } => true,
            })
    }
}

fn grow(
    nodes: &mut Vec<Node>,
    data: ArrayView2<f64>,
    rows: Vec<usize>,
    depth: usize,
    max_depth: usize,
    rng: &mut StdRng,
) -> usize {
    let index = nodes.len();
    nodes.push(Node::Leaf { size: rows.len() });

    if depth >= max_depth || rows.len() <= 1 {
        return index;
    }

    // Only features that still vary inside this node can split it
    let candidates: Vec<(usize, f64, f64)> = (0..data.ncols())
        .filter_map(|f| {
            let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
                let v = data[[r, f]];
                (lo.min(v), hi.max(v))
            });
            (hi > lo && (hi - lo).is_finite()).then_some((f, lo, hi))
        })
        .collect();

    let Some(&(feature, lo, hi)) = candidates.choose(rng) else {
        return index;
    };

    let mut threshold = lo + rng.gen::<f64>() * (hi - lo);
    if threshold >= hi {
        threshold = lo;
    }

    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
        rows.into_iter().partition(|&r| data[[r, feature]] <= threshold);

    let left = grow(nodes, data, left_rows, depth + 1, max_depth, rng);
    let right = grow(nodes, data, right_rows, depth + 1, max_depth, rng);
    nodes[index] = Node::Split { feature, threshold, left, right };

    index
}

/// Average path length of an unsuccessful BST search over `n` points
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolated percentile (`q` in 0..=100) of unsorted values
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = (q / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

// ============================================================================
// FOREST
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForest {
    config: IsolationForestConfig,
    n_features: usize,
    samples_per_tree: usize,
    offset: f64,
    trees: Vec<IsolationTree>,
}

impl IsolationForest {
    /// Fit on rows of `data` (one row per window)
    pub fn fit(data: &Array2<f64>, config: IsolationForestConfig) -> Result<Self, ModelError> {
        let n_rows = data.nrows();
        if n_rows == 0 || data.ncols() == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }
        if !(config.contamination > 0.0 && config.contamination <= 0.5) {
            return Err(ModelError::InvalidArtifact(format!(
                "contamination must be in (0, 0.5], got {}",
                config.contamination
            )));
        }

        let samples_per_tree = config.max_samples.clamp(1, n_rows);
        let max_depth = (samples_per_tree.max(2) as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let trees = (0..config.n_estimators.max(1))
            .map(|_| {
                let rows = rand::seq::index::sample(&mut rng, n_rows, samples_per_tree).into_vec();
                IsolationTree::fit(data.view(), rows, max_depth, &mut rng)
            })
            .collect();

        let mut forest = Self {
            n_features: data.ncols(),
            samples_per_tree,
            offset: 0.0,
            trees,
            config,
        };

        let train_scores: Vec<f64> = data
            .rows()
            .into_iter()
            .map(|row| forest.score_samples(&row.to_vec()))
            .collect();
        forest.offset = percentile(&train_scores, 100.0 * forest.config.contamination);

        log::info!(
            "IsolationForest fitted: {} trees, {} rows, {} features, offset {:.4}",
            forest.trees.len(),
            n_rows,
            forest.n_features,
            forest.offset
        );

        Ok(forest)
    }

    /// Opposite of the anomaly score: in [-1, 0), lower = more anomalous
    pub fn score_samples(&self, x: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return -0.5;
        }
        let mean_depth = self.trees.iter().map(|t| t.path_length(x)).sum::<f64>() / self.trees.len() as f64;
        let norm = average_path_length(self.samples_per_tree).max(f64::EPSILON);
        -(2f64.powf(-mean_depth / norm))
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn config(&self) -> &IsolationForestConfig {
        &self.config
    }

    /// Structural sanity check after deserialisation
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::InvalidArtifact("forest has no trees".to_string()));
        }
        if !self.trees.iter().all(IsolationTree::is_well_formed) {
            return Err(ModelError::InvalidArtifact("malformed isolation tree".to_string()));
        }
        Ok(())
    }
}

impl AnomalyModel for IsolationForest {
    fn decision_function(&self, x: &[f64]) -> f64 {
        self.score_samples(x) - self.offset
    }

    fn name(&self) -> &str {
        "isolation_forest"
    }
}
