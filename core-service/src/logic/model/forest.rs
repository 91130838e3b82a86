//! Random Forest
//!
//! Bagged CART trees with gini impurity. Each split looks at a random subset of
//! `max_features` informative features; leaves hold class fractions and the
//! forest probability is their mean.
//!
//! Training is deterministic for a given seed: per-tree seeds are drawn up front
//! from the master RNG, then trees grow in parallel.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::features::FEATURE_COUNT;

// ============================================================================
// CONFIG
// ============================================================================

/// Forest hyper-parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees
    pub n_estimators: usize,
    /// Minimum samples on each side of a split
    pub min_samples_leaf: usize,
    /// Candidate features per split (None = sqrt of feature count)
    pub max_features: Option<usize>,
    /// Depth cap (None = grow until pure or too small)
    pub max_depth: Option<usize>,
    /// Master seed
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 50,
            min_samples_leaf: 5,
            max_features: None,
            max_depth: None,
            seed: 42,
        }
    }
}

impl ForestConfig {
    /// Effective number of candidate features per split
    pub fn features_per_split(&self) -> usize {
        self.max_features
            .unwrap_or_else(|| (FEATURE_COUNT as f64).sqrt() as usize)
            .clamp(1, FEATURE_COUNT)
    }
}

/// One training row as the trees see it
#[derive(Debug, Clone, Copy)]
pub(crate) struct TrainingRow {
    pub values: [f64; FEATURE_COUNT],
    pub class: usize,
}

/// Structural defect found in a deserialized forest
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructureError {
    #[error("forest has no trees")]
    NoTrees,

    #[error("tree {tree} has no nodes")]
    EmptyTree { tree: usize },

    #[error("tree {tree}, node {node}: split on unknown feature {feature}")]
    FeatureOutOfRange { tree: usize, node: usize, feature: usize },

    #[error("tree {tree}, node {node}: child {child} must lie after the node and below {len}")]
    BadChild { tree: usize, node: usize, child: usize, len: usize },

    #[error("tree {tree}, node {node}: non-finite threshold")]
    BadThreshold { tree: usize, node: usize },

    #[error("tree {tree}, node {node}: leaf probabilities {proba:?} are not a distribution")]
    BadLeaf { tree: usize, node: usize, proba: [f64; 2] },
}

// ============================================================================
// DECISION TREE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum TreeNode {
    Leaf {
        proba: [f64; 2],
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Arena-backed CART tree; node 0 is the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl DecisionTree {
    fn fit(rows: &[TrainingRow], indices: Vec<usize>, config: &ForestConfig, rng: &mut StdRng) -> Self {
        let mut nodes = vec![TreeNode::Leaf { proba: [1.0, 0.0] }];
        let mut pending = vec![(0usize, indices, 0usize)];

        while let Some((slot, indices, depth)) = pending.pop() {
            let counts = class_counts(rows, &indices);
            let leaf = TreeNode::Leaf {
                proba: class_fractions(counts),
            };

            let is_pure = counts[0] == 0 || counts[1] == 0;
            let too_small = indices.len() < 2 * config.min_samples_leaf.max(1);
            let too_deep = config.max_depth.map_or(false, |max| depth >= max);

            if is_pure || too_small || too_deep {
                nodes[slot] = leaf;
                continue;
            }

            let Some(split) = best_split(rows, &indices, counts, config, rng) else {
                nodes[slot] = leaf;
                continue;
            };

            let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = indices
                .into_iter()
                .partition(|&i| rows[i].values[split.feature] <= split.threshold);

            let left = nodes.len();
            let right = left + 1;
            nodes.push(TreeNode::Leaf { proba: [1.0, 0.0] });
            nodes.push(TreeNode::Leaf { proba: [1.0, 0.0] });
            nodes[slot] = TreeNode::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };

            pending.push((right, right_rows, depth + 1));
            pending.push((left, left_rows, depth + 1));
        }

        Self { nodes }
    }

    /// `[p_safe, p_vulnerable]` of the leaf reached by `values`
    pub fn predict_proba(&self, values: &[f64; FEATURE_COUNT]) -> [f64; 2] {
        let mut node = 0;
        loop {
            match &self.nodes[node] {
                TreeNode::Leaf { proba } => return *proba,
                TreeNode::Split { feature, threshold, left, right } => {
                    node = if values[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Check the arena can be walked: features in range, children strictly
    /// after their parent (so every walk ends at a leaf), leaves that sum to 1.
    fn check_structure(&self, tree: usize) -> Result<(), StructureError> {
        let len = self.nodes.len();
        if len == 0 {
            return Err(StructureError::EmptyTree { tree });
        }

        for (node, entry) in self.nodes.iter().enumerate() {
            match *entry {
                TreeNode::Leaf { proba } => {
                    let in_unit = proba.iter().all(|p| p.is_finite() && (0.0..=1.0).contains(p));
                    if !in_unit || (proba[0] + proba[1] - 1.0).abs() > 1e-6 {
                        return Err(StructureError::BadLeaf { tree, node, proba });
                    }
                }
                TreeNode::Split { feature, threshold, left, right } => {
                    if feature >= FEATURE_COUNT {
                        return Err(StructureError::FeatureOutOfRange { tree, node, feature });
                    }
                    if !threshold.is_finite() {
                        return Err(StructureError::BadThreshold { tree, node });
                    }
                    for child in [left, right] {
                        if child <= node || child >= len {
                            return Err(StructureError::BadChild { tree, node, child, len });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let TreeNode::Split { left, right, .. } = &self.nodes[node] {
                stack.push((*left, depth + 1));
                stack.push((*right, depth + 1));
            }
        }
        max_depth
    }
}

fn class_counts(rows: &[TrainingRow], indices: &[usize]) -> [usize; 2] {
    let mut counts = [0usize; 2];
    for &i in indices {
        counts[rows[i].class] += 1;
    }
    counts
}

fn class_fractions(counts: [usize; 2]) -> [f64; 2] {
    let total = (counts[0] + counts[1]) as f64;
    if total == 0.0 {
        return [1.0, 0.0];
    }
    let vulnerable = counts[1] as f64 / total;
    [1.0 - vulnerable, vulnerable]
}

fn gini(counts: [usize; 2]) -> f64 {
    let total = (counts[0] + counts[1]) as f64;
    if total == 0.0 {
        return 0.0;
    }
    let p0 = counts[0] as f64 / total;
    let p1 = counts[1] as f64 / total;
    1.0 - p0 * p0 - p1 * p1
}

/// Lowest weighted-gini split over a random subset of non-constant features
fn best_split(
    rows: &[TrainingRow],
    indices: &[usize],
    parent: [usize; 2],
    config: &ForestConfig,
    rng: &mut StdRng,
) -> Option<SplitCandidate> {
    let n = indices.len();
    let min_leaf = config.min_samples_leaf.max(1);
    let wanted = config.features_per_split();

    let mut features: Vec<usize> = (0..FEATURE_COUNT).collect();
    features.shuffle(rng);

    let mut best: Option<SplitCandidate> = None;
    let mut informative = 0;
    let mut column: Vec<(f64, usize)> = Vec::with_capacity(n);

    for feature in features {
        // Constant features don't count toward the budget
        if informative >= wanted {
            break;
        }

        column.clear();
        column.extend(indices.iter().map(|&i| (rows[i].values[feature], rows[i].class)));
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        if column[0].0 == column[n - 1].0 {
            continue;
        }
        informative += 1;

        let mut left = [0usize; 2];
        for k in 0..n - 1 {
            left[column[k].1] += 1;

            if column[k].0 == column[k + 1].0 {
                continue;
            }
            let n_left = k + 1;
            let n_right = n - n_left;
            if n_left < min_leaf || n_right < min_leaf {
                continue;
            }

            let right = [parent[0] - left[0], parent[1] - left[1]];
            let impurity = (n_left as f64 * gini(left) + n_right as f64 * gini(right)) / n as f64;

            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                best = Some(SplitCandidate {
                    feature,
                    threshold: column[k].0 + (column[k + 1].0 - column[k].0) / 2.0,
                    impurity,
                });
            }
        }
    }

    best
}

// ============================================================================
// FOREST
// ============================================================================

/// Trained random forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Grow `config.n_estimators` trees on bootstrap samples of `rows`.
    /// Callers guarantee `rows` is non-empty and the config is valid.
    pub(crate) fn fit(rows: &[TrainingRow], config: &ForestConfig) -> Self {
        let n = rows.len();
        let mut master = StdRng::seed_from_u64(config.seed);
        let tree_seeds: Vec<u64> = (0..config.n_estimators).map(|_| master.gen()).collect();

        let trees = tree_seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                DecisionTree::fit(rows, bootstrap, config, &mut rng)
            })
            .collect();

        Self { trees }
    }

    /// Mean of the per-tree leaf fractions, as `[p_safe, p_vulnerable]`
    pub fn predict_proba(&self, values: &[f64; FEATURE_COUNT]) -> [f64; 2] {
        if self.trees.is_empty() {
            return [1.0, 0.0];
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict_proba(values)[1]).sum();
        let vulnerable = (sum / self.trees.len() as f64).clamp(0.0, 1.0);
        [1.0 - vulnerable, vulnerable]
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    /// Reject forests that would panic or loop in `predict_proba`
    pub fn check_structure(&self) -> Result<(), StructureError> {
        if self.trees.is_empty() {
            return Err(StructureError::NoTrees);
        }
        self.trees
            .iter()
            .enumerate()
            .try_for_each(|(tree, t)| t.check_structure(tree))
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row(sql: f64, concat: f64, class: usize) -> TrainingRow {
        let mut values = [0.0; FEATURE_COUNT];
        values[0] = 40.0 + sql;
        values[7] = sql;
        values[9] = concat;
        values[12] = 5.5;
        TrainingRow { values, class }
    }

    fn separable_rows() -> Vec<TrainingRow> {
        let mut rows = Vec::new();
        for i in 0..30 {
            rows.push(row(0.0, 0.0, 0));
            rows.push(row(3.0 + (i % 3) as f64, 1.0 + (i % 2) as f64, 1));
        }
        rows
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini([5, 0]), 0.0);
        assert!((gini([5, 5]) - 0.5).abs() < 1e-12);
        assert_eq!(gini([0, 0]), 0.0);
    }

    #[test]
    fn test_features_per_split_default_is_sqrt() {
        assert_eq!(ForestConfig::default().features_per_split(), 3);
        let config = ForestConfig { max_features: Some(100), ..Default::default() };
        assert_eq!(config.features_per_split(), FEATURE_COUNT);
    }

    #[test]
    fn test_forest_separates_clusters() {
        let rows = separable_rows();
        let forest = RandomForest::fit(&rows, &ForestConfig::default());

        assert_eq!(forest.n_estimators(), 50);
        let safe = forest.predict_proba(&row(0.0, 0.0, 0).values);
        let vulnerable = forest.predict_proba(&row(4.0, 2.0, 1).values);
        assert!(safe[1] < 0.5, "safe cluster scored {:?}", safe);
        assert!(vulnerable[1] > 0.5, "vulnerable cluster scored {:?}", vulnerable);
    }

    #[test]
    fn test_training_is_deterministic() {
        let rows = separable_rows();
        let config = ForestConfig { n_estimators: 10, ..Default::default() };
        assert_eq!(RandomForest::fit(&rows, &config), RandomForest::fit(&rows, &config));
    }

    #[test]
    fn test_single_class_forest_is_certain() {
        let rows: Vec<_> = (0..20).map(|i| row(i as f64, 0.0, 1)).collect();
        let forest = RandomForest::fit(&rows, &ForestConfig { n_estimators: 5, ..Default::default() });
        assert_eq!(forest.predict_proba(&rows[0].values), [0.0, 1.0]);
        assert!(forest.trees().iter().all(|t| t.node_count() == 1));
    }

    #[test]
    fn test_min_samples_leaf_limits_growth() {
        let rows = separable_rows();
        let config = ForestConfig {
            n_estimators: 3,
            min_samples_leaf: rows.len(),
            ..Default::default()
        };
        let forest = RandomForest::fit(&rows, &config);
        assert!(forest.trees().iter().all(|t| t.depth() == 0));
    }

    #[test]
    fn test_fitted_forest_passes_structure_check() {
        let forest = RandomForest::fit(&separable_rows(), &ForestConfig { n_estimators: 5, ..Default::default() });
        assert_eq!(forest.check_structure(), Ok(()));
    }

    #[test]
    fn test_structure_check_catches_broken_arena() {
        let split = |feature, left, right| TreeNode::Split { feature, threshold: 0.5, left, right };
        let leaf = |p: f64| TreeNode::Leaf { proba: [1.0 - p, p] };
        let forest = |nodes: Vec<TreeNode>| RandomForest { trees: vec![DecisionTree { nodes }] };

        assert_eq!(
            forest(vec![split(99, 1, 2), leaf(0.0), leaf(1.0)]).check_structure(),
            Err(StructureError::FeatureOutOfRange { tree: 0, node: 0, feature: 99 })
        );
        assert!(matches!(
            forest(vec![split(0, 0, 2), leaf(0.0), leaf(1.0)]).check_structure(),
            Err(StructureError::BadChild { child: 0, .. })
        ));
        assert!(matches!(
            forest(vec![split(0, 1, 7), leaf(0.0), leaf(1.0)]).check_structure(),
            Err(StructureError::BadChild { child: 7, len: 3, .. })
        ));
        assert!(matches!(
            forest(vec![TreeNode::Leaf { proba: [0.7, 0.7] }]).check_structure(),
            Err(StructureError::BadLeaf { .. })
        ));
        assert!(matches!(
            forest(vec![TreeNode::Leaf { proba: [f64::NAN, 1.0] }]).check_structure(),
            Err(StructureError::BadLeaf { .. })
        ));
        assert_eq!(forest(Vec::new()).check_structure(), Err(StructureError::EmptyTree { tree: 0 }));
        assert_eq!(RandomForest { trees: Vec::new() }.check_structure(), Err(StructureError::NoTrees));
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let rows = separable_rows();
        let forest = RandomForest::fit(&rows, &ForestConfig { n_estimators: 7, ..Default::default() });
        for r in &rows {
            let [safe, vulnerable] = forest.predict_proba(&r.values);
            assert!((safe + vulnerable - 1.0).abs() < 1e-9);
        }
    }
}
