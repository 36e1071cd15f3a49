//! Decision-tree training and inference.
//!
//! Array-based node layout: children are indices into a flat node vector,
//! leaves carry the class distribution of the training samples that reached
//! them. Splits minimize weighted Gini impurity over a random subset of
//! candidate features.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A node in the decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// Feature index to split on; `None` for leaf nodes
    pub feature: Option<usize>,
    /// Split threshold (feature values <= threshold go left)
    pub threshold: f64,
    /// Index of the left child
    pub left: usize,
    /// Index of the right child
    pub right: usize,
    /// Class distribution of training weight at this node (sums to 1)
    pub distribution: Vec<f64>,
}

impl TreeNode {
    /// Returns `true` if this node is a leaf
    pub fn is_leaf(&self) -> bool {
        self.feature.is_none()
    }
}

/// Growth limits for one tree, shared across the forest
#[derive(Debug, Clone)]
pub struct TreeSettings {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Number of candidate features examined per split
    pub n_candidate_features: usize,
}

/// A single decision-tree classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    n_features: usize,
    /// Normalized impurity-decrease importance per feature
    importances: Vec<f64>,
}

impl DecisionTree {
    /// Fit a tree on weighted samples. `y` holds class indices < `n_classes`;
    /// `x`, `y` and `weights` must be non-empty and equal-length.
    pub fn fit(
        x: &[Vec<f64>],
        y: &[usize],
        weights: &[f64],
        n_classes: usize,
        settings: &TreeSettings,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let n_features = x[0].len();
        let total_weight: f64 = weights.iter().sum();

        let mut builder = TreeBuilder {
            x,
            y,
            weights,
            n_classes,
            settings,
            rng,
            nodes: Vec::new(),
            importances: vec![0.0; n_features],
            total_weight,
        };

        let root_indices: Vec<usize> = (0..x.len()).collect();
        builder.build(root_indices, 0);

        let mut importances = builder.importances;
        let sum: f64 = importances.iter().sum();
        if sum > 0.0 {
            for value in &mut importances {
                *value /= sum;
            }
        }

        Self {
            nodes: builder.nodes,
            n_features,
            importances,
        }
    }

    /// Number of features the tree was fit on
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Per-feature normalized importance scores
    pub fn importances(&self) -> &[f64] {
        &self.importances
    }

    /// Class distribution at the leaf this sample lands in
    pub fn predict_proba(&self, features: &[f64]) -> &[f64] {
        let mut node = &self.nodes[0];
        while let Some(feature) = node.feature {
            node = if features[feature] <= node.threshold {
                &self.nodes[node.left]
            } else {
                &self.nodes[node.right]
            };
        }
        &node.distribution
    }

    /// Predicted class index (earliest index wins ties)
    pub fn predict(&self, features: &[f64]) -> usize {
        argmax(self.predict_proba(features))
    }
}

/// Index of the maximum value; earliest index wins ties
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = i;
        }
    }
    best
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [usize],
    weights: &'a [f64],
    n_classes: usize,
    settings: &'a TreeSettings,
    rng: &'a mut ChaCha8Rng,
    nodes: Vec<TreeNode>,
    importances: Vec<f64>,
    total_weight: f64,
}

struct Split {
    feature: usize,
    threshold: f64,
    gain: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

impl TreeBuilder<'_> {
    /// Grow the subtree over `indices`, returning its root node index
    fn build(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let class_weights = self.class_weights(&indices);
        let node_weight: f64 = class_weights.iter().sum();
        let node_gini = gini(&class_weights, node_weight);

        let distribution: Vec<f64> = class_weights.iter().map(|w| w / node_weight).collect();
        let node_index = self.nodes.len();
        self.nodes.push(TreeNode {
            feature: None,
            threshold: 0.0,
            left: 0,
            right: 0,
            distribution,
        });

        let can_split = depth < self.settings.max_depth
            && indices.len() >= self.settings.min_samples_split
            && node_gini > 0.0;
        if !can_split {
            return node_index;
        }

        let split = match self.best_split(&indices, node_gini, node_weight) {
            Some(split) => split,
            None => return node_index,
        };

        self.importances[split.feature] += node_weight / self.total_weight * split.gain;

        let left = self.build(split.left, depth + 1);
        let right = self.build(split.right, depth + 1);
        let node = &mut self.nodes[node_index];
        node.feature = Some(split.feature);
        node.threshold = split.threshold;
        node.left = left;
        node.right = right;

        node_index
    }

    /// Per-class weight sums over the given sample indices
    fn class_weights(&self, indices: &[usize]) -> Vec<f64> {
        let mut sums = vec![0.0; self.n_classes];
        for &i in indices {
            sums[self.y[i]] += self.weights[i];
        }
        sums
    }

    /// Best weighted-Gini split over a random candidate feature subset
    fn best_split(&mut self, indices: &[usize], node_gini: f64, node_weight: f64) -> Option<Split> {
        let n_features = self.x[0].len();
        let candidates =
            rand::seq::index::sample(self.rng, n_features, self.settings.n_candidate_features);

        let mut best: Option<(usize, f64, f64)> = None;

        for feature in candidates {
            let mut ordered: Vec<usize> = indices.to_vec();
            ordered.sort_by(|&a, &b| {
                self.x[a][feature]
                    .partial_cmp(&self.x[b][feature])
                    .expect("feature values are finite")
            });

            let mut left_weights = vec![0.0; self.n_classes];
            let mut left_weight = 0.0;
            let mut running_right = self.class_weights(&ordered);
            for boundary in 1..ordered.len() {
                let moved = ordered[boundary - 1];
                left_weights[self.y[moved]] += self.weights[moved];
                left_weight += self.weights[moved];
                running_right[self.y[moved]] -= self.weights[moved];

                let prev_value = self.x[ordered[boundary - 1]][feature];
                let value = self.x[ordered[boundary]][feature];
                if value <= prev_value {
                    continue;
                }
                if boundary < self.settings.min_samples_leaf
                    || ordered.len() - boundary < self.settings.min_samples_leaf
                {
                    continue;
                }

                let right_weight = node_weight - left_weight;
                let gain = node_gini
                    - left_weight / node_weight * gini(&left_weights, left_weight)
                    - right_weight / node_weight * gini(&running_right, right_weight);

                let threshold = prev_value + (value - prev_value) / 2.0;
                if best.map_or(true, |(_, _, best_gain)| gain > best_gain) {
                    best = Some((feature, threshold, gain));
                }
            }
        }

        let (feature, threshold, gain) = best?;
        if gain <= 0.0 {
            return None;
        }

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| self.x[i][feature] <= threshold);

        Some(Split {
            feature,
            threshold,
            gain,
            left,
            right,
        })
    }
}

/// Weighted Gini impurity: 1 - sum((w_c / total)^2)
fn gini(class_weights: &[f64], total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - class_weights
        .iter()
        .map(|w| {
            let p = w / total;
            p * p
        })
        .sum::<f64>()
}
