//! Random forest: bootstrap ensemble of decision trees.
//!
//! Each tree fits on a bootstrap resample of the training data with √d
//! candidate features per split. Probabilities average the per-leaf class
//! distributions across trees, so the vector sums to 1 and tracks ensemble
//! agreement rather than a hard vote count.

use crate::error::{PipelineError, Result};
use crate::model::trainer::{ClassWeight, Hyperparameters};
use crate::model::tree::{argmax, DecisionTree, TreeSettings};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A fitted random-forest classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
    n_classes: usize,
}

impl RandomForest {
    /// Fit a forest. `y` holds class indices < `n_classes`.
    pub fn fit(
        x: &[Vec<f64>],
        y: &[usize],
        n_classes: usize,
        hp: &Hyperparameters,
    ) -> Result<Self> {
        if x.is_empty() || x.len() != y.len() {
            return Err(PipelineError::EmptyDataset(format!(
                "cannot fit on {} feature rows against {} labels",
                x.len(),
                y.len()
            )));
        }
        let n_features = x[0].len();
        let n = x.len();

        let mut counts = vec![0usize; n_classes];
        for &class in y {
            counts[class] += 1;
        }
        let present = counts.iter().filter(|&&c| c > 0).count();

        // "balanced" reweights each class inversely to its frequency,
        // mirroring sklearn: n / (n_present_classes * count_c)
        let class_weight: Vec<f64> = match hp.class_weight {
            ClassWeight::Balanced => counts
                .iter()
                .map(|&c| {
                    if c > 0 {
                        n as f64 / (present as f64 * c as f64)
                    } else {
                        0.0
                    }
                })
                .collect(),
            ClassWeight::Uniform => vec![1.0; n_classes],
        };

        let settings = TreeSettings {
            max_depth: hp.max_depth,
            min_samples_split: hp.min_samples_split,
            min_samples_leaf: hp.min_samples_leaf,
            n_candidate_features: ((n_features as f64).sqrt().round() as usize).max(1),
        };

        let mut rng = ChaCha8Rng::seed_from_u64(hp.random_state);
        let mut trees = Vec::with_capacity(hp.n_estimators);
        for i in 0..hp.n_estimators {
            let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let xb: Vec<Vec<f64>> = indices.iter().map(|&j| x[j].clone()).collect();
            let yb: Vec<usize> = indices.iter().map(|&j| y[j]).collect();
            let wb: Vec<f64> = yb.iter().map(|&class| class_weight[class]).collect();

            let tree = DecisionTree::fit(&xb, &yb, &wb, n_classes, &settings, &mut rng);
            debug!(tree = i, nodes = tree.node_count(), "Fitted tree");
            trees.push(tree);
        }

        Ok(Self {
            trees,
            n_features,
            n_classes,
        })
    }

    /// Per-class probabilities, averaged over tree leaf distributions
    pub fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let mut acc = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (sum, p) in acc.iter_mut().zip(tree.predict_proba(features)) {
                *sum += p;
            }
        }
        for sum in &mut acc {
            *sum /= self.trees.len() as f64;
        }
        acc
    }

    /// Predicted class index (earliest index wins ties)
    pub fn predict(&self, features: &[f64]) -> usize {
        argmax(&self.predict_proba(features))
    }

    /// Mean per-feature importance over trees, normalized to sum to 1
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut mean = vec![0.0; self.n_features];
        for tree in &self.trees {
            for (sum, imp) in mean.iter_mut().zip(tree.importances()) {
                *sum += imp;
            }
        }
        let total: f64 = mean.iter().sum();
        if total > 0.0 {
            for value in &mut mean {
                *value /= total;
            }
        }
        mean
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_dataset(n_per_class: usize) -> (Vec<Vec<f64>>, Vec<usize>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for class in 0..3usize {
            for i in 0..n_per_class {
                let center = class as f64 * 10.0;
                x.push(vec![center + (i % 5) as f64 * 0.1, center - (i % 3) as f64 * 0.1]);
                y.push(class);
            }
        }
        (x, y)
    }

    fn hp(n_estimators: usize) -> Hyperparameters {
        Hyperparameters {
            n_estimators,
            ..Hyperparameters::default()
        }
    }

    #[test]
    fn test_fit_and_predict_separable() {
        let (x, y) = separable_dataset(20);
        let forest = RandomForest::fit(&x, &y, 3, &hp(25)).unwrap();

        assert_eq!(forest.n_trees(), 25);
        assert_eq!(forest.predict(&[0.0, 0.0]), 0);
        assert_eq!(forest.predict(&[10.0, 10.0]), 1);
        assert_eq!(forest.predict(&[20.0, 20.0]), 2);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (x, y) = separable_dataset(10);
        let forest = RandomForest::fit(&x, &y, 3, &hp(10)).unwrap();

        let proba = forest.predict_proba(&[10.0, 10.0]);
        assert_eq!(proba.len(), 3);
        let sum: f64 = proba.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_forest() {
        let (x, y) = separable_dataset(10);
        let a = RandomForest::fit(&x, &y, 3, &hp(10)).unwrap();
        let b = RandomForest::fit(&x, &y, 3, &hp(10)).unwrap();

        let input = [5.0, 5.0];
        assert_eq!(a.predict_proba(&input), b.predict_proba(&input));
    }

    #[test]
    fn test_importances_sum_to_one() {
        let (x, y) = separable_dataset(10);
        let forest = RandomForest::fit(&x, &y, 3, &hp(10)).unwrap();

        let importances = forest.feature_importances();
        assert_eq!(importances.len(), 2);
        let sum: f64 = importances.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(
            RandomForest::fit(&[], &[], 3, &hp(5)),
            Err(PipelineError::EmptyDataset(_))
        ));
    }
}
