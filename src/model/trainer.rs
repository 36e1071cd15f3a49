//! Random-forest training and evaluation.

use crate::error::{PipelineError, Result};
use crate::model::forest::RandomForest;
use crate::types::RiskLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

/// Recognized training hyperparameters. Defaults match the reference
/// configuration: 100 trees capped at depth 10, balanced class weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// Ensemble size
    pub n_estimators: usize,
    /// Per-tree depth cap
    pub max_depth: usize,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Minimum samples required in each child
    pub min_samples_leaf: usize,
    /// Class weighting scheme
    pub class_weight: ClassWeight,
    /// Seed for reproducible training
    pub random_state: u64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 2,
            class_weight: ClassWeight::Balanced,
            random_state: 42,
        }
    }
}

/// Class weighting scheme for the training loss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassWeight {
    /// Rebalance inversely to class frequency
    #[default]
    Balanced,
    /// Every sample weighs the same
    Uniform,
}

/// A trained model artifact: the fitted classifier plus the canonical
/// feature schema and label ordering captured at fit time. Immutable once
/// saved; a new training run produces a new artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    pub forest: RandomForest,
    /// Ordered feature-column names used at fit time (canonical schema)
    pub feature_names: Vec<String>,
    /// Ordered risk-level labels matching the forest's class indices
    pub risk_levels: Vec<RiskLevel>,
    pub trained_at: DateTime<Utc>,
}

/// Evaluation metrics on a held-out subset
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub weighted_f1: f64,
    /// Indexed `[actual][predicted]` in canonical label order
    pub confusion_matrix: [[usize; 3]; 3],
}

/// Trainer/evaluator for the outbreak risk classifier
pub struct ModelTrainer;

impl ModelTrainer {
    /// Fit a forest on the training subset.
    ///
    /// Fails with [`PipelineError::DegenerateTrainingSet`] when fewer than
    /// 2 distinct classes are present.
    pub fn train(
        x_train: &[Vec<f64>],
        y_train: &[RiskLevel],
        feature_names: Vec<String>,
        hp: &Hyperparameters,
    ) -> Result<TrainedModel> {
        let distinct: HashSet<RiskLevel> = y_train.iter().copied().collect();
        if distinct.len() < 2 {
            return Err(PipelineError::DegenerateTrainingSet {
                n_classes: distinct.len(),
            });
        }

        info!(
            samples = x_train.len(),
            features = feature_names.len(),
            n_estimators = hp.n_estimators,
            max_depth = hp.max_depth,
            "Training random forest"
        );

        let y_indices: Vec<usize> = y_train.iter().map(|l| l.index()).collect();
        let forest = RandomForest::fit(x_train, &y_indices, RiskLevel::ALL.len(), hp)?;

        info!(trees = forest.n_trees(), "Model training completed");

        Ok(TrainedModel {
            forest,
            feature_names,
            risk_levels: RiskLevel::ALL.to_vec(),
            trained_at: Utc::now(),
        })
    }

    /// Evaluate accuracy, weighted F1 and the confusion matrix on held-out data
    pub fn evaluate(model: &TrainedModel, x_test: &[Vec<f64>], y_test: &[RiskLevel]) -> EvaluationReport {
        let mut confusion = [[0usize; 3]; 3];
        let mut correct = 0usize;

        for (features, actual) in x_test.iter().zip(y_test) {
            let predicted = model.forest.predict(features);
            confusion[actual.index()][predicted] += 1;
            if predicted == actual.index() {
                correct += 1;
            }
        }

        let total = x_test.len().max(1);
        let accuracy = correct as f64 / total as f64;
        let weighted_f1 = weighted_f1(&confusion, total);

        info!(
            accuracy = format!("{:.3}", accuracy),
            weighted_f1 = format!("{:.3}", weighted_f1),
            "Model evaluation complete"
        );

        EvaluationReport {
            accuracy,
            weighted_f1,
            confusion_matrix: confusion,
        }
    }

    /// Top-N features by importance, descending; ties keep original column order
    pub fn feature_importance(model: &TrainedModel, top_n: usize) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = model
            .feature_names
            .iter()
            .cloned()
            .zip(model.forest.feature_importances())
            .collect();
        // Stable sort preserves column order among equal scores
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).expect("importances are finite"));
        ranked.truncate(top_n);
        ranked
    }
}

/// Weighted F1: per-class F1 scores weighted by class support
fn weighted_f1(confusion: &[[usize; 3]; 3], total: usize) -> f64 {
    let mut score = 0.0;
    for class in 0..3 {
        let support: usize = confusion[class].iter().sum();
        if support == 0 {
            continue;
        }
        let tp = confusion[class][class];
        let predicted: usize = (0..3).map(|actual| confusion[actual][class]).sum();

        let precision = if predicted > 0 {
            tp as f64 / predicted as f64
        } else {
            0.0
        };
        let recall = tp as f64 / support as f64;
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        score += support as f64 / total as f64 * f1;
    }
    score
}
