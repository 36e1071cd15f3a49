//! Stratified train/test splitting.

use crate::error::{PipelineError, Result};
use crate::types::RiskLevel;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

/// Result of a stratified split
#[derive(Debug, Clone)]
pub struct SplitData {
    pub x_train: Vec<Vec<f64>>,
    pub y_train: Vec<RiskLevel>,
    pub x_test: Vec<Vec<f64>>,
    pub y_test: Vec<RiskLevel>,
}

/// Partition encoded data into train/test subsets, stratified by label.
///
/// Each class's test share is rounded independently, so every split
/// preserves the overall class proportions within one sample. Fails with
/// [`PipelineError::InvalidTestFraction`] when `test_fraction` lies outside
/// (0, 1), and with [`PipelineError::InsufficientData`] when any class has
/// fewer than 2 members.
pub fn stratified_split(
    features: &[Vec<f64>],
    labels: &[RiskLevel],
    test_fraction: f64,
    seed: u64,
) -> Result<SplitData> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(PipelineError::InvalidTestFraction(test_fraction));
    }
    if features.is_empty() || features.len() != labels.len() {
        return Err(PipelineError::EmptyDataset(format!(
            "cannot split {} feature rows against {} labels",
            features.len(),
            labels.len()
        )));
    }

    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); RiskLevel::ALL.len()];
    for (i, label) in labels.iter().enumerate() {
        by_class[label.index()].push(i);
    }

    for (class_index, members) in by_class.iter().enumerate() {
        if !members.is_empty() && members.len() < 2 {
            return Err(PipelineError::InsufficientData {
                class: RiskLevel::ALL[class_index].to_string(),
                count: members.len(),
            });
        }
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut split = SplitData {
        x_train: Vec::new(),
        y_train: Vec::new(),
        x_test: Vec::new(),
        y_test: Vec::new(),
    };

    for members in &mut by_class {
        if members.is_empty() {
            continue;
        }
        members.shuffle(&mut rng);

        let mut n_test = (members.len() as f64 * test_fraction).round() as usize;
        // Keep at least one member on the training side
        if n_test == members.len() {
            n_test -= 1;
        }

        for (position, &index) in members.iter().enumerate() {
            if position < n_test {
                split.x_test.push(features[index].clone());
                split.y_test.push(labels[index]);
            } else {
                split.x_train.push(features[index].clone());
                split.y_train.push(labels[index]);
            }
        }
    }

    info!(
        train = split.x_train.len(),
        test = split.x_test.len(),
        "Stratified split complete"
    );

    Ok(split)
}
