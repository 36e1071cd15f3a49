//! Model artifact persistence.
//!
//! A narrow store interface keeps the serialization format swappable
//! without touching the trainer or predictor contracts.

use crate::error::{PipelineError, Result};
use crate::model::trainer::TrainedModel;
use std::fs;
use std::path::Path;
use tracing::info;

/// Persistence boundary for trained model artifacts
pub trait ModelStore {
    /// Serialize the model to a single artifact at `path`
    fn save(&self, model: &TrainedModel, path: &Path) -> Result<()>;

    /// Load a model artifact; fails with [`PipelineError::ModelNotFound`]
    /// when no artifact exists at `path`
    fn load(&self, path: &Path) -> Result<TrainedModel>;
}

/// JSON-backed model store. Values round-trip exactly, so a reloaded model
/// predicts identically to the in-memory one.
#[derive(Debug, Clone, Default)]
pub struct JsonModelStore;

impl ModelStore for JsonModelStore {
    fn save(&self, model: &TrainedModel, path: &Path) -> Result<()> {
        let payload = serde_json::to_string(model)?;
        fs::write(path, payload)?;
        info!(path = %path.display(), "Model saved");
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<TrainedModel> {
        if !path.exists() {
            return Err(PipelineError::ModelNotFound {
                path: path.display().to_string(),
            });
        }
        let payload = fs::read_to_string(path)?;
        let model: TrainedModel = serde_json::from_str(&payload)?;
        info!(
            path = %path.display(),
            features = model.feature_names.len(),
            trees = model.forest.n_trees(),
            "Model loaded"
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::trainer::{Hyperparameters, ModelTrainer};
    use crate::types::RiskLevel;

    fn fixture_model() -> TrainedModel {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for (class, level) in RiskLevel::ALL.iter().enumerate() {
            for i in 0..10 {
                x.push(vec![class as f64 * 5.0 + (i % 3) as f64 * 0.1]);
                y.push(*level);
            }
        }
        let hp = Hyperparameters {
            n_estimators: 5,
            min_samples_split: 2,
            min_samples_leaf: 1,
            ..Hyperparameters::default()
        };
        ModelTrainer::train(&x, &y, vec!["x".to_string()], &hp).unwrap()
    }

    #[test]
    fn test_missing_artifact_is_model_not_found() {
        let store = JsonModelStore;
        let err = store.load(Path::new("does_not_exist.json")).unwrap_err();
        assert!(matches!(err, PipelineError::ModelNotFound { .. }));
    }

    #[test]
    fn test_round_trip_predicts_identically() {
        let model = fixture_model();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let store = JsonModelStore;
        store.save(&model, &path).unwrap();
        let reloaded = store.load(&path).unwrap();

        assert_eq!(reloaded.feature_names, model.feature_names);
        assert_eq!(reloaded.risk_levels, model.risk_levels);
        for class in 0..3 {
            let input = [class as f64 * 5.0];
            assert_eq!(
                reloaded.forest.predict_proba(&input),
                model.forest.predict_proba(&input)
            );
        }
    }
}
