//! Outbreak risk prediction from a trained model artifact.

use crate::encoder::FeatureEncoder;
use crate::error::Result;
use crate::model::store::{JsonModelStore, ModelStore};
use crate::model::trainer::TrainedModel;
use crate::model::tree::argmax;
use crate::types::{PredictionRequest, PredictionResponse, RiskLevel};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Result of a risk prediction
#[derive(Debug, Clone)]
pub struct PredictionResult {
    /// Predicted risk label
    pub risk_level: RiskLevel,
    /// Probability per risk level (sums to 1)
    pub probabilities: HashMap<RiskLevel, f64>,
    /// Maximum per-class probability
    pub confidence: f64,
}

impl PredictionResult {
    /// Format for the UI layer: probabilities as 3-decimal strings
    pub fn to_response(&self) -> PredictionResponse {
        PredictionResponse {
            risk_level: self.risk_level.to_string(),
            probabilities: self
                .probabilities
                .iter()
                .map(|(level, p)| (level.to_string(), format!("{:.3}", p)))
                .collect(),
            confidence: self.confidence,
        }
    }
}

/// Predictor over an immutable trained model
#[derive(Debug)]
pub struct Predictor {
    model: TrainedModel,
}

impl Predictor {
    /// Wrap an in-memory trained model
    pub fn new(model: TrainedModel) -> Self {
        Self { model }
    }

    /// Load the model artifact from the default JSON store
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_store(&JsonModelStore, path)
    }

    /// Load the model artifact through a specific store
    pub fn with_store<P: AsRef<Path>>(store: &dyn ModelStore, path: P) -> Result<Self> {
        Ok(Self {
            model: store.load(path.as_ref())?,
        })
    }

    /// The underlying trained model
    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    /// Predict outbreak risk for an arbitrary input record.
    ///
    /// The record is aligned to the model's stored schema: absent columns
    /// zero-fill and columns reorder to match the training-time order
    /// exactly.
    pub fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult> {
        let values = request.to_values();
        let features = FeatureEncoder::reconcile(&values, &self.model.feature_names);

        let proba = self.model.forest.predict_proba(&features);
        let winner = argmax(&proba);
        let risk_level = self.model.risk_levels[winner];
        let confidence = proba[winner];

        let probabilities: HashMap<RiskLevel, f64> = self
            .model
            .risk_levels
            .iter()
            .copied()
            .zip(proba)
            .collect();

        debug!(
            risk_level = %risk_level,
            confidence = format!("{:.3}", confidence),
            "Prediction complete"
        );

        Ok(PredictionResult {
            risk_level,
            probabilities,
            confidence,
        })
    }

    /// Recommended actions for a risk level.
    ///
    /// Static lookup over the three known levels; an unrecognized level
    /// yields a single fallback entry and never fails.
    pub fn recommendations(risk_level: &str) -> Vec<String> {
        let items: &[&str] = match risk_level {
            "Low" => &[
                "Continue routine surveillance",
                "Maintain standard prevention measures",
                "Monitor climate changes",
            ],
            "Medium" => &[
                "Increase surveillance frequency",
                "Stockpile essential medications",
                "Community awareness campaigns",
                "Enhanced mosquito control measures",
            ],
            "High" => &[
                "Activate emergency response plan",
                "Deploy rapid response teams",
                "Mass distribution of prevention tools",
                "Coordinate with regional health authorities",
                "Prepare healthcare facilities for increased cases",
            ],
            _ => &["No specific recommendations available"],
        };
        items.iter().map(|s| s.to_string()).collect()
    }
}
