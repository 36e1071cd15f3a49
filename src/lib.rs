//! Outbreak Risk Pipeline Library
//!
//! Generates synthetic climate/health data, trains a random-forest
//! classifier mapping feature vectors to a three-level outbreak-risk
//! category, and serves predictions with per-class probabilities and
//! recommended actions.

pub mod config;
pub mod encoder;
pub mod error;
pub mod generator;
pub mod model;
pub mod predictor;
pub mod splitter;
pub mod types;

pub use config::AppConfig;
pub use encoder::FeatureEncoder;
pub use error::{PipelineError, Result};
pub use generator::SyntheticGenerator;
pub use model::{Hyperparameters, JsonModelStore, ModelStore, ModelTrainer, TrainedModel};
pub use predictor::{PredictionResult, Predictor};
pub use splitter::{stratified_split, SplitData};
pub use types::{PredictionRequest, PredictionResponse, RiskLevel, Sample};
