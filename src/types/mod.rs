//! Type definitions for the outbreak risk pipeline

pub mod risk;
pub mod sample;

pub use risk::RiskLevel;
pub use sample::{PredictionRequest, PredictionResponse, Sample};
