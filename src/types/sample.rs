//! Sample and prediction request/response data structures

use crate::types::risk::RiskLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One labeled record of climate and health observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Region name, one of the known region set
    pub region: String,

    /// Average temperature in °C
    pub avg_temperature: f64,

    /// Monthly rainfall in mm
    pub rainfall: f64,

    /// Relative humidity in percent
    pub humidity: f64,

    /// Population density in people per km²
    pub population_density: f64,

    /// Healthcare access index in [0, 1]
    pub healthcare_access: f64,

    /// Historical case count
    pub historical_cases: u32,

    /// Month of year (1-12)
    pub month: u32,

    /// Derived outbreak risk label
    pub outbreak_risk: RiskLevel,
}

/// Prediction request consumed from the UI layer.
///
/// All fields are optional: absent numeric fields zero-fill during schema
/// reconciliation, and an unknown (or absent) region encodes as an all-zero
/// indicator block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub avg_temperature: Option<f64>,
    pub rainfall: Option<f64>,
    pub humidity: Option<f64>,
    pub population_density: Option<f64>,
    pub healthcare_access: Option<f64>,
    pub historical_cases: Option<u32>,
    pub month: Option<u32>,
    /// Region as a string name, not pre-encoded
    pub region: Option<String>,
}

impl PredictionRequest {
    /// Named column values for schema reconciliation.
    ///
    /// Numeric fields map to their own column names; the region maps to its
    /// one-hot indicator column (`region_<name>`).
    pub fn to_values(&self) -> HashMap<String, f64> {
        let mut values = HashMap::new();
        let numeric = [
            ("avg_temperature", self.avg_temperature),
            ("rainfall", self.rainfall),
            ("humidity", self.humidity),
            ("population_density", self.population_density),
            ("healthcare_access", self.healthcare_access),
            ("historical_cases", self.historical_cases.map(f64::from)),
            ("month", self.month.map(f64::from)),
        ];
        for (name, value) in numeric {
            if let Some(v) = value {
                values.insert(name.to_string(), v);
            }
        }
        if let Some(region) = &self.region {
            values.insert(format!("region_{}", region), 1.0);
        }
        values
    }
}

/// Prediction response produced for the UI layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Risk label, one of Low/Medium/High
    pub risk_level: String,

    /// Per-level probabilities formatted to 3 decimals
    pub probabilities: HashMap<String, String>,

    /// Maximum per-class probability
    pub confidence: f64,
}
