//! Feature encoding for outbreak samples and prediction requests.
//!
//! Raw records become fixed-width numeric vectors: numeric fields pass
//! through unchanged and the categorical region expands to one indicator
//! column per known region. Column order is the canonical schema captured
//! at training time.

use crate::error::{PipelineError, Result};
use crate::types::{RiskLevel, Sample};
use std::collections::HashMap;

/// Numeric feature columns, in schema order
pub const NUMERIC_COLUMNS: [&str; 7] = [
    "avg_temperature",
    "rainfall",
    "humidity",
    "population_density",
    "healthcare_access",
    "historical_cases",
    "month",
];

/// Encoder over a fixed, externally supplied set of known regions.
///
/// Indicator column order follows the region set's enumeration order, never
/// sorted order or input order. Unknown regions encode as an all-zero
/// indicator block rather than failing.
pub struct FeatureEncoder {
    regions: Vec<String>,
}

impl FeatureEncoder {
    /// Create an encoder for the given known-region set
    pub fn new<S: AsRef<str>>(regions: &[S]) -> Self {
        Self {
            regions: regions.iter().map(|r| r.as_ref().to_string()).collect(),
        }
    }

    /// The canonical feature schema: numeric columns, then region indicators
    pub fn schema(&self) -> Vec<String> {
        NUMERIC_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.regions.iter().map(|r| format!("region_{}", r)))
            .collect()
    }

    /// Encode one labeled sample into schema order
    pub fn encode(&self, sample: &Sample) -> Vec<f64> {
        let mut features = Vec::with_capacity(NUMERIC_COLUMNS.len() + self.regions.len());
        features.push(sample.avg_temperature);
        features.push(sample.rainfall);
        features.push(sample.humidity);
        features.push(sample.population_density);
        features.push(sample.healthcare_access);
        features.push(f64::from(sample.historical_cases));
        features.push(f64::from(sample.month));
        for region in &self.regions {
            features.push(if *region == sample.region { 1.0 } else { 0.0 });
        }
        features
    }

    /// Encode a batch, separating feature rows from labels
    pub fn encode_batch(&self, samples: &[Sample]) -> (Vec<Vec<f64>>, Vec<RiskLevel>) {
        let features = samples.iter().map(|s| self.encode(s)).collect();
        let labels = samples.iter().map(|s| s.outbreak_risk).collect();
        (features, labels)
    }

    /// Align named values to a schema, zero-filling absent columns.
    ///
    /// Pure schema-reconciliation step: values whose names are not in the
    /// schema are ignored, and the result always has exactly `schema.len()`
    /// entries in schema order. Zero-filling is a deliberately permissive
    /// default; it can mask malformed inputs, so strict callers should use
    /// [`FeatureEncoder::reconcile_strict`].
    pub fn reconcile(values: &HashMap<String, f64>, schema: &[String]) -> Vec<f64> {
        schema
            .iter()
            .map(|column| values.get(column).copied().unwrap_or(0.0))
            .collect()
    }

    /// Strict reconciliation: every non-indicator schema column must be
    /// present in `values`, otherwise fails naming the missing columns.
    ///
    /// Region indicator columns are exempt: a well-formed request supplies
    /// exactly one of them (or none, for an unknown region).
    pub fn reconcile_strict(values: &HashMap<String, f64>, schema: &[String]) -> Result<Vec<f64>> {
        let missing: Vec<String> = schema
            .iter()
            .filter(|column| !column.starts_with("region_") && !values.contains_key(*column))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::SchemaMismatch { missing });
        }
        Ok(Self::reconcile(values, schema))
    }
}
