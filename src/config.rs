//! Configuration management for the outbreak risk pipeline

use crate::model::trainer::Hyperparameters;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub training: Hyperparameters,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
}

/// Synthetic data generation and splitting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Number of synthetic samples to generate
    pub n_samples: usize,
    /// Seed for reproducible generation and splitting
    pub seed: u64,
    /// Fraction of data held out for evaluation
    pub test_fraction: f64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            n_samples: 1000,
            seed: 42,
            test_fraction: 0.2,
        }
    }
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Filesystem path for the serialized model artifact
    pub artifact_path: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: "outbreak_model.json".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file location
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
