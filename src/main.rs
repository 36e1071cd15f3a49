//! Outbreak Risk Pipeline - Training Entry Point
//!
//! Generates synthetic data, trains the risk classifier, evaluates it on a
//! held-out split and saves the model artifact.

use anyhow::Result;
use outbreak_risk_pipeline::{
    config::AppConfig,
    encoder::FeatureEncoder,
    generator::{SyntheticGenerator, REGIONS},
    model::{JsonModelStore, ModelStore, ModelTrainer},
    splitter::stratified_split,
    types::RiskLevel,
};
use std::path::Path;
use tracing::{info, warn};

fn main() -> Result<()> {
    // Configuration first so the log level can come from it
    let (config, config_err) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    init_logging(&config.logging.level);
    if let Some(e) = config_err {
        warn!(error = %e, "Failed to load configuration, using defaults");
    }

    info!("Starting outbreak risk training pipeline");
    info!(
        n_samples = config.data.n_samples,
        seed = config.data.seed,
        test_fraction = config.data.test_fraction,
        "Configuration loaded"
    );

    // Generate synthetic data
    let mut generator = SyntheticGenerator::new(config.data.seed);
    let samples = generator.generate(config.data.n_samples)?;

    // Encode features
    let encoder = FeatureEncoder::new(&REGIONS);
    let (features, labels) = encoder.encode_batch(&samples);
    info!(
        rows = features.len(),
        columns = encoder.schema().len(),
        "Features encoded"
    );

    // Stratified split
    let split = stratified_split(
        &features,
        &labels,
        config.data.test_fraction,
        config.data.seed,
    )?;
    info!(
        train = split.x_train.len(),
        test = split.x_test.len(),
        "Data split"
    );

    // Train
    let model = ModelTrainer::train(
        &split.x_train,
        &split.y_train,
        encoder.schema(),
        &config.training,
    )?;

    // Evaluate
    let report = ModelTrainer::evaluate(&model, &split.x_test, &split.y_test);
    info!(
        accuracy = format!("{:.3}", report.accuracy),
        weighted_f1 = format!("{:.3}", report.weighted_f1),
        "Evaluation results"
    );
    for (actual, row) in RiskLevel::ALL.iter().zip(report.confusion_matrix) {
        info!(
            actual = %actual,
            low = row[0],
            medium = row[1],
            high = row[2],
            "Confusion matrix row"
        );
    }

    // Feature importances
    for (rank, (name, score)) in ModelTrainer::feature_importance(&model, 10)
        .iter()
        .enumerate()
    {
        info!(rank = rank + 1, feature = %name, importance = format!("{:.4}", score), "Feature importance");
    }

    // Persist the artifact
    let store = JsonModelStore;
    store.save(&model, Path::new(&config.model.artifact_path))?;

    info!(
        artifact = %config.model.artifact_path,
        "Training pipeline completed"
    );
    Ok(())
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!("outbreak_risk_pipeline={level}"))
            }),
        )
        .init();
}
