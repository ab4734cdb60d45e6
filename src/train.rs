//! Training orchestrator

use crate::config::ExperimentConfig;
use crate::data::{self, TARGET_COLUMN, VALID_FRACTION};
use crate::error::{PipelineError, Result};
use crate::features::{to_feature_matrix, FeaturePipeline};
use crate::metrics::{MetricsLog, MetricsRecord, RegressionMetrics};
use crate::model::{ModelBundle, Regressor};
use crate::paths::ProjectPaths;
use std::path::Path;
use tracing::{debug, info};

/// Train one experiment from a YAML config against the default layout
pub fn train(config_path: &Path) -> Result<MetricsRecord> {
    train_at(config_path, &ProjectPaths::new())
}

/// Train one experiment rooted at the given layout:
/// load → split → fit pipeline on train only → fit model → validate →
/// persist bundle → append metrics.
pub fn train_at(config_path: &Path, paths: &ProjectPaths) -> Result<MetricsRecord> {
    let config = ExperimentConfig::load(config_path)?;
    info!(
        experiment = %config.experiment_name,
        pipeline = %config.feature_pipeline,
        model = %config.model.model_type,
        seed = config.random_state,
        "starting training run"
    );

    let clean_path = paths.clean_dataset();
    if !clean_path.exists() {
        return Err(PipelineError::DataError(format!(
            "clean dataset not found at {}; run the download step first",
            clean_path.display()
        )));
    }
    let df = data::load_csv(&clean_path)?;

    let (train_df, valid_df) = data::train_valid_split(&df, VALID_FRACTION, config.random_state)?;
    info!(train_rows = train_df.height(), valid_rows = valid_df.height(), "split dataset");

    let y_train = data::target_values(&train_df)?;
    let y_valid = data::target_values(&valid_df)?;
    let x_train_df = train_df.drop(TARGET_COLUMN)?;
    let x_valid_df = valid_df.drop(TARGET_COLUMN)?;

    let mut pipeline = FeaturePipeline::build(config.feature_pipeline, &df);
    let train_features = pipeline.fit_transform(&x_train_df)?;
    let valid_features = pipeline.transform(&x_valid_df)?;
    info!(n_features = train_features.width(), "fitted feature pipeline");

    let x_train = to_feature_matrix(&train_features)?;
    let x_valid = to_feature_matrix(&valid_features)?;

    let mut model = Regressor::from_config(&config.model, config.random_state);
    model.fit(&x_train, &y_train)?;

    if let Some(importances) = model.feature_importances() {
        log_top_features(&train_features, &importances);
    }

    let predictions = model.predict(&x_valid)?;
    let metrics = RegressionMetrics::compute(&y_valid, &predictions);
    info!(rmse = metrics.rmse, r2 = metrics.r2, "validation metrics");

    let bundle_path = paths.model_bundle(&config.experiment_name);
    ModelBundle { pipeline, model }.save(&bundle_path)?;
    info!(path = %bundle_path.display(), "saved model bundle");

    let record = MetricsRecord {
        experiment: config.experiment_name,
        rmse: metrics.rmse,
        r2: metrics.r2,
        model_type: config.model.model_type.to_string(),
    };
    MetricsLog::new(paths.metrics_log()).append(record.clone())?;

    Ok(record)
}

fn log_top_features(features: &polars::prelude::DataFrame, importances: &[f64]) {
    let names = features.get_column_names();
    let mut ranked: Vec<(&str, f64)> = names
        .iter()
        .zip(importances.iter())
        .map(|(name, &imp)| (name.as_str(), imp))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (name, importance) in ranked.into_iter().take(5) {
        debug!(feature = name, importance, "top feature");
    }
}
