//! Regression models and the persisted model bundle

pub mod decision_tree;
pub mod gradient_boosting;
pub mod random_forest;

pub use decision_tree::RegressionTree;
pub use gradient_boosting::{GradientBoostingConfig, GradientBoostingRegressor};
pub use random_forest::RandomForestRegressor;

use crate::config::ModelConfig;
use crate::error::Result;
use crate::features::FeaturePipeline;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Supported model types. Config names match these variants exactly, so an
/// unknown name fails at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    RandomForestRegressor,
    GradientBoostingRegressor,
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::RandomForestRegressor => write!(f, "RandomForestRegressor"),
            ModelType::GradientBoostingRegressor => write!(f, "GradientBoostingRegressor"),
        }
    }
}

/// Dispatch wrapper over the fitted model types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Regressor {
    RandomForest(RandomForestRegressor),
    GradientBoosting(GradientBoostingRegressor),
}

impl Regressor {
    /// Construct an unfitted model from config; unset params fall back to
    /// model defaults, and the experiment seed is used unless the params
    /// block overrides it.
    pub fn from_config(config: &ModelConfig, default_seed: u64) -> Self {
        let params = &config.params;
        let seed = params.random_state.unwrap_or(default_seed);

        match config.model_type {
            ModelType::RandomForestRegressor => {
                let mut rf = RandomForestRegressor::new(params.n_estimators.unwrap_or(100))
                    .with_random_state(seed);
                if let Some(d) = params.max_depth {
                    rf = rf.with_max_depth(d);
                }
                if let Some(s) = params.min_samples_split {
                    rf = rf.with_min_samples_split(s);
                }
                if let Some(l) = params.min_samples_leaf {
                    rf = rf.with_min_samples_leaf(l);
                }
                Regressor::RandomForest(rf)
            }
            ModelType::GradientBoostingRegressor => {
                let defaults = GradientBoostingConfig::default();
                Regressor::GradientBoosting(GradientBoostingRegressor::new(
                    GradientBoostingConfig {
                        n_estimators: params.n_estimators.unwrap_or(defaults.n_estimators),
                        learning_rate: params.learning_rate.unwrap_or(defaults.learning_rate),
                        max_depth: params.max_depth.unwrap_or(defaults.max_depth),
                        min_samples_leaf: params
                            .min_samples_leaf
                            .unwrap_or(defaults.min_samples_leaf),
                        subsample: params.subsample.unwrap_or(defaults.subsample),
                        random_state: Some(seed),
                    },
                ))
            }
        }
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        match self {
            Regressor::RandomForest(rf) => {
                rf.fit(x, y)?;
                Ok(())
            }
            Regressor::GradientBoosting(gb) => gb.fit(x, y),
        }
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            Regressor::RandomForest(rf) => rf.predict(x),
            Regressor::GradientBoosting(gb) => gb.predict(x),
        }
    }

    pub fn feature_importances(&self) -> Option<Vec<f64>> {
        match self {
            Regressor::RandomForest(rf) => rf.feature_importances().map(|a| a.to_vec()),
            Regressor::GradientBoosting(gb) => Some(gb.feature_importances().to_vec()),
        }
    }
}

/// Fitted pipeline plus fitted model, persisted as one JSON artifact so
/// serving always applies the exact transformations it was trained with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    pub pipeline: FeaturePipeline,
    pub model: Regressor,
}

impl ModelBundle {
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let bundle: Self = serde_json::from_str(&json)?;
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelParams;

    #[test]
    fn test_model_type_serde_names() {
        let json = serde_json::to_string(&ModelType::RandomForestRegressor).unwrap();
        assert_eq!(json, "\"RandomForestRegressor\"");
        let parsed: ModelType = serde_json::from_str("\"GradientBoostingRegressor\"").unwrap();
        assert_eq!(parsed, ModelType::GradientBoostingRegressor);
    }

    #[test]
    fn test_unknown_model_type_rejected() {
        let result: std::result::Result<ModelType, _> =
            serde_json::from_str("\"LinearRegression\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_config_applies_params() {
        let config = ModelConfig {
            model_type: ModelType::RandomForestRegressor,
            params: ModelParams {
                n_estimators: Some(7),
                max_depth: Some(4),
                ..Default::default()
            },
        };

        match Regressor::from_config(&config, 42) {
            Regressor::RandomForest(rf) => {
                assert_eq!(rf.n_estimators, 7);
                assert_eq!(rf.max_depth, Some(4));
                assert_eq!(rf.random_state, Some(42));
            }
            _ => panic!("expected random forest"),
        }
    }
}
