//! Experiment configuration (YAML)

use crate::error::{PipelineError, Result};
use crate::features::PipelineKind;
use crate::model::ModelType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One training experiment, loaded from a YAML file.
///
/// Unknown pipeline or model names fail at load, before any artifact is
/// touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub experiment_name: String,
    pub feature_pipeline: PipelineKind,
    pub model: ModelConfig,
    #[serde(default = "default_random_state")]
    pub random_state: u64,
}

fn default_random_state() -> u64 {
    42
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(rename = "type")]
    pub model_type: ModelType,
    #[serde(default)]
    pub params: ModelParams,
}

/// Optional hyperparameters; anything unset uses the model's defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelParams {
    pub n_estimators: Option<usize>,
    pub max_depth: Option<usize>,
    pub min_samples_split: Option<usize>,
    pub min_samples_leaf: Option<usize>,
    pub learning_rate: Option<f64>,
    pub subsample: Option<f64>,
    pub random_state: Option<u64>,
}

impl ExperimentConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&text)
    }

    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        if config.experiment_name.is_empty() {
            return Err(PipelineError::ConfigError(
                "experiment_name must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
experiment_name: engineered
feature_pipeline: engineered
model:
  type: GradientBoostingRegressor
  params:
    n_estimators: 200
    learning_rate: 0.05
random_state: 7
"#;
        let config = ExperimentConfig::parse(yaml).unwrap();
        assert_eq!(config.experiment_name, "engineered");
        assert_eq!(config.feature_pipeline, PipelineKind::Engineered);
        assert_eq!(config.model.model_type, ModelType::GradientBoostingRegressor);
        assert_eq!(config.model.params.n_estimators, Some(200));
        assert_eq!(config.random_state, 7);
    }

    #[test]
    fn test_random_state_defaults_to_42() {
        let yaml = r#"
experiment_name: baseline
feature_pipeline: baseline
model:
  type: RandomForestRegressor
"#;
        let config = ExperimentConfig::parse(yaml).unwrap();
        assert_eq!(config.random_state, 42);
        assert!(config.model.params.n_estimators.is_none());
    }

    #[test]
    fn test_unknown_pipeline_kind_fails() {
        let yaml = r#"
experiment_name: x
feature_pipeline: quantum
model:
  type: RandomForestRegressor
"#;
        assert!(matches!(
            ExperimentConfig::parse(yaml),
            Err(PipelineError::ConfigError(_))
        ));
    }

    #[test]
    fn test_unknown_model_type_fails() {
        let yaml = r#"
experiment_name: x
feature_pipeline: baseline
model:
  type: SupportVectorMachine
"#;
        assert!(matches!(
            ExperimentConfig::parse(yaml),
            Err(PipelineError::ConfigError(_))
        ));
    }

    #[test]
    fn test_empty_experiment_name_fails() {
        let yaml = r#"
experiment_name: ""
feature_pipeline: baseline
model:
  type: RandomForestRegressor
"#;
        assert!(matches!(
            ExperimentConfig::parse(yaml),
            Err(PipelineError::ConfigError(_))
        ));
    }
}
