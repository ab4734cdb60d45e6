//! Standardization of numeric features

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters for one fitted column
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerParams {
    mean: f64,
    std: f64,
}

/// Z-score scaler: (x - mean) / std, fitted on training data only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    params: HashMap<String, ScalerParams>,
    is_fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self {
            params: HashMap::new(),
            is_fitted: false,
        }
    }

    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| PipelineError::FeatureNotFound(col_name.clone()))?;
            let ca = column
                .as_materialized_series()
                .f64()
                .map_err(|e| PipelineError::DataError(e.to_string()))?;

            let mean = ca.mean().unwrap_or(0.0);
            let std = ca.std(1).unwrap_or(1.0);
            self.params.insert(
                col_name.clone(),
                ScalerParams {
                    mean,
                    // constant columns pass through unscaled
                    std: if std == 0.0 { 1.0 } else { std },
                },
            );
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Builds all replacement columns first, then applies them in a single
    /// pass (avoids N DataFrame clones for N columns).
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PipelineError::NotFitted);
        }

        let replacements: Vec<Series> = self
            .params
            .iter()
            .filter_map(|(col_name, params)| {
                df.column(col_name).ok().map(|column| {
                    let series = column.as_materialized_series();
                    Self::scale_series(series, params)
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut result = df.clone();
        for scaled in replacements {
            result = result.with_column(scaled)?.clone();
        }

        Ok(result)
    }

    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    fn scale_series(series: &Series, params: &ScalerParams) -> Result<Series> {
        let ca = series
            .f64()
            .map_err(|e| PipelineError::DataError(e.to_string()))?;

        let scaled: Float64Chunked = ca
            .into_iter()
            .map(|opt| opt.map(|v| (v - params.mean) / params.std))
            .collect();

        Ok(scaled.with_name(series.name().clone()).into_series())
    }
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_scaling_centers_mean() {
        let df = DataFrame::new(vec![Column::new(
            "a".into(),
            &[1.0, 2.0, 3.0, 4.0, 5.0],
        )])
        .unwrap();

        let mut scaler = StandardScaler::new();
        let result = scaler.fit_transform(&df, &["a".to_string()]).unwrap();

        let ca = result.column("a").unwrap().f64().unwrap();
        let mean: f64 = ca.into_iter().flatten().sum::<f64>() / 5.0;
        assert!(mean.abs() < 1e-10);
    }

    #[test]
    fn test_constant_column_passes_through_centered() {
        let df = DataFrame::new(vec![Column::new("c".into(), &[7.0, 7.0, 7.0])]).unwrap();

        let mut scaler = StandardScaler::new();
        let result = scaler.fit_transform(&df, &["c".to_string()]).unwrap();

        let ca = result.column("c").unwrap().f64().unwrap();
        for v in ca.into_iter().flatten() {
            assert!((v - 0.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_transform_uses_fitted_params() {
        let train = DataFrame::new(vec![Column::new("a".into(), &[0.0, 10.0])]).unwrap();
        let valid = DataFrame::new(vec![Column::new("a".into(), &[5.0])]).unwrap();

        let mut scaler = StandardScaler::new();
        scaler.fit(&train, &["a".to_string()]).unwrap();
        let result = scaler.transform(&valid).unwrap();

        let ca = result.column("a").unwrap().f64().unwrap();
        // 5.0 is the training mean
        assert!(ca.get(0).unwrap().abs() < 1e-10);
    }
}
