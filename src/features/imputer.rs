//! Missing value imputation

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Strategy for imputing missing values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace with the column median (numeric only)
    Median,
    /// Replace with the most frequent value
    MostFrequent,
}

/// Per-column imputer fitted on training data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imputer {
    strategy: ImputeStrategy,
    fill_values: HashMap<String, FillValue>,
    is_fitted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum FillValue {
    Numeric(f64),
    Categorical(String),
}

impl Imputer {
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            fill_values: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Fit fill values for the given columns
    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| PipelineError::FeatureNotFound(col_name.clone()))?;

            let fill_value = self.compute_fill_value(column.as_materialized_series())?;
            self.fill_values.insert(col_name.clone(), fill_value);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Fill nulls in all fitted columns present in the frame
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PipelineError::NotFitted);
        }

        let mut result = df.clone();

        for (col_name, fill_value) in &self.fill_values {
            if let Ok(col) = df.column(col_name) {
                let filled = Self::fill_series(col.as_materialized_series(), fill_value)?;
                result = result.with_column(filled)?.clone();
            }
        }

        Ok(result)
    }

    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    fn compute_fill_value(&self, series: &Series) -> Result<FillValue> {
        match self.strategy {
            ImputeStrategy::Median => {
                let median = series
                    .f64()
                    .map_err(|e| PipelineError::DataError(e.to_string()))?
                    .median()
                    .unwrap_or(0.0);
                Ok(FillValue::Numeric(median))
            }
            ImputeStrategy::MostFrequent => {
                if series.dtype() == &DataType::String {
                    Ok(FillValue::Categorical(Self::mode_string(series)?))
                } else {
                    Ok(FillValue::Numeric(Self::mode_numeric(series)?))
                }
            }
        }
    }

    /// Mode of a string series; ties break toward the smaller value so the
    /// fitted state is stable across runs.
    fn mode_string(series: &Series) -> Result<String> {
        let mut counts: HashMap<String, usize> = HashMap::new();

        if let Ok(ca) = series.str() {
            for val in ca.into_iter().flatten() {
                *counts.entry(val.to_string()).or_insert(0) += 1;
            }
        }

        let mode = counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
            .map(|(value, _)| value)
            .unwrap_or_default();

        Ok(mode)
    }

    /// Mode of a numeric series with the same stable tie-break.
    fn mode_numeric(series: &Series) -> Result<f64> {
        let ca = series
            .cast(&DataType::Float64)?
            .f64()
            .map_err(|e| PipelineError::DataError(e.to_string()))?
            .clone();

        let mut counts: HashMap<u64, usize> = HashMap::new();
        for val in ca.into_iter().flatten() {
            *counts.entry(val.to_bits()).or_insert(0) += 1;
        }

        let mode = counts
            .into_iter()
            .max_by(|a, b| {
                a.1.cmp(&b.1)
                    .then_with(|| f64::from_bits(b.0).partial_cmp(&f64::from_bits(a.0)).unwrap_or(std::cmp::Ordering::Equal))
            })
            .map(|(bits, _)| f64::from_bits(bits))
            .unwrap_or(0.0);

        Ok(mode)
    }

    fn fill_series(series: &Series, fill_value: &FillValue) -> Result<Series> {
        match fill_value {
            FillValue::Numeric(val) => {
                let ca = series
                    .f64()
                    .map_err(|e| PipelineError::DataError(e.to_string()))?;

                let filled: Float64Chunked = ca
                    .into_iter()
                    .map(|opt| Some(opt.unwrap_or(*val)))
                    .collect();

                Ok(filled.with_name(series.name().clone()).into_series())
            }
            FillValue::Categorical(val) => {
                let ca = series
                    .str()
                    .map_err(|e| PipelineError::DataError(e.to_string()))?;

                let filled: StringChunked = ca
                    .into_iter()
                    .map(|opt| Some(opt.unwrap_or(val.as_str()).to_string()))
                    .collect();

                Ok(filled.with_name(series.name().clone()).into_series())
            }
        }
    }
}
