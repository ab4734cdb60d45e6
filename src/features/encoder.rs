//! Categorical encoding

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Type of encoder to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncoderType {
    /// One-hot indicator columns; unseen categories encode as all zeros
    OneHot,
    /// Ordinal codes from the fitted category order; unseen encode as -1
    Ordinal,
}

/// Categorical encoder fitted on training data.
///
/// Categories are kept as a sorted list per column so output column order
/// and ordinal codes are identical across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Encoder {
    encoder_type: EncoderType,
    columns: Vec<String>,
    categories: HashMap<String, Vec<String>>,
    is_fitted: bool,
}

impl Encoder {
    pub fn new(encoder_type: EncoderType) -> Self {
        Self {
            encoder_type,
            columns: Vec::new(),
            categories: HashMap::new(),
            is_fitted: false,
        }
    }

    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        self.columns = columns.to_vec();

        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| PipelineError::FeatureNotFound(col_name.clone()))?;
            let ca = column
                .as_materialized_series()
                .str()
                .map_err(|e| PipelineError::DataError(e.to_string()))?
                .clone();

            let mut cats: Vec<String> = ca
                .into_iter()
                .flatten()
                .map(|s| s.to_string())
                .collect();
            cats.sort();
            cats.dedup();

            self.categories.insert(col_name.clone(), cats);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Encode the fitted columns, returning only the encoded output in
    /// fitted column order (callers assemble the final frame).
    pub fn transform(&self, df: &DataFrame) -> Result<Vec<Series>> {
        if !self.is_fitted {
            return Err(PipelineError::NotFitted);
        }

        let mut encoded = Vec::new();

        for col_name in &self.columns {
            let cats = match self.categories.get(col_name) {
                Some(cats) => cats,
                None => continue,
            };
            let column = df
                .column(col_name)
                .map_err(|_| PipelineError::FeatureNotFound(col_name.clone()))?;
            let ca = column
                .as_materialized_series()
                .str()
                .map_err(|e| PipelineError::DataError(e.to_string()))?
                .clone();

            match self.encoder_type {
                EncoderType::OneHot => {
                    for category in cats {
                        let name = format!("{}_{}", col_name, category);
                        let values: Vec<i32> = ca
                            .into_iter()
                            .map(|v| if v == Some(category.as_str()) { 1 } else { 0 })
                            .collect();
                        encoded.push(Series::new(name.into(), values));
                    }
                }
                EncoderType::Ordinal => {
                    let index: HashMap<&str, i64> = cats
                        .iter()
                        .enumerate()
                        .map(|(i, c)| (c.as_str(), i as i64))
                        .collect();
                    let values: Vec<i64> = ca
                        .into_iter()
                        .map(|v| v.and_then(|s| index.get(s).copied()).unwrap_or(-1))
                        .collect();
                    encoded.push(Series::new(col_name.as_str().into(), values));
                }
            }
        }

        Ok(encoded)
    }

    /// Number of output columns the fitted encoder produces
    pub fn output_width(&self) -> usize {
        match self.encoder_type {
            EncoderType::OneHot => self
                .columns
                .iter()
                .filter_map(|c| self.categories.get(c))
                .map(|cats| cats.len())
                .sum(),
            EncoderType::Ordinal => self.columns.len(),
        }
    }
}
