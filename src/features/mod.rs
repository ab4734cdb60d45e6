//! Feature pipelines: baseline and engineered
//!
//! A pipeline is built from a schema sample, fitted on training data only,
//! and applied to validation or serving frames with no re-estimation. The
//! output column order is fixed: numeric features first (in detection
//! order), then the encoded categorical block.

pub mod derived;
pub mod encoder;
pub mod imputer;
pub mod scaler;
pub mod transforms;

pub use derived::{apply_derived, DERIVED_FEATURES};
pub use encoder::{Encoder, EncoderType};
pub use imputer::{ImputeStrategy, Imputer};
pub use scaler::StandardScaler;
pub use transforms::safe_log1p;

use crate::data::TARGET_COLUMN;
use crate::error::{PipelineError, Result};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two supported pipeline variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineKind {
    /// Median impute, standardize, one-hot encode
    Baseline,
    /// Adds derived columns, safe log1p, and ordinal encoding
    Engineered,
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineKind::Baseline => write!(f, "baseline"),
            PipelineKind::Engineered => write!(f, "engineered"),
        }
    }
}

/// Leakage-safe feature pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturePipeline {
    kind: PipelineKind,
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
    numeric_imputer: Imputer,
    categorical_imputer: Imputer,
    scaler: StandardScaler,
    encoder: Encoder,
    is_fitted: bool,
}

impl FeaturePipeline {
    /// Build an unfitted pipeline from a schema sample. Columns are
    /// partitioned by dtype; the target column and unsupported dtypes are
    /// ignored. The engineered variant also declares the derived columns.
    pub fn build(kind: PipelineKind, schema_sample: &DataFrame) -> Self {
        let mut numeric_columns = Vec::new();
        let mut categorical_columns = Vec::new();

        for col in schema_sample.get_columns() {
            let name = col.name().to_string();
            if name == TARGET_COLUMN {
                continue;
            }

            match col.dtype() {
                DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64
                | DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64
                | DataType::Float32 | DataType::Float64 => {
                    numeric_columns.push(name);
                }
                DataType::String | DataType::Categorical(_, _) => {
                    categorical_columns.push(name);
                }
                _ => {}
            }
        }

        if kind == PipelineKind::Engineered {
            for rule in DERIVED_FEATURES {
                if !numeric_columns.iter().any(|c| c == rule.name) {
                    numeric_columns.push(rule.name.to_string());
                }
            }
        }

        let encoder_type = match kind {
            PipelineKind::Baseline => EncoderType::OneHot,
            PipelineKind::Engineered => EncoderType::Ordinal,
        };

        Self {
            kind,
            numeric_columns,
            categorical_columns,
            numeric_imputer: Imputer::new(ImputeStrategy::Median),
            categorical_imputer: Imputer::new(ImputeStrategy::MostFrequent),
            scaler: StandardScaler::new(),
            encoder: Encoder::new(encoder_type),
            is_fitted: false,
        }
    }

    /// Fit all stages on training data. Declared columns absent from the
    /// (staged) frame are dropped from the fitted sets.
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        let staged = self.stage(df)?;

        self.numeric_columns
            .retain(|c| matches!(staged.column(c).map(|col| col.dtype().clone()), Ok(DataType::Float64)));
        self.categorical_columns
            .retain(|c| staged.column(c).is_ok());

        if !self.numeric_columns.is_empty() {
            self.numeric_imputer.fit(&staged, &self.numeric_columns)?;
            let mut imputed = self.numeric_imputer.transform(&staged)?;
            if self.kind == PipelineKind::Engineered {
                imputed = safe_log1p(&imputed, &self.numeric_columns)?;
            }
            self.scaler.fit(&imputed, &self.numeric_columns)?;
        }

        if !self.categorical_columns.is_empty() {
            self.categorical_imputer.fit(&staged, &self.categorical_columns)?;
            let imputed = self.categorical_imputer.transform(&staged)?;
            self.encoder.fit(&imputed, &self.categorical_columns)?;
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Apply the fitted stages. Fitted columns missing from the input are
    /// injected as all-null and imputed with the training statistic; extra
    /// columns are ignored.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PipelineError::NotFitted);
        }

        let staged = self.stage(df)?;
        let staged = self.ensure_columns(staged)?;

        let mut result = self.numeric_imputer.transform(&staged)?;
        result = self.categorical_imputer.transform(&result)?;
        if self.kind == PipelineKind::Engineered {
            result = safe_log1p(&result, &self.numeric_columns)?;
        }
        result = self.scaler.transform(&result)?;

        let mut output: Vec<Column> = Vec::new();
        for col_name in &self.numeric_columns {
            output.push(result.column(col_name)?.clone());
        }
        for series in self.encoder.transform(&result)? {
            output.push(series.into());
        }

        Ok(DataFrame::new(output)?)
    }

    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?;
        self.transform(df)
    }

    pub fn kind(&self) -> PipelineKind {
        self.kind
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }

    /// Width of the transformed output
    pub fn output_width(&self) -> usize {
        self.numeric_columns.len() + self.encoder.output_width()
    }

    /// Derived stage plus numeric dtype normalization
    fn stage(&self, df: &DataFrame) -> Result<DataFrame> {
        let df = match self.kind {
            PipelineKind::Baseline => df.clone(),
            PipelineKind::Engineered => apply_derived(df)?,
        };
        cast_numeric_to_f64(&df)
    }

    /// Inject fitted-but-absent columns as all-null so imputation can fill
    /// them with the training statistic.
    fn ensure_columns(&self, df: DataFrame) -> Result<DataFrame> {
        let mut result = df;
        let height = result.height();

        for col_name in &self.numeric_columns {
            if result.column(col_name).is_err() {
                let null_col = Series::full_null(col_name.as_str().into(), height, &DataType::Float64);
                result = result.with_column(null_col)?.clone();
            }
        }
        for col_name in &self.categorical_columns {
            if result.column(col_name).is_err() {
                let null_col = Series::full_null(col_name.as_str().into(), height, &DataType::String);
                result = result.with_column(null_col)?.clone();
            }
        }

        Ok(result)
    }
}

/// Cast all integer and f32 columns to Float64 for consistent processing
fn cast_numeric_to_f64(df: &DataFrame) -> Result<DataFrame> {
    let mut result = df.clone();
    for col in df.get_columns() {
        match col.dtype() {
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64
            | DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64
            | DataType::Float32 => {
                let casted = col.cast(&DataType::Float64)?;
                result = result.with_column(casted)?.clone();
            }
            _ => {}
        }
    }
    Ok(result)
}

/// Convert a transformed frame into a dense f64 matrix for the models
pub fn to_feature_matrix(df: &DataFrame) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let n_cols = df.width();

    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(n_cols);
    for col in df.get_columns() {
        let casted = col.cast(&DataType::Float64)?;
        let ca = casted
            .f64()
            .map_err(|e| PipelineError::DataError(e.to_string()))?;
        columns.push(ca.into_iter().map(|v| v.unwrap_or(0.0)).collect());
    }

    Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| columns[c][r]))
}
