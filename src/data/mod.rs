//! Dataset loading, cleaning, and splitting

pub mod download;

pub use download::{download, fetch_dataset, DEFAULT_DATASET_URL};

use crate::error::{PipelineError, Result};
use ndarray::Array1;
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::path::Path;

/// The regression target
pub const TARGET_COLUMN: &str = "SalePrice";

/// Validation share of the deterministic split
pub const VALID_FRACTION: f64 = 0.2;

/// Load a CSV file with header and schema inference
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .map_err(|e| PipelineError::DataError(format!("cannot open {}: {}", path.display(), e)))?;

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|e| PipelineError::DataError(format!("cannot parse {}: {}", path.display(), e)))
}

/// Write a frame as CSV, creating parent directories
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|e| PipelineError::DataError(e.to_string()))?;
    Ok(())
}

/// Drop rows where the target is null
pub fn drop_missing_target(df: &DataFrame) -> Result<DataFrame> {
    let target = df
        .column(TARGET_COLUMN)
        .map_err(|_| PipelineError::FeatureNotFound(TARGET_COLUMN.to_string()))?;

    let mask = target.as_materialized_series().is_not_null();
    Ok(df.filter(&mask)?)
}

/// Deterministic shuffled split: validation gets `ceil(n * fraction)` rows
pub fn train_valid_split(
    df: &DataFrame,
    valid_fraction: f64,
    seed: u64,
) -> Result<(DataFrame, DataFrame)> {
    let n = df.height();
    if n < 2 {
        return Err(PipelineError::DataError(format!(
            "need at least 2 rows to split, got {}",
            n
        )));
    }

    let mut indices: Vec<u32> = (0..n as u32).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_valid = ((n as f64 * valid_fraction).ceil() as usize).clamp(1, n - 1);
    let (valid_idx, train_idx) = indices.split_at(n_valid);

    let take = |idx: &[u32]| -> Result<DataFrame> {
        let ca = IdxCa::from_vec("idx".into(), idx.to_vec());
        Ok(df.take(&ca)?)
    };

    Ok((take(train_idx)?, take(valid_idx)?))
}

/// Extract the target as a dense f64 vector
pub fn target_values(df: &DataFrame) -> Result<Array1<f64>> {
    let target = df
        .column(TARGET_COLUMN)
        .map_err(|_| PipelineError::FeatureNotFound(TARGET_COLUMN.to_string()))?;
    let casted = target.cast(&DataType::Float64)?;
    let ca = casted
        .f64()
        .map_err(|e| PipelineError::DataError(e.to_string()))?;

    Ok(ca.into_iter().map(|v| v.unwrap_or(0.0)).collect())
}
