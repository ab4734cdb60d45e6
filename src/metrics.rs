//! Regression metrics and the append-only metrics log

use crate::error::Result;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Validation metrics for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        let n = y_true.len() as f64;
        let errors: Vec<f64> = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(t, p)| t - p)
            .collect();

        let mse: f64 = errors.iter().map(|e| e * e).sum::<f64>() / n;
        let mae: f64 = errors.iter().map(|e| e.abs()).sum::<f64>() / n;

        let y_mean: f64 = y_true.iter().sum::<f64>() / n;
        let ss_tot: f64 = y_true.iter().map(|y| (y - y_mean).powi(2)).sum();
        let ss_res: f64 = errors.iter().map(|e| e.powi(2)).sum();
        let r2 = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

        Self {
            mse,
            rmse: mse.sqrt(),
            mae,
            r2,
        }
    }
}

/// One persisted entry in the metrics log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub experiment: String,
    pub rmse: f64,
    pub r2: f64,
    pub model_type: String,
}

/// Append-only JSON log of experiment metrics.
///
/// An unreadable log is never silently destroyed: it is preserved as a
/// `.corrupt` sidecar with a warning, and reading continues from empty.
#[derive(Debug, Clone)]
pub struct MetricsLog {
    path: PathBuf,
}

impl MetricsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<Vec<MetricsRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let text = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&text) {
            Ok(records) => Ok(records),
            Err(e) => {
                let sidecar = self.path.with_extension("json.corrupt");
                warn!(
                    path = %self.path.display(),
                    preserved = %sidecar.display(),
                    error = %e,
                    "metrics log is unreadable; preserving it and starting fresh"
                );
                std::fs::rename(&self.path, &sidecar)?;
                Ok(Vec::new())
            }
        }
    }

    /// Read-modify-write append; returns the full log after the append.
    pub fn append(&self, record: MetricsRecord) -> Result<Vec<MetricsRecord>> {
        let mut records = self.read()?;
        records.push(record);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&records)?;
        std::fs::write(&self.path, json)?;

        Ok(records)
    }
}
