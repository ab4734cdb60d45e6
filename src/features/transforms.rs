//! Column-wise numeric transforms

use crate::error::{PipelineError, Result};
use polars::prelude::*;

/// Apply log(1 + x) to strictly positive values in the given columns.
/// Zero, negative, and null values pass through unchanged, so the
/// transform never produces NaN or -inf.
pub fn safe_log1p(df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
    let mut result = df.clone();

    for col_name in columns {
        let column = match df.column(col_name) {
            Ok(col) => col,
            Err(_) => continue,
        };
        let ca = column
            .as_materialized_series()
            .f64()
            .map_err(|e| PipelineError::DataError(e.to_string()))?;

        let logged: Float64Chunked = ca
            .into_iter()
            .map(|opt| opt.map(|v| if v > 0.0 { v.ln_1p() } else { v }))
            .collect();

        result = result
            .with_column(logged.with_name(col_name.as_str().into()).into_series())?
            .clone();
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_values_logged() {
        let df = df! {
            "a" => &[std::f64::consts::E - 1.0],
        }
        .unwrap();

        let result = safe_log1p(&df, &["a".to_string()]).unwrap();
        let v = result.column("a").unwrap().f64().unwrap().get(0).unwrap();
        assert!((v - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_and_negative_pass_through() {
        let df = df! {
            "a" => &[0.0, -3.5],
        }
        .unwrap();

        let result = safe_log1p(&df, &["a".to_string()]).unwrap();
        let ca = result.column("a").unwrap().f64().unwrap();
        assert_eq!(ca.get(0), Some(0.0));
        assert_eq!(ca.get(1), Some(-3.5));
    }

    #[test]
    fn test_absent_column_ignored() {
        let df = df! {
            "a" => &[1.0],
        }
        .unwrap();

        let result = safe_log1p(&df, &["missing".to_string()]).unwrap();
        assert_eq!(result.width(), 1);
    }
}
