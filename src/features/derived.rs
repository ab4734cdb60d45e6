//! Derived feature rules for the engineered pipeline

use crate::error::Result;
use polars::prelude::*;

/// One derived column: output name, required source columns, and the
/// computation. Rules apply in declaration order.
pub struct DerivedFeature {
    pub name: &'static str,
    pub sources: &'static [&'static str],
    compute: fn(&DataFrame) -> PolarsResult<Series>,
}

pub const DERIVED_FEATURES: &[DerivedFeature] = &[
    DerivedFeature {
        name: "TotalBath",
        sources: &["FullBath", "HalfBath"],
        compute: compute_total_bath,
    },
    DerivedFeature {
        name: "TotalSF",
        sources: &["1stFlrSF", "2ndFlrSF", "TotalBsmtSF"],
        compute: compute_total_sf,
    },
    DerivedFeature {
        name: "GarageQualityRatio",
        sources: &["GarageArea", "GarageCars"],
        compute: compute_garage_ratio,
    },
];

/// Append every applicable derived column to the frame. A rule is skipped
/// when a source column is missing or the output name already exists; null
/// inputs propagate null.
pub fn apply_derived(df: &DataFrame) -> Result<DataFrame> {
    let mut result = df.clone();

    for rule in DERIVED_FEATURES {
        if result.column(rule.name).is_ok() {
            continue;
        }
        if !rule.sources.iter().all(|s| result.column(s).is_ok()) {
            continue;
        }
        let series = (rule.compute)(&result)?;
        result = result.with_column(series)?.clone();
    }

    Ok(result)
}

fn float_column(df: &DataFrame, name: &str) -> PolarsResult<Float64Chunked> {
    Ok(df
        .column(name)?
        .cast(&DataType::Float64)?
        .f64()?
        .clone())
}

fn compute_total_bath(df: &DataFrame) -> PolarsResult<Series> {
    let full = float_column(df, "FullBath")?;
    let half = float_column(df, "HalfBath")?;

    let values: Float64Chunked = full
        .into_iter()
        .zip(half.into_iter())
        .map(|(f, h)| match (f, h) {
            (Some(f), Some(h)) => Some(f + 0.5 * h),
            _ => None,
        })
        .collect();

    Ok(values.with_name("TotalBath".into()).into_series())
}

fn compute_total_sf(df: &DataFrame) -> PolarsResult<Series> {
    let first = float_column(df, "1stFlrSF")?;
    let second = float_column(df, "2ndFlrSF")?;
    let basement = float_column(df, "TotalBsmtSF")?;

    let values: Float64Chunked = first
        .into_iter()
        .zip(second.into_iter())
        .zip(basement.into_iter())
        .map(|((a, b), c)| match (a, b, c) {
            (Some(a), Some(b), Some(c)) => Some(a + b + c),
            _ => None,
        })
        .collect();

    Ok(values.with_name("TotalSF".into()).into_series())
}

fn compute_garage_ratio(df: &DataFrame) -> PolarsResult<Series> {
    let area = float_column(df, "GarageArea")?;
    let cars = float_column(df, "GarageCars")?;

    // +1 keeps carless rows finite
    let values: Float64Chunked = area
        .into_iter()
        .zip(cars.into_iter())
        .map(|(a, c)| match (a, c) {
            (Some(a), Some(c)) => Some(a / (c + 1.0)),
            _ => None,
        })
        .collect();

    Ok(values.with_name("GarageQualityRatio".into()).into_series())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_bath() {
        let df = df! {
            "FullBath" => &[2i64, 1],
            "HalfBath" => &[1i64, 0],
        }
        .unwrap();

        let result = apply_derived(&df).unwrap();
        let col = result.column("TotalBath").unwrap().f64().unwrap();
        assert_eq!(col.get(0), Some(2.5));
        assert_eq!(col.get(1), Some(1.0));
    }

    #[test]
    fn test_total_sf_and_garage_ratio() {
        let df = df! {
            "1stFlrSF" => &[800i64],
            "2ndFlrSF" => &[600i64],
            "TotalBsmtSF" => &[400i64],
            "GarageArea" => &[500i64],
            "GarageCars" => &[1i64],
        }
        .unwrap();

        let result = apply_derived(&df).unwrap();
        assert_eq!(result.column("TotalSF").unwrap().f64().unwrap().get(0), Some(1800.0));
        assert_eq!(
            result.column("GarageQualityRatio").unwrap().f64().unwrap().get(0),
            Some(250.0)
        );
    }

    #[test]
    fn test_missing_source_skips_rule() {
        let df = df! {
            "FullBath" => &[2i64],
        }
        .unwrap();

        let result = apply_derived(&df).unwrap();
        assert!(result.column("TotalBath").is_err());
        assert!(result.column("TotalSF").is_err());
    }

    #[test]
    fn test_null_input_propagates() {
        let df = df! {
            "FullBath" => &[Some(2i64), None],
            "HalfBath" => &[Some(1i64), Some(1)],
        }
        .unwrap();

        let result = apply_derived(&df).unwrap();
        let col = result.column("TotalBath").unwrap().f64().unwrap();
        assert_eq!(col.get(1), None);
    }

    #[test]
    fn test_existing_column_not_overwritten() {
        let df = df! {
            "FullBath" => &[2i64],
            "HalfBath" => &[1i64],
            "TotalBath" => &[99.0],
        }
        .unwrap();

        let result = apply_derived(&df).unwrap();
        let col = result.column("TotalBath").unwrap().f64().unwrap();
        assert_eq!(col.get(0), Some(99.0));
    }
}
