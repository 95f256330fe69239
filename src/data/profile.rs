//! Dataset profiling: schema, null counts, numeric summaries

use crate::error::{DomusError, Result};
use polars::prelude::*;

/// Per-column schema and null-count entry
#[derive(Debug, Clone)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: String,
    pub is_numeric: bool,
    pub null_count: usize,
}

/// Dataset-level profile
#[derive(Debug, Clone)]
pub struct DatasetProfile {
    pub n_rows: usize,
    pub n_cols: usize,
    pub columns: Vec<ColumnProfile>,
}

impl DatasetProfile {
    /// Names of columns that are not numeric (candidates for encoding)
    pub fn non_numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !c.is_numeric)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Total nulls across all columns
    pub fn total_nulls(&self) -> usize {
        self.columns.iter().map(|c| c.null_count).sum()
    }
}

/// Five-number-ish summary of a numeric column
#[derive(Debug, Clone)]
pub struct NumericSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Whether a dtype participates in numeric summaries and correlations.
pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Build the schema/null profile for a DataFrame.
pub fn profile(df: &DataFrame) -> DatasetProfile {
    let columns = df
        .get_columns()
        .iter()
        .map(|col| ColumnProfile {
            name: col.name().to_string(),
            dtype: col.dtype().to_string(),
            is_numeric: is_numeric_dtype(col.dtype()),
            null_count: col.null_count(),
        })
        .collect();

    DatasetProfile {
        n_rows: df.height(),
        n_cols: df.width(),
        columns,
    }
}

/// Compute count/mean/std/min/max for every numeric column.
pub fn describe_numeric(df: &DataFrame) -> Result<Vec<NumericSummary>> {
    let mut summaries = Vec::new();

    for col in df.get_columns() {
        if !is_numeric_dtype(col.dtype()) {
            continue;
        }

        let series = col
            .as_materialized_series()
            .cast(&DataType::Float64)
            .map_err(|e| DomusError::DataError(e.to_string()))?;
        let ca = series
            .f64()
            .map_err(|e| DomusError::DataError(e.to_string()))?;

        let values: Vec<f64> = ca.into_iter().flatten().collect();
        if values.is_empty() {
            continue;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        summaries.push(NumericSummary {
            name: col.name().to_string(),
            count: values.len(),
            mean,
            std: variance.sqrt(),
            min,
            max,
        });
    }

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df!(
            "LotArea" => &[8450i64, 9600, 11250, 9550],
            "Neighborhood" => &["CollgCr", "Veenker", "CollgCr", "Crawfor"],
            "SalePrice" => &[208500.0, 181500.0, 223500.0, 140000.0]
        )
        .unwrap()
    }

    #[test]
    fn test_profile_counts() {
        let df = sample_df();
        let p = profile(&df);

        assert_eq!(p.n_rows, 4);
        assert_eq!(p.n_cols, 3);
        assert_eq!(p.total_nulls(), 0);
    }

    #[test]
    fn test_non_numeric_detection() {
        let df = sample_df();
        let p = profile(&df);

        assert_eq!(p.non_numeric_columns(), vec!["Neighborhood".to_string()]);
    }

    #[test]
    fn test_describe_numeric_skips_strings() {
        let df = sample_df();
        let summaries = describe_numeric(&df).unwrap();

        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["LotArea", "SalePrice"]);
    }

    #[test]
    fn test_describe_numeric_values() {
        let df = df!("x" => &[1.0, 2.0, 3.0]).unwrap();
        let summaries = describe_numeric(&df).unwrap();

        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.count, 3);
        assert!((s.mean - 2.0).abs() < 1e-12);
        assert!((s.min - 1.0).abs() < 1e-12);
        assert!((s.max - 3.0).abs() < 1e-12);
    }
}
