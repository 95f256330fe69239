//! Exploratory analysis: correlations and category frequencies

use crate::data::is_numeric_dtype;
use crate::error::{DomusError, Result};
use ndarray::Array2;
use polars::prelude::*;

/// Pearson correlation matrix over the numeric columns of a DataFrame.
///
/// Column order is preserved from the DataFrame; non-numeric columns are
/// excluded before computing.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Array2<f64>,
}

impl CorrelationMatrix {
    /// Correlation between two named columns, if both are present.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[[i, j]])
    }
}

/// Compute the Pearson correlation matrix over all numeric columns.
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    let numeric: Vec<&Column> = df
        .get_columns()
        .iter()
        .filter(|c| is_numeric_dtype(c.dtype()))
        .collect();

    if numeric.len() < 2 {
        return Err(DomusError::DataError(
            "correlation matrix needs at least two numeric columns".to_string(),
        ));
    }

    let n_rows = df.height();
    let mut columns = Vec::with_capacity(numeric.len());
    let mut data: Vec<Vec<f64>> = Vec::with_capacity(numeric.len());

    for col in &numeric {
        let series = col
            .as_materialized_series()
            .cast(&DataType::Float64)
            .map_err(|e| DomusError::DataError(e.to_string()))?;
        let values: Vec<f64> = series
            .f64()
            .map_err(|e| DomusError::DataError(e.to_string()))?
            .into_iter()
            .map(|v| v.unwrap_or(0.0))
            .collect();
        columns.push(col.name().to_string());
        data.push(values);
    }

    let k = data.len();
    let mut values = Array2::zeros((k, k));

    let means: Vec<f64> = data
        .iter()
        .map(|v| v.iter().sum::<f64>() / n_rows as f64)
        .collect();
    let stds: Vec<f64> = data
        .iter()
        .zip(means.iter())
        .map(|(v, m)| (v.iter().map(|x| (x - m).powi(2)).sum::<f64>() / n_rows as f64).sqrt())
        .collect();

    for i in 0..k {
        values[[i, i]] = 1.0;
        for j in (i + 1)..k {
            let cov = data[i]
                .iter()
                .zip(data[j].iter())
                .map(|(a, b)| (a - means[i]) * (b - means[j]))
                .sum::<f64>()
                / n_rows as f64;

            let denom = stds[i] * stds[j];
            let r = if denom > 0.0 { cov / denom } else { 0.0 };
            values[[i, j]] = r;
            values[[j, i]] = r;
        }
    }

    Ok(CorrelationMatrix { columns, values })
}

/// Frequency count of each category in a string column, descending by count.
pub fn category_frequencies(df: &DataFrame, column: &str) -> Result<Vec<(String, usize)>> {
    let col = df
        .column(column)
        .map_err(|_| DomusError::ColumnNotFound(column.to_string()))?;

    let ca = col
        .str()
        .map_err(|e| DomusError::DataError(e.to_string()))?;

    let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    for val in ca.into_iter().flatten() {
        *counts.entry(val.to_string()).or_insert(0) += 1;
    }

    let mut freqs: Vec<(String, usize)> = counts.into_iter().collect();
    // Descending by count, ties broken by name for deterministic output
    freqs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Ok(freqs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_perfect_positive() {
        let df = df!(
            "x" => &[1.0, 2.0, 3.0, 4.0],
            "y" => &[2.0, 4.0, 6.0, 8.0]
        )
        .unwrap();

        let corr = correlation_matrix(&df).unwrap();
        assert!((corr.get("x", "y").unwrap() - 1.0).abs() < 1e-10);
        assert!((corr.get("x", "x").unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_correlation_negative() {
        let df = df!(
            "x" => &[1.0, 2.0, 3.0, 4.0],
            "y" => &[8.0, 6.0, 4.0, 2.0]
        )
        .unwrap();

        let corr = correlation_matrix(&df).unwrap();
        assert!((corr.get("x", "y").unwrap() + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_correlation_excludes_strings() {
        let df = df!(
            "x" => &[1.0, 2.0, 3.0],
            "y" => &[3.0, 2.0, 1.0],
            "cat" => &["a", "b", "c"]
        )
        .unwrap();

        let corr = correlation_matrix(&df).unwrap();
        assert_eq!(corr.columns, vec!["x".to_string(), "y".to_string()]);
        assert!(corr.get("x", "cat").is_none());
    }

    #[test]
    fn test_correlation_symmetric() {
        let df = df!(
            "a" => &[1.0, 3.0, 2.0, 5.0, 4.0],
            "b" => &[2.0, 1.0, 4.0, 3.0, 5.0],
            "c" => &[1.0, 1.0, 2.0, 2.0, 3.0]
        )
        .unwrap();

        let corr = correlation_matrix(&df).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let diff = (corr.values[[i, j]] - corr.values[[j, i]]).abs();
                assert!(diff < 1e-12);
            }
        }
    }

    #[test]
    fn test_category_frequencies_sorted() {
        let df = df!(
            "hood" => &["CollgCr", "Veenker", "CollgCr", "CollgCr", "Veenker", "Crawfor"]
        )
        .unwrap();

        let freqs = category_frequencies(&df, "hood").unwrap();
        assert_eq!(freqs[0], ("CollgCr".to_string(), 3));
        assert_eq!(freqs[1], ("Veenker".to_string(), 2));
        assert_eq!(freqs[2], ("Crawfor".to_string(), 1));
    }

    #[test]
    fn test_category_frequencies_missing_column() {
        let df = df!("x" => &[1.0, 2.0]).unwrap();
        assert!(category_frequencies(&df, "nope").is_err());
    }
}
