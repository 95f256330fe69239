//! One-hot encoding for categorical columns

use crate::error::{DomusError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One-hot encoder over string columns.
///
/// For each fitted column, transform replaces it with one `{col}_{category}`
/// indicator column per observed category. Category order is first-seen,
/// so the output schema is deterministic for a given input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    // column name -> categories in first-seen order
    categories: Vec<(String, Vec<String>)>,
    is_fitted: bool,
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            is_fitted: false,
        }
    }

    /// Learn the category set of each named column.
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        self.categories.clear();

        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| DomusError::ColumnNotFound(col_name.to_string()))?;
            let ca = column
                .str()
                .map_err(|e| DomusError::PreprocessingError(e.to_string()))?;

            let mut cats: Vec<String> = Vec::new();
            for val in ca.into_iter().flatten() {
                if !cats.iter().any(|c| c == val) {
                    cats.push(val.to_string());
                }
            }

            self.categories.push((col_name.to_string(), cats));
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Replace each fitted column with its indicator columns.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(DomusError::ModelNotFitted);
        }

        let mut result = df.clone();

        for (col_name, cats) in &self.categories {
            let column = result
                .column(col_name)
                .map_err(|_| DomusError::ColumnNotFound(col_name.clone()))?;
            let ca = column
                .str()
                .map_err(|e| DomusError::PreprocessingError(e.to_string()))?;

            let mut indicator_series = Vec::with_capacity(cats.len());
            for category in cats {
                let new_col_name = format!("{}_{}", col_name, category);
                let values: Vec<i32> = ca
                    .into_iter()
                    .map(|v| if v == Some(category.as_str()) { 1 } else { 0 })
                    .collect();
                indicator_series.push(Series::new(new_col_name.into(), values));
            }

            for series in indicator_series {
                result = result
                    .with_column(series)
                    .map_err(|e| DomusError::PreprocessingError(e.to_string()))?
                    .clone();
            }

            result = result
                .drop(col_name)
                .map_err(|e| DomusError::PreprocessingError(e.to_string()))?;
        }

        Ok(result)
    }

    /// Fit and transform in one step.
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Categories learned for a column.
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cats)| cats.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df!(
            "Neighborhood" => &["CollgCr", "Veenker", "CollgCr", "Crawfor"],
            "SalePrice" => &[208500.0, 181500.0, 223500.0, 140000.0]
        )
        .unwrap()
    }

    #[test]
    fn test_onehot_drops_original_column() {
        let df = sample_df();
        let mut encoder = OneHotEncoder::new();
        let result = encoder.fit_transform(&df, &["Neighborhood"]).unwrap();

        assert!(result.column("Neighborhood").is_err());
    }

    #[test]
    fn test_onehot_creates_indicator_columns() {
        let df = sample_df();
        let mut encoder = OneHotEncoder::new();
        let result = encoder.fit_transform(&df, &["Neighborhood"]).unwrap();

        // SalePrice + 3 indicator columns
        assert_eq!(result.width(), 4);
        for name in ["Neighborhood_CollgCr", "Neighborhood_Veenker", "Neighborhood_Crawfor"] {
            assert!(result.column(name).is_ok(), "missing {name}");
        }
    }

    #[test]
    fn test_onehot_indicator_values() {
        let df = sample_df();
        let mut encoder = OneHotEncoder::new();
        let result = encoder.fit_transform(&df, &["Neighborhood"]).unwrap();

        let col = result.column("Neighborhood_CollgCr").unwrap();
        let values: Vec<i32> = col.i32().unwrap().into_iter().flatten().collect();
        assert_eq!(values, vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_onehot_deterministic_order() {
        let df = sample_df();
        let mut a = OneHotEncoder::new();
        let mut b = OneHotEncoder::new();
        let ra = a.fit_transform(&df, &["Neighborhood"]).unwrap();
        let rb = b.fit_transform(&df, &["Neighborhood"]).unwrap();

        let names_a: Vec<String> = ra.get_column_names().iter().map(|s| s.to_string()).collect();
        let names_b: Vec<String> = rb.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names_a, names_b);
    }

    #[test]
    fn test_categories_reports_first_seen_order() {
        let df = sample_df();
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&df, &["Neighborhood"]).unwrap();

        let cats = encoder.categories("Neighborhood").unwrap();
        assert_eq!(cats.to_vec(), vec!["CollgCr", "Veenker", "Crawfor"]);
        assert!(encoder.categories("LotArea").is_none());
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let df = sample_df();
        let encoder = OneHotEncoder::new();
        assert!(matches!(
            encoder.transform(&df),
            Err(DomusError::ModelNotFitted)
        ));
    }
}
