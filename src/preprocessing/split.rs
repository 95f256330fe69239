//! Feature/target extraction and seeded train/test splitting

use crate::error::{DomusError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Feature matrix with its column names and aligned target vector.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub feature_names: Vec<String>,
    pub x: Array2<f64>,
    pub y: Array1<f64>,
}

/// Disjoint train/test partitions of a feature matrix.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Extract named columns from a DataFrame into a row-major Array2<f64>.
fn columns_to_array2(df: &DataFrame, col_names: &[String]) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let n_cols = col_names.len();

    let col_data: Vec<Vec<f64>> = col_names
        .iter()
        .map(|col_name| {
            let column = df
                .column(col_name)
                .map_err(|_| DomusError::ColumnNotFound(col_name.clone()))?;
            let series = column
                .as_materialized_series()
                .cast(&DataType::Float64)
                .map_err(|e| DomusError::DataError(e.to_string()))?;
            let values: Vec<f64> = series
                .f64()
                .map_err(|e| DomusError::DataError(e.to_string()))?
                .into_iter()
                .map(|v| v.unwrap_or(0.0))
                .collect();
            Ok(values)
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    let col_refs: Vec<&[f64]> = col_data.iter().map(|c| c.as_slice()).collect();
    Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| {
        col_refs[c][r]
    }))
}

/// Split an encoded DataFrame into a feature matrix and target vector.
///
/// Every column except the target becomes a feature, in DataFrame order.
pub fn split_features_target(df: &DataFrame, target: &str) -> Result<FeatureMatrix> {
    let feature_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .filter(|name| name.as_str() != target)
        .map(|s| s.to_string())
        .collect();

    if feature_names.is_empty() {
        return Err(DomusError::PreprocessingError(
            "no feature columns left after dropping target".to_string(),
        ));
    }

    let target_column = df
        .column(target)
        .map_err(|_| DomusError::ColumnNotFound(target.to_string()))?;
    let target_f64 = target_column
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|e| DomusError::DataError(e.to_string()))?;
    let y: Array1<f64> = target_f64
        .f64()
        .map_err(|e| DomusError::DataError(e.to_string()))?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect();

    let x = columns_to_array2(df, &feature_names)?;

    Ok(FeatureMatrix {
        feature_names,
        x,
        y,
    })
}

/// Seeded shuffle split into disjoint train/test partitions.
///
/// With the same seed and input size the index sets are identical across
/// runs. `test_fraction` of the rows (rounded down) go to the test set; a
/// fraction that leaves the test set empty is rejected.
pub fn train_test_split(
    features: &FeatureMatrix,
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit> {
    let n = features.x.nrows();
    if n != features.y.len() {
        return Err(DomusError::ShapeError {
            expected: format!("y length = {n}"),
            actual: format!("y length = {}", features.y.len()),
        });
    }
    if !(0.0..1.0).contains(&test_fraction) {
        return Err(DomusError::ValidationError(format!(
            "test_fraction must be in [0, 1), got {test_fraction}"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_size = (n as f64 * test_fraction) as usize;
    if test_size == 0 {
        return Err(DomusError::ValidationError(format!(
            "test_fraction {test_fraction} leaves no test rows for {n} samples"
        )));
    }
    let test_indices = indices[..test_size].to_vec();
    let train_indices = indices[test_size..].to_vec();

    let x_train = features.x.select(ndarray::Axis(0), &train_indices);
    let x_test = features.x.select(ndarray::Axis(0), &test_indices);
    let y_train = Array1::from_vec(train_indices.iter().map(|&i| features.y[i]).collect());
    let y_test = Array1::from_vec(test_indices.iter().map(|&i| features.y[i]).collect());

    Ok(TrainTestSplit {
        x_train,
        x_test,
        y_train,
        y_test,
        train_indices,
        test_indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_features() -> FeatureMatrix {
        let df = df!(
            "a" => &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
            "target" => &[2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0]
        )
        .unwrap();
        split_features_target(&df, "target").unwrap()
    }

    #[test]
    fn test_split_features_target_shapes() {
        let features = sample_features();
        assert_eq!(features.feature_names, vec!["a".to_string()]);
        assert_eq!(features.x.nrows(), 10);
        assert_eq!(features.y.len(), 10);
    }

    #[test]
    fn test_row_alignment() {
        let features = sample_features();
        for i in 0..10 {
            assert!((features.y[i] - 2.0 * features.x[[i, 0]]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_split_counts_and_disjointness() {
        let features = sample_features();
        let split = train_test_split(&features, 0.2, 42).unwrap();

        assert_eq!(split.train_indices.len() + split.test_indices.len(), 10);
        assert_eq!(split.test_indices.len(), 2);
        for idx in &split.test_indices {
            assert!(!split.train_indices.contains(idx));
        }
    }

    #[test]
    fn test_split_reproducible_with_same_seed() {
        let features = sample_features();
        let a = train_test_split(&features, 0.2, 42).unwrap();
        let b = train_test_split(&features, 0.2, 42).unwrap();

        assert_eq!(a.train_indices, b.train_indices);
        assert_eq!(a.test_indices, b.test_indices);
    }

    #[test]
    fn test_split_differs_across_seeds() {
        let features = sample_features();
        let a = train_test_split(&features, 0.2, 42).unwrap();
        let b = train_test_split(&features, 0.2, 7).unwrap();

        assert_ne!(a.test_indices, b.test_indices);
    }

    #[test]
    fn test_split_rows_follow_indices() {
        let features = sample_features();
        let split = train_test_split(&features, 0.2, 42).unwrap();

        for (row, &idx) in split.train_indices.iter().enumerate() {
            assert!((split.x_train[[row, 0]] - features.x[[idx, 0]]).abs() < 1e-12);
            assert!((split.y_train[row] - features.y[idx]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_invalid_fraction_rejected() {
        let features = sample_features();
        assert!(train_test_split(&features, 1.5, 42).is_err());
    }

    #[test]
    fn test_empty_test_set_rejected() {
        let features = sample_features();
        assert!(train_test_split(&features, 0.0, 42).is_err());
        // 10 rows at 5% rounds down to zero test rows
        assert!(train_test_split(&features, 0.05, 42).is_err());
    }
}
