//! Grid search with k-fold cross-validation for the random forest
//!
//! Exhaustively evaluates every parameter combination in a declared grid
//! under seeded k-fold cross-validation, scoring by negative MSE (higher is
//! better, always ≤ 0).

use crate::error::{DomusError, Result};
use crate::models::{ForestParams, RandomForestRegressor, Regressor};
use ndarray::{Array1, Array2};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Declared hyperparameter grid for the forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestGrid {
    pub n_estimators: Vec<usize>,
    pub max_depth: Vec<Option<usize>>,
    pub min_samples_leaf: Vec<usize>,
}

impl Default for ForestGrid {
    fn default() -> Self {
        Self {
            n_estimators: vec![50, 100, 200],
            max_depth: vec![Some(5), Some(10), None],
            min_samples_leaf: vec![1, 4],
        }
    }
}

impl ForestGrid {
    /// Cartesian product of the grid axes.
    pub fn candidates(&self) -> Vec<ForestParams> {
        let mut out = Vec::new();
        for &n_estimators in &self.n_estimators {
            for &max_depth in &self.max_depth {
                for &min_samples_leaf in &self.min_samples_leaf {
                    out.push(ForestParams {
                        n_estimators,
                        max_depth,
                        min_samples_leaf,
                    });
                }
            }
        }
        out
    }

    /// Whether a parameter set is a member of this grid.
    pub fn contains(&self, params: &ForestParams) -> bool {
        self.n_estimators.contains(&params.n_estimators)
            && self.max_depth.contains(&params.max_depth)
            && self.min_samples_leaf.contains(&params.min_samples_leaf)
    }
}

/// Score of one evaluated candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trial {
    pub params: ForestParams,
    /// Mean negative MSE across folds
    pub score: f64,
}

/// Outcome of a grid search.
///
/// `best` is `None` when no candidate could be evaluated; callers are
/// expected to log and skip the refit rather than treat that as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSearchOutcome {
    pub best: Option<Trial>,
    pub trials: Vec<Trial>,
    pub n_folds: usize,
}

/// Seeded k-fold index splits.
///
/// Every row lands in exactly one test fold; train folds are the
/// complement.
fn k_fold_indices(n_samples: usize, n_splits: usize, seed: u64) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
    if n_splits < 2 {
        return Err(DomusError::SearchError(
            "n_splits must be at least 2".to_string(),
        ));
    }
    if n_samples < n_splits {
        return Err(DomusError::SearchError(format!(
            "n_samples ({n_samples}) must be >= n_splits ({n_splits})"
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let fold_sizes: Vec<usize> = (0..n_splits)
        .map(|i| {
            let base = n_samples / n_splits;
            let remainder = n_samples % n_splits;
            if i < remainder {
                base + 1
            } else {
                base
            }
        })
        .collect();

    let mut splits = Vec::with_capacity(n_splits);
    let mut current = 0;

    for fold_size in fold_sizes {
        let test: Vec<usize> = indices[current..current + fold_size].to_vec();
        let train: Vec<usize> = indices[..current]
            .iter()
            .chain(indices[current + fold_size..].iter())
            .copied()
            .collect();
        splits.push((train, test));
        current += fold_size;
    }

    Ok(splits)
}

/// Negative MSE of one fitted candidate on a validation fold.
fn neg_mse(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let n = y_true.len() as f64;
    let mse = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>()
        / n;
    -mse
}

/// Run the grid search over the training data.
pub fn grid_search_forest(
    grid: &ForestGrid,
    x: &Array2<f64>,
    y: &Array1<f64>,
    n_folds: usize,
    seed: u64,
) -> Result<GridSearchOutcome> {
    let candidates = grid.candidates();
    if candidates.is_empty() {
        return Ok(GridSearchOutcome {
            best: None,
            trials: Vec::new(),
            n_folds,
        });
    }

    let folds = k_fold_indices(x.nrows(), n_folds, seed)?;
    let mut trials = Vec::with_capacity(candidates.len());

    for params in candidates {
        let mut fold_scores = Vec::with_capacity(folds.len());

        for (train_idx, test_idx) in &folds {
            let x_train = x.select(ndarray::Axis(0), train_idx);
            let x_val = x.select(ndarray::Axis(0), test_idx);
            let y_train: Array1<f64> =
                Array1::from_vec(train_idx.iter().map(|&i| y[i]).collect());
            let y_val: Array1<f64> = Array1::from_vec(test_idx.iter().map(|&i| y[i]).collect());

            let mut forest = RandomForestRegressor::new(params).with_random_state(seed);
            forest.fit(&x_train, &y_train)?;
            let pred = forest.predict(&x_val)?;
            fold_scores.push(neg_mse(&y_val, &pred));
        }

        let score = fold_scores.iter().sum::<f64>() / fold_scores.len() as f64;
        tracing::debug!(?params, score, "grid candidate evaluated");
        trials.push(Trial { params, score });
    }

    let best = trials
        .iter()
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
        .cloned();

    Ok(GridSearchOutcome {
        best,
        trials,
        n_folds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> ForestGrid {
        ForestGrid {
            n_estimators: vec![5, 10],
            max_depth: vec![Some(3), None],
            min_samples_leaf: vec![1],
        }
    }

    fn training_data() -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((30, 2), |(i, j)| (i * (j + 1)) as f64);
        let y = Array1::from_shape_fn(30, |i| 2.0 * i as f64 + 5.0);
        (x, y)
    }

    #[test]
    fn test_candidates_cartesian_product() {
        let grid = small_grid();
        assert_eq!(grid.candidates().len(), 4);
    }

    #[test]
    fn test_k_fold_covers_all_indices() {
        let folds = k_fold_indices(10, 3, 42).unwrap();
        assert_eq!(folds.len(), 3);

        let mut all_test: Vec<usize> = folds.iter().flat_map(|(_, t)| t.clone()).collect();
        all_test.sort_unstable();
        assert_eq!(all_test, (0..10).collect::<Vec<_>>());

        for (train, test) in &folds {
            assert_eq!(train.len() + test.len(), 10);
            for idx in test {
                assert!(!train.contains(idx));
            }
        }
    }

    #[test]
    fn test_k_fold_rejects_too_few_splits() {
        assert!(k_fold_indices(10, 1, 42).is_err());
        assert!(k_fold_indices(2, 3, 42).is_err());
    }

    #[test]
    fn test_grid_search_best_score_non_positive() {
        let (x, y) = training_data();
        let outcome = grid_search_forest(&small_grid(), &x, &y, 3, 42).unwrap();

        let best = outcome.best.expect("search should produce a best trial");
        assert!(best.score <= 0.0, "negative-MSE score must be <= 0");
        assert_eq!(outcome.trials.len(), 4);
    }

    #[test]
    fn test_grid_search_best_params_in_grid() {
        let (x, y) = training_data();
        let grid = small_grid();
        let outcome = grid_search_forest(&grid, &x, &y, 3, 42).unwrap();

        let best = outcome.best.unwrap();
        assert!(grid.contains(&best.params));
    }

    #[test]
    fn test_empty_grid_yields_no_best() {
        let (x, y) = training_data();
        let grid = ForestGrid {
            n_estimators: vec![],
            max_depth: vec![],
            min_samples_leaf: vec![],
        };
        let outcome = grid_search_forest(&grid, &x, &y, 3, 42).unwrap();

        assert!(outcome.best.is_none());
        assert!(outcome.trials.is_empty());
    }
}
