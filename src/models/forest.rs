//! Random Forest implementation

use super::tree::DecisionTreeRegressor;
use super::Regressor;
use crate::error::{DomusError, Result};
use ndarray::{Array1, Array2};
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Hyperparameters for one forest configuration.
///
/// Shared with the grid search, which enumerates candidates of this type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_leaf: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_leaf: 1,
        }
    }
}

/// Bagged regression trees with per-tree column subsampling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    pub params: ForestParams,
    /// Fraction of features offered to each tree
    pub colsample: f64,
    pub random_state: Option<u64>,
    trees: Vec<DecisionTreeRegressor>,
    col_indices_per_tree: Vec<Vec<usize>>,
    n_features: usize,
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        Self::new(ForestParams::default())
    }
}

impl RandomForestRegressor {
    pub fn new(params: ForestParams) -> Self {
        Self {
            params,
            colsample: 1.0,
            random_state: None,
            trees: Vec::new(),
            col_indices_per_tree: Vec::new(),
            n_features: 0,
        }
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn with_colsample(mut self, colsample: f64) -> Self {
        self.colsample = colsample;
        self
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for RandomForestRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(DomusError::ShapeError {
                expected: format!("y length = {n_samples}"),
                actual: format!("y length = {}", y.len()),
            });
        }
        if self.params.n_estimators == 0 {
            return Err(DomusError::ValidationError(
                "n_estimators must be at least 1".to_string(),
            ));
        }

        self.n_features = n_features;
        let n_cols = ((n_features as f64 * self.colsample).ceil() as usize)
            .clamp(1, n_features);

        let base_seed = self.random_state.unwrap_or(42);

        let fitted: Vec<(DecisionTreeRegressor, Vec<usize>)> = (0..self.params.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let seed = base_seed.wrapping_add(tree_idx as u64);
                let mut rng = ChaCha8Rng::seed_from_u64(seed);

                // Bootstrap sample of rows
                let sample_indices: Vec<usize> = (0..n_samples)
                    .map(|_| (rng.next_u64() as usize) % n_samples)
                    .collect();

                // Column subset for this tree
                let mut col_indices: Vec<usize> = (0..n_features).collect();
                col_indices.shuffle(&mut rng);
                col_indices.truncate(n_cols);
                col_indices.sort_unstable();

                let x_rows = x.select(ndarray::Axis(0), &sample_indices);
                let x_boot = x_rows.select(ndarray::Axis(1), &col_indices);
                let y_boot: Array1<f64> =
                    Array1::from_vec(sample_indices.iter().map(|&i| y[i]).collect());

                let mut tree = DecisionTreeRegressor::new()
                    .with_min_samples_leaf(self.params.min_samples_leaf);
                if let Some(d) = self.params.max_depth {
                    tree = tree.with_max_depth(d);
                }

                tree.fit(&x_boot, &y_boot)?;
                Ok((tree, col_indices))
            })
            .collect::<Result<Vec<_>>>()?;

        self.trees = Vec::with_capacity(fitted.len());
        self.col_indices_per_tree = Vec::with_capacity(fitted.len());
        for (tree, cols) in fitted {
            self.trees.push(tree);
            self.col_indices_per_tree.push(cols);
        }

        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(DomusError::ModelNotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(DomusError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        let n = x.nrows();
        let mut sums = Array1::zeros(n);

        for (tree, col_indices) in self.trees.iter().zip(self.col_indices_per_tree.iter()) {
            let x_sub = x.select(ndarray::Axis(1), col_indices);
            let tree_pred = tree.predict(&x_sub)?;
            sums = sums + tree_pred;
        }

        Ok(sums / self.trees.len() as f64)
    }
}
