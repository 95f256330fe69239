//! Gradient boosting implementation
//!
//! Residual boosting over regression trees with shrinkage and row
//! subsampling.

use super::tree::DecisionTreeRegressor;
use super::Regressor;
use crate::error::{DomusError, Result};
use ndarray::{Array1, Array2};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Gradient boosting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingConfig {
    /// Number of boosting rounds (trees)
    pub n_estimators: usize,
    /// Learning rate (shrinkage)
    pub learning_rate: f64,
    /// Maximum tree depth
    pub max_depth: usize,
    /// Minimum samples per leaf
    pub min_samples_leaf: usize,
    /// Row subsample ratio per round
    pub subsample: f64,
    /// Random seed
    pub random_state: Option<u64>,
}

impl Default for GradientBoostingConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_leaf: 1,
            subsample: 0.8,
            random_state: Some(42),
        }
    }
}

/// Gradient boosting regressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingRegressor {
    config: GradientBoostingConfig,
    trees: Vec<DecisionTreeRegressor>,
    initial_prediction: f64,
    is_fitted: bool,
}

impl Default for GradientBoostingRegressor {
    fn default() -> Self {
        Self::new(GradientBoostingConfig::default())
    }
}

impl GradientBoostingRegressor {
    pub fn new(config: GradientBoostingConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            initial_prediction: 0.0,
            is_fitted: false,
        }
    }

    fn subsample_indices(&self, n: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
        let sample_size = ((n as f64) * self.config.subsample).ceil() as usize;
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(rng);
        indices.truncate(sample_size.max(1));
        indices.sort_unstable();
        indices
    }
}

impl Regressor for GradientBoostingRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_samples = x.nrows();

        if n_samples != y.len() {
            return Err(DomusError::ShapeError {
                expected: format!("y length = {n_samples}"),
                actual: format!("y length = {}", y.len()),
            });
        }

        // Initialize with the mean target
        self.initial_prediction = y.mean().unwrap_or(0.0);
        let mut predictions = Array1::from_elem(n_samples, self.initial_prediction);

        let mut rng = match self.config.random_state {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        self.trees = Vec::with_capacity(self.config.n_estimators);

        for _ in 0..self.config.n_estimators {
            let residuals: Array1<f64> = y
                .iter()
                .zip(predictions.iter())
                .map(|(yi, pi)| yi - pi)
                .collect();

            let sample_indices = self.subsample_indices(n_samples, &mut rng);
            let x_sub = x.select(ndarray::Axis(0), &sample_indices);
            let y_sub: Array1<f64> =
                Array1::from_vec(sample_indices.iter().map(|&i| residuals[i]).collect());

            let mut tree = DecisionTreeRegressor::new()
                .with_max_depth(self.config.max_depth)
                .with_min_samples_leaf(self.config.min_samples_leaf);
            tree.fit(&x_sub, &y_sub)?;

            // Update running predictions for all rows with shrinkage
            let round_pred = tree.predict(x)?;
            for i in 0..n_samples {
                predictions[i] += self.config.learning_rate * round_pred[i];
            }

            self.trees.push(tree);
        }

        self.is_fitted = true;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(DomusError::ModelNotFitted);
        }

        let n = x.nrows();
        let mut predictions = Array1::from_elem(n, self.initial_prediction);

        for tree in &self.trees {
            let tree_pred = tree.predict(x)?;
            for i in 0..n {
                predictions[i] += self.config.learning_rate * tree_pred[i];
            }
        }

        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadratic_data() -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((50, 1), |(i, _)| i as f64 / 5.0);
        let y = Array1::from_shape_fn(50, |i| {
            let v = i as f64 / 5.0;
            v * v
        });
        (x, y)
    }

    #[test]
    fn test_boosting_improves_over_mean() {
        let (x, y) = quadratic_data();

        let mut model = GradientBoostingRegressor::new(GradientBoostingConfig {
            n_estimators: 50,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_leaf: 1,
            subsample: 1.0,
            random_state: Some(42),
        });
        model.fit(&x, &y).unwrap();

        let pred = model.predict(&x).unwrap();
        let mean = y.mean().unwrap();

        let model_sse: f64 = y.iter().zip(pred.iter()).map(|(t, p)| (t - p).powi(2)).sum();
        let mean_sse: f64 = y.iter().map(|t| (t - mean).powi(2)).sum();
        assert!(model_sse < mean_sse * 0.1, "boosting should beat the mean baseline");
    }

    #[test]
    fn test_boosting_reproducible_with_seed() {
        let (x, y) = quadratic_data();

        let run = || {
            let mut model = GradientBoostingRegressor::new(GradientBoostingConfig {
                n_estimators: 10,
                subsample: 0.7,
                random_state: Some(42),
                ..Default::default()
            });
            model.fit(&x, &y).unwrap();
            model.predict(&x).unwrap()
        };

        let a = run();
        let b = run();
        for (p, q) in a.iter().zip(b.iter()) {
            assert!((p - q).abs() < 1e-12);
        }
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = GradientBoostingRegressor::default();
        let x = Array2::zeros((2, 1));
        assert!(matches!(
            model.predict(&x),
            Err(DomusError::ModelNotFitted)
        ));
    }
}
