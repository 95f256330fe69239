//! Regression tree implementation

use super::Regressor;
use crate::error::{DomusError, Result};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node holding the mean target of its samples
    Leaf { value: f64, n_samples: usize },
    /// Internal node with a feature threshold split
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
    },
}

/// Regression tree splitting on variance reduction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    root: Option<TreeNode>,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    n_features: usize,
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTreeRegressor {
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            n_features: 0,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples;
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    fn build_tree(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        depth: usize,
    ) -> TreeNode {
        let n_samples = indices.len();
        let y_subset: Vec<f64> = indices.iter().map(|&i| y[i]).collect();

        let should_stop = n_samples < self.min_samples_split
            || n_samples <= self.min_samples_leaf
            || self.max_depth.map_or(false, |d| depth >= d)
            || is_constant(&y_subset);

        if should_stop {
            return TreeNode::Leaf {
                value: mean(&y_subset),
                n_samples,
            };
        }

        if let Some((best_feature, best_threshold)) = self.find_best_split(x, y, indices) {
            let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .partition(|&&i| x[[i, best_feature]] <= best_threshold);

            if left_indices.len() < self.min_samples_leaf
                || right_indices.len() < self.min_samples_leaf
            {
                return TreeNode::Leaf {
                    value: mean(&y_subset),
                    n_samples,
                };
            }

            let left = Box::new(self.build_tree(x, y, &left_indices, depth + 1));
            let right = Box::new(self.build_tree(x, y, &right_indices, depth + 1));

            TreeNode::Split {
                feature_idx: best_feature,
                threshold: best_threshold,
                left,
                right,
                n_samples,
            }
        } else {
            TreeNode::Leaf {
                value: mean(&y_subset),
                n_samples,
            }
        }
    }

    fn find_best_split(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
    ) -> Option<(usize, f64)> {
        let n_features = x.ncols();
        let n = indices.len() as f64;

        let y_subset: Vec<f64> = indices.iter().map(|&i| y[i]).collect();
        let parent_impurity = variance(&y_subset);

        // Each feature independently finds its best threshold
        let feature_results: Vec<Option<(usize, f64, f64)>> = (0..n_features)
            .into_par_iter()
            .map(|feature_idx| {
                let mut values: Vec<f64> =
                    indices.iter().map(|&i| x[[i, feature_idx]]).collect();
                values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                values.dedup();

                if values.len() < 2 {
                    return None;
                }

                let mut best: Option<(usize, f64, f64)> = None;
                for pair in values.windows(2) {
                    let threshold = (pair[0] + pair[1]) / 2.0;

                    let (left_y, right_y): (Vec<(f64, f64)>, Vec<(f64, f64)>) = indices
                        .iter()
                        .map(|&i| (x[[i, feature_idx]], y[i]))
                        .partition(|(v, _)| *v <= threshold);
                    let left_y: Vec<f64> = left_y.into_iter().map(|(_, t)| t).collect();
                    let right_y: Vec<f64> = right_y.into_iter().map(|(_, t)| t).collect();

                    if left_y.is_empty() || right_y.is_empty() {
                        continue;
                    }

                    let weighted = (left_y.len() as f64 * variance(&left_y)
                        + right_y.len() as f64 * variance(&right_y))
                        / n;
                    let gain = parent_impurity - weighted;

                    match best {
                        Some((_, _, best_gain)) if gain <= best_gain => {}
                        _ => best = Some((feature_idx, threshold, gain)),
                    }
                }
                best
            })
            .collect();

        feature_results
            .into_iter()
            .flatten()
            .filter(|(_, _, gain)| *gain > 0.0)
            .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(feature, threshold, _)| (feature, threshold))
    }

    fn predict_one(&self, row: ndarray::ArrayView1<f64>) -> Result<f64> {
        let mut node = self.root.as_ref().ok_or(DomusError::ModelNotFitted)?;
        loop {
            match node {
                TreeNode::Leaf { value, .. } => return Ok(*value),
                TreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    node = if row[*feature_idx] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

impl Regressor for DecisionTreeRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_samples = x.nrows();

        if n_samples != y.len() {
            return Err(DomusError::ShapeError {
                expected: format!("y length = {n_samples}"),
                actual: format!("y length = {}", y.len()),
            });
        }

        if n_samples < self.min_samples_split {
            return Err(DomusError::TrainingError(format!(
                "need at least {} samples, got {}",
                self.min_samples_split, n_samples
            )));
        }

        self.n_features = x.ncols();

        let indices: Vec<usize> = (0..n_samples).collect();
        self.root = Some(self.build_tree(x, y, &indices, 0));

        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.n_features {
            return Err(DomusError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        let mut predictions = Array1::zeros(x.nrows());
        for (i, row) in x.rows().into_iter().enumerate() {
            predictions[i] = self.predict_one(row)?;
        }
        Ok(predictions)
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

fn is_constant(values: &[f64]) -> bool {
    values
        .windows(2)
        .all(|pair| (pair[0] - pair[1]).abs() < 1e-12)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_tree_fits_step_function() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [10.0], [11.0], [12.0], [13.0]];
        let y = array![5.0, 5.0, 5.0, 5.0, 50.0, 50.0, 50.0, 50.0];

        let mut tree = DecisionTreeRegressor::new();
        tree.fit(&x, &y).unwrap();

        let pred = tree.predict(&array![[2.5], [11.5]]).unwrap();
        assert!((pred[0] - 5.0).abs() < 1e-9);
        assert!((pred[1] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_depth_limits_tree() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0], [8.0]];
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];

        let mut stump = DecisionTreeRegressor::new().with_max_depth(1);
        stump.fit(&x, &y).unwrap();

        // A depth-1 tree has at most two distinct predictions
        let pred = stump.predict(&x).unwrap();
        let mut distinct: Vec<f64> = pred.to_vec();
        distinct.sort_by(|a, b| a.partial_cmp(b).unwrap());
        distinct.dedup_by(|a, b| (*a - *b).abs() < 1e-12);
        assert!(distinct.len() <= 2);
    }

    #[test]
    fn test_constant_target_is_single_leaf() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![7.0, 7.0, 7.0, 7.0];

        let mut tree = DecisionTreeRegressor::new();
        tree.fit(&x, &y).unwrap();

        let pred = tree.predict(&array![[0.0], [100.0]]).unwrap();
        assert!((pred[0] - 7.0).abs() < 1e-12);
        assert!((pred[1] - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_min_samples_split_forces_leaves() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0], [8.0]];
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];

        // The root may split once; both children fall below the threshold
        let mut tree = DecisionTreeRegressor::new().with_min_samples_split(8);
        tree.fit(&x, &y).unwrap();

        let pred = tree.predict(&x).unwrap();
        let mut distinct: Vec<f64> = pred.to_vec();
        distinct.sort_by(|a, b| a.partial_cmp(b).unwrap());
        distinct.dedup_by(|a, b| (*a - *b).abs() < 1e-12);
        assert!(distinct.len() <= 2);

        // Too few samples for the split threshold is rejected outright
        let mut strict = DecisionTreeRegressor::new().with_min_samples_split(20);
        assert!(strict.fit(&x, &y).is_err());
    }

    #[test]
    fn test_feature_count_mismatch_rejected() {
        let x = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let y = array![1.0, 2.0, 3.0];

        let mut tree = DecisionTreeRegressor::new();
        tree.fit(&x, &y).unwrap();

        assert!(tree.predict(&array![[1.0]]).is_err());
    }
}
