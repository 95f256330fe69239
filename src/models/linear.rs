//! Linear model implementations

use super::Regressor;
use crate::error::{DomusError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Cholesky solve of Ax = b for a symmetric positive-definite A, with one
/// ridge-regularized retry when the factorization hits a non-positive pivot.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    // A = L * L^T
    let mut l = Array2::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }

            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    // Retry once with a small ridge on the diagonal
                    let mut a_reg = a.clone();
                    let ridge = 1e-8 * a.diag().iter().map(|v| v.abs()).sum::<f64>() / n as f64;
                    for k in 0..n {
                        a_reg[[k, k]] += ridge;
                    }
                    return cholesky_solve_inner(&a_reg, b);
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    Some(back_substitute(&l, b))
}

/// Single-attempt factorization used by the regularized retry
fn cholesky_solve_inner(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    Some(back_substitute(&l, b))
}

/// Two triangular solves through the factor: L y = b, then L^T x = y.
fn back_substitute(l: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = l.nrows();

    let mut y = Array1::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * y[j];
        }
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    x
}

/// Gauss-Jordan inversion of the normal-equation matrix when Cholesky
/// declines. Partial pivoting on an [A | I] augmented matrix.
fn matrix_inverse(m: &Array2<f64>) -> Option<Array2<f64>> {
    let n = m.nrows();
    if n != m.ncols() {
        return None;
    }

    let mut aug = Array2::zeros((n, 2 * n));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = m[[i, j]];
        }
        aug[[i, n + i]] = 1.0;
    }

    for col in 0..n {
        let mut max_row = col;
        for row in col + 1..n {
            if aug[[row, col]].abs() > aug[[max_row, col]].abs() {
                max_row = row;
            }
        }

        if max_row != col {
            for j in 0..2 * n {
                aug.swap([col, j], [max_row, j]);
            }
        }

        if aug[[col, col]].abs() < 1e-10 {
            return None;
        }

        let pivot = aug[[col, col]];
        for j in 0..2 * n {
            aug[[col, j]] /= pivot;
        }

        for row in 0..n {
            if row != col {
                let factor = aug[[row, col]];
                for j in 0..2 * n {
                    aug[[row, j]] -= factor * aug[[col, j]];
                }
            }
        }
    }

    let mut inv = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            inv[[i, j]] = aug[[i, n + j]];
        }
    }

    Some(inv)
}

/// Solve the normal equations (X^T X + alpha*I) w = X^T y.
fn solve_normal_equations(x: &Array2<f64>, y: &Array1<f64>, alpha: f64) -> Result<Array1<f64>> {
    let mut xtx = x.t().dot(x);
    if alpha > 0.0 {
        for i in 0..xtx.nrows() {
            xtx[[i, i]] += alpha;
        }
    }
    let xty = x.t().dot(y);

    if let Some(result) = cholesky_solve(&xtx, &xty) {
        return Ok(result);
    }

    match matrix_inverse(&xtx) {
        Some(inv) => Ok(inv.dot(&xty)),
        None => Err(DomusError::ComputationError(
            "design matrix is singular, cannot solve normal equations".to_string(),
        )),
    }
}

/// Ordinary least squares linear regression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    pub coefficients: Option<Array1<f64>>,
    pub intercept: Option<f64>,
    pub fit_intercept: bool,
    pub is_fitted: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept: true,
            is_fitted: false,
        }
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    fn fit_with_alpha(&mut self, x: &Array2<f64>, y: &Array1<f64>, alpha: f64) -> Result<()> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(DomusError::ShapeError {
                expected: format!("y length = {n_samples}"),
                actual: format!("y length = {}", y.len()),
            });
        }

        // Center data if fitting intercept
        let (x_centered, y_centered, x_mean, y_mean) = if self.fit_intercept {
            let x_mean = x.mean_axis(Axis(0)).unwrap();
            let y_mean = y.mean().unwrap_or(0.0);

            let x_centered = x - &x_mean.clone().insert_axis(Axis(0));
            let y_centered = y - y_mean;

            (x_centered, y_centered, Some(x_mean), Some(y_mean))
        } else {
            (x.clone(), y.clone(), None, None)
        };

        let coefficients = solve_normal_equations(&x_centered, &y_centered, alpha)?;

        let intercept = match (x_mean, y_mean) {
            (Some(xm), Some(ym)) => ym - coefficients.dot(&xm),
            _ => 0.0,
        };

        self.coefficients = Some(coefficients);
        self.intercept = Some(intercept);
        self.is_fitted = true;

        Ok(())
    }

    fn predict_inner(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(DomusError::ModelNotFitted);
        }

        let coefficients = self.coefficients.as_ref().ok_or(DomusError::ModelNotFitted)?;
        let intercept = self.intercept.unwrap_or(0.0);

        Ok(x.dot(coefficients) + intercept)
    }
}

impl Regressor for LinearRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        self.fit_with_alpha(x, y, 0.0)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.predict_inner(x)
    }
}

/// Ridge regression (L2-regularized linear regression)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RidgeRegression {
    inner: LinearRegression,
    /// L2 regularization strength
    pub alpha: f64,
}

impl Default for RidgeRegression {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RidgeRegression {
    pub fn new(alpha: f64) -> Self {
        Self {
            inner: LinearRegression::new(),
            alpha,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.inner.coefficients.as_ref()
    }
}

impl Regressor for RidgeRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        self.inner.fit_with_alpha(x, y, self.alpha)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.inner.predict_inner(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_ols_recovers_line() {
        // y = 2x + 1
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![3.0, 5.0, 7.0, 9.0, 11.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients.as_ref().unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-8);
        assert!((model.intercept.unwrap() - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_ols_two_features() {
        // y = 2*x1 + 3*x2 + 0.5
        let x = array![
            [1.0, 2.0],
            [2.0, 1.0],
            [3.0, 4.0],
            [4.0, 3.0],
            [5.0, 6.0],
            [6.0, 5.0]
        ];
        let y = x.map_axis(ndarray::Axis(1), |row| 2.0 * row[0] + 3.0 * row[1] + 0.5);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let pred = model.predict(&x).unwrap();
        for (p, t) in pred.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-6);
        }
    }

    #[test]
    fn test_ridge_shrinks_coefficients() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![3.0, 5.0, 7.0, 9.0, 11.0];

        let mut ols = LinearRegression::new();
        ols.fit(&x, &y).unwrap();

        let mut ridge = RidgeRegression::new(10.0);
        ridge.fit(&x, &y).unwrap();

        let ols_coef = ols.coefficients.as_ref().unwrap()[0].abs();
        let ridge_coef = ridge.coefficients().unwrap()[0].abs();
        assert!(ridge_coef < ols_coef);
    }

    #[test]
    fn test_no_intercept_goes_through_origin() {
        // y = 3x exactly, no offset
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![3.0, 6.0, 9.0, 12.0];

        let mut model = LinearRegression::new().with_fit_intercept(false);
        model.fit(&x, &y).unwrap();

        assert!((model.intercept.unwrap() - 0.0).abs() < 1e-12);
        let pred = model.predict(&array![[0.0]]).unwrap();
        assert!(pred[0].abs() < 1e-8);
    }

    #[test]
    fn test_ridge_with_alpha_overrides_strength() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![3.0, 5.0, 7.0, 9.0, 11.0];

        let mut weak = RidgeRegression::new(0.0).with_alpha(0.01);
        let mut strong = RidgeRegression::new(0.0).with_alpha(100.0);
        weak.fit(&x, &y).unwrap();
        strong.fit(&x, &y).unwrap();

        assert!(strong.coefficients().unwrap()[0].abs() < weak.coefficients().unwrap()[0].abs());
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = LinearRegression::new();
        let x = array![[1.0]];
        assert!(matches!(
            model.predict(&x),
            Err(DomusError::ModelNotFitted)
        ));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 2.0, 3.0];
        let mut model = LinearRegression::new();
        assert!(model.fit(&x, &y).is_err());
    }
}
