//! Regression models
//!
//! Five regressors used by the comparison pipeline:
//! - Linear regression (OLS via normal equations)
//! - Ridge regression (L2-regularized)
//! - Decision tree (variance-reduction splits)
//! - Random forest (bagged trees with column subsampling)
//! - Gradient boosting (residual boosting with shrinkage)

mod boosting;
mod linear;
mod metrics;
mod tree;
mod forest;

pub use boosting::{GradientBoostingConfig, GradientBoostingRegressor};
pub use linear::{LinearRegression, RidgeRegression};
pub use metrics::RegressionMetrics;
pub use tree::DecisionTreeRegressor;
pub use forest::{ForestParams, RandomForestRegressor};

use crate::error::Result;
use ndarray::{Array1, Array2};

/// Seam between the comparison harness and any model it fits.
pub trait Regressor: Send + Sync {
    /// Fit the model to training data
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Make predictions
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}
