//! Domus - Housing price analysis and regression benchmarking
//!
//! This crate loads a housing dataset from CSV, profiles and visualizes it,
//! encodes categorical features, and compares five regression models under a
//! shared seeded train/test split, then tunes the strongest candidate with an
//! exhaustive grid search.
//!
//! # Modules
//!
//! - [`data`] - CSV loading and dataset profiling
//! - [`analysis`] - Correlations and category frequencies
//! - [`preprocessing`] - One-hot encoding and train/test splitting
//! - [`models`] - The five regressors and their shared metrics
//! - [`compare`] - Fit/score harness and the ranked comparison table
//! - [`search`] - Grid search with k-fold cross-validation
//! - [`plot`] - PNG chart rendering
//! - [`report`] - CSV/JSON persistence and text rendering
//! - [`pipeline`] - End-to-end orchestration

pub mod error;

pub mod analysis;
pub mod data;
pub mod models;
pub mod preprocessing;

pub mod compare;
pub mod search;

pub mod pipeline;
pub mod plot;
pub mod report;

pub use error::{DomusError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{DomusError, Result};

    pub use crate::data::{describe_numeric, load_csv, profile, DatasetProfile};

    pub use crate::preprocessing::{
        split_features_target, train_test_split, FeatureMatrix, OneHotEncoder, TrainTestSplit,
    };

    pub use crate::models::{
        DecisionTreeRegressor, ForestParams, GradientBoostingConfig, GradientBoostingRegressor,
        LinearRegression, RandomForestRegressor, RegressionMetrics, Regressor, RidgeRegression,
    };

    pub use crate::compare::{compare_models, ComparisonTable, ModelKind};
    pub use crate::search::{grid_search_forest, ForestGrid, GridSearchOutcome};

    pub use crate::pipeline::{run, PipelineConfig, PipelineOutcome};
}
