//! Model comparison harness
//!
//! Fits each candidate model on the training split, scores it on the test
//! split, and collects one metrics row per model into a table sorted by R²
//! descending. Metrics are computed once per model and reused everywhere.

use crate::error::Result;
use crate::models::{
    DecisionTreeRegressor, ForestParams, GradientBoostingConfig, GradientBoostingRegressor,
    LinearRegression, RandomForestRegressor, RegressionMetrics, Regressor, RidgeRegression,
};
use crate::preprocessing::TrainTestSplit;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// The five model types the pipeline compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    Linear,
    Ridge,
    DecisionTree,
    RandomForest,
    GradientBoosting,
}

impl ModelKind {
    /// All candidates, in comparison order.
    pub fn all() -> [ModelKind; 5] {
        [
            ModelKind::Linear,
            ModelKind::Ridge,
            ModelKind::DecisionTree,
            ModelKind::RandomForest,
            ModelKind::GradientBoosting,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::Linear => "Linear Regression",
            ModelKind::Ridge => "Ridge Regression",
            ModelKind::DecisionTree => "Decision Tree",
            ModelKind::RandomForest => "Random Forest",
            ModelKind::GradientBoosting => "Gradient Boosting",
        }
    }

    /// Construct an unfitted model with the pipeline's defaults.
    pub fn build(&self, seed: u64) -> Box<dyn Regressor> {
        match self {
            ModelKind::Linear => Box::new(LinearRegression::new()),
            ModelKind::Ridge => Box::new(RidgeRegression::new(1.0)),
            ModelKind::DecisionTree => Box::new(DecisionTreeRegressor::new().with_max_depth(10)),
            ModelKind::RandomForest => Box::new(
                RandomForestRegressor::new(ForestParams::default()).with_random_state(seed),
            ),
            ModelKind::GradientBoosting => {
                Box::new(GradientBoostingRegressor::new(GradientBoostingConfig {
                    random_state: Some(seed),
                    ..Default::default()
                }))
            }
        }
    }
}

/// One row of the comparison table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub model: String,
    pub metrics: RegressionMetrics,
    pub training_time_secs: f64,
}

/// Comparison results for all models, sorted by R² descending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonTable {
    entries: Vec<ComparisonEntry>,
}

impl ComparisonTable {
    /// Collect entries and sort by R² descending.
    pub fn from_entries(mut entries: Vec<ComparisonEntry>) -> Self {
        entries.sort_by(|a, b| {
            b.metrics
                .r2
                .partial_cmp(&a.metrics.r2)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self { entries }
    }

    pub fn entries(&self) -> &[ComparisonEntry] {
        &self.entries
    }

    /// The top-ranked entry, if any models were compared.
    pub fn best(&self) -> Option<&ComparisonEntry> {
        self.entries.first()
    }

    /// Render as a polars DataFrame for CSV export.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let models: Vec<&str> = self.entries.iter().map(|e| e.model.as_str()).collect();
        let mae: Vec<f64> = self.entries.iter().map(|e| e.metrics.mae).collect();
        let mse: Vec<f64> = self.entries.iter().map(|e| e.metrics.mse).collect();
        let rmse: Vec<f64> = self.entries.iter().map(|e| e.metrics.rmse).collect();
        let r2: Vec<f64> = self.entries.iter().map(|e| e.metrics.r2).collect();

        let df = DataFrame::new(vec![
            Column::new("model".into(), models),
            Column::new("mae".into(), mae),
            Column::new("mse".into(), mse),
            Column::new("rmse".into(), rmse),
            Column::new("r2".into(), r2),
        ])?;

        Ok(df)
    }
}

/// Fit and score each candidate model on the given split.
pub fn compare_models(split: &TrainTestSplit, seed: u64) -> Result<ComparisonTable> {
    let mut entries = Vec::with_capacity(ModelKind::all().len());

    for kind in ModelKind::all() {
        let start = Instant::now();
        let mut model = kind.build(seed);
        model.fit(&split.x_train, &split.y_train)?;
        let training_time_secs = start.elapsed().as_secs_f64();

        let y_pred = model.predict(&split.x_test)?;
        let metrics = RegressionMetrics::compute(&split.y_test, &y_pred);

        tracing::info!(
            model = kind.name(),
            mae = metrics.mae,
            rmse = metrics.rmse,
            r2 = metrics.r2,
            "model evaluated"
        );

        entries.push(ComparisonEntry {
            model: kind.name().to_string(),
            metrics,
            training_time_secs,
        });
    }

    Ok(ComparisonTable::from_entries(entries))
}
