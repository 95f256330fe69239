//! End-to-end pipeline: load, profile, analyze, encode, split, compare,
//! tune, and report.

use crate::analysis::{category_frequencies, correlation_matrix};
use crate::compare::{compare_models, ComparisonTable};
use crate::data::{describe_numeric, load_csv, profile, DatasetProfile};
use crate::error::{DomusError, Result};
use crate::models::{RandomForestRegressor, RegressionMetrics, Regressor};
use crate::plot;
use crate::preprocessing::{split_features_target, train_test_split, OneHotEncoder};
use crate::report;
use crate::search::{grid_search_forest, ForestGrid, GridSearchOutcome};
use polars::prelude::*;
use std::fs;
use std::path::PathBuf;

/// Number of top-correlated features to scatter against the target
const SCATTER_FEATURES: usize = 3;

/// Bins for the target histogram
const HISTOGRAM_BINS: usize = 30;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_path: PathBuf,
    pub out_dir: PathBuf,
    pub target: String,
    pub categorical: String,
    pub seed: u64,
    pub test_fraction: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/housing.csv"),
            out_dir: PathBuf::from("out"),
            target: "SalePrice".to_string(),
            categorical: "Neighborhood".to_string(),
            seed: 42,
            test_fraction: 0.2,
        }
    }
}

/// Everything the pipeline produced, for callers that want to inspect it.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub profile: DatasetProfile,
    pub comparison: ComparisonTable,
    pub search: GridSearchOutcome,
    pub tuned_metrics: Option<RegressionMetrics>,
}

/// Run the full pipeline with the given configuration.
pub fn run(config: &PipelineConfig) -> Result<PipelineOutcome> {
    fs::create_dir_all(&config.out_dir)?;

    // Stage 1: load and profile
    tracing::info!(path = %config.data_path.display(), "loading dataset");
    let df = load_csv(&config.data_path)?;
    let dataset_profile = profile(&df);

    tracing::info!(
        rows = dataset_profile.n_rows,
        cols = dataset_profile.n_cols,
        nulls = dataset_profile.total_nulls(),
        "dataset loaded"
    );
    println!("{}", df.head(Some(5)));

    for summary in describe_numeric(&df)? {
        println!(
            "{:<16} count={:<6} mean={:<14.2} std={:<14.2} min={:<12.2} max={:.2}",
            summary.name, summary.count, summary.mean, summary.std, summary.min, summary.max
        );
    }

    for col in &dataset_profile.columns {
        if col.null_count > 0 {
            tracing::warn!(column = %col.name, nulls = col.null_count, "column has missing values");
        }
    }

    // Stage 2: exploratory analysis and plots
    let non_numeric = dataset_profile.non_numeric_columns();
    if !non_numeric.is_empty() {
        tracing::info!(columns = ?non_numeric, "non-numeric columns excluded from correlation");
    }
    let corr = correlation_matrix(&df)?;
    plot::correlation_heatmap(&corr, &config.out_dir.join("correlation_heatmap.png"))?;

    let target_values = column_f64(&df, &config.target)?;
    plot::histogram(
        &target_values,
        HISTOGRAM_BINS,
        &config.target,
        &config.out_dir.join("target_histogram.png"),
    )?;

    for feature in top_correlated_features(&corr, &config.target, SCATTER_FEATURES) {
        let xs = column_f64(&df, &feature)?;
        let filename = format!("scatter_{}.png", feature.to_lowercase());
        plot::scatter_plot(
            &xs,
            &target_values,
            &feature,
            &config.target,
            &config.out_dir.join(filename),
        )?;
    }

    // Stage 3: encode the categorical column, if present
    let encoded = if df.column(&config.categorical).is_ok() {
        let freqs = category_frequencies(&df, &config.categorical)?;
        tracing::info!(
            column = %config.categorical,
            categories = freqs.len(),
            "categorical column found"
        );
        plot::category_bar_chart(
            &freqs,
            &config.categorical,
            &config.out_dir.join("category_frequencies.png"),
        )?;

        let mut encoder = OneHotEncoder::new();
        encoder.fit_transform(&df, &[config.categorical.as_str()])?
    } else {
        tracing::warn!(column = %config.categorical, "categorical column missing, skipping encoding");
        df.clone()
    };

    // Stage 4: split
    let features = split_features_target(&encoded, &config.target)?;
    let split = train_test_split(&features, config.test_fraction, config.seed)?;
    tracing::info!(
        train = split.train_indices.len(),
        test = split.test_indices.len(),
        features = features.feature_names.len(),
        "train/test split created"
    );

    // Stage 5: compare the five models
    let comparison = compare_models(&split, config.seed)?;
    println!("\n{}", report::render_comparison_text(&comparison));
    report::write_comparison_csv(&comparison, &config.out_dir.join("model_comparison.csv"))?;
    plot::model_ranking_chart(&comparison, &config.out_dir.join("model_ranking.png"))?;

    // Stage 6: tune the forest
    tracing::info!("starting grid search over forest hyperparameters");
    let search = grid_search_forest(
        &ForestGrid::default(),
        &split.x_train,
        &split.y_train,
        3,
        config.seed,
    )?;
    report::save_json(&search, &config.out_dir.join("grid_search.json"))?;

    // Stage 7: refit the best candidate and score it on the held-out set
    let tuned_metrics = match &search.best {
        Some(best) => {
            tracing::info!(params = ?best.params, score = best.score, "best candidate found");
            let mut forest =
                RandomForestRegressor::new(best.params).with_random_state(config.seed);
            forest.fit(&split.x_train, &split.y_train)?;

            let y_pred = forest.predict(&split.x_test)?;
            let metrics = RegressionMetrics::compute(&split.y_test, &y_pred);
            println!(
                "Tuned Random Forest: MAE={:.2} RMSE={:.2} R²={:.4}",
                metrics.mae, metrics.rmse, metrics.r2
            );

            report::save_model(&forest, &config.out_dir.join("best_model.json"));
            Some(metrics)
        }
        None => {
            tracing::warn!("grid search produced no candidates, skipping tuned refit");
            None
        }
    };

    Ok(PipelineOutcome {
        profile: dataset_profile,
        comparison,
        search,
        tuned_metrics,
    })
}

/// Feature names most correlated (absolute) with the target, descending.
fn top_correlated_features(
    corr: &crate::analysis::CorrelationMatrix,
    target: &str,
    limit: usize,
) -> Vec<String> {
    let mut scored: Vec<(String, f64)> = corr
        .columns
        .iter()
        .filter(|name| name.as_str() != target)
        .filter_map(|name| corr.get(name, target).map(|r| (name.clone(), r.abs())))
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored.into_iter().map(|(name, _)| name).collect()
}

/// Extract one column as f64 values, casting from any numeric dtype.
fn column_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| DomusError::ColumnNotFound(name.to_string()))?;
    let series = column
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|e| DomusError::DataError(e.to_string()))?;
    let values = series
        .f64()
        .map_err(|e| DomusError::DataError(e.to_string()))?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect();
    Ok(values)
}
