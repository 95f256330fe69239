//! Domus - Main Entry Point
//!
//! Runs the housing price analysis and model comparison pipeline.

use clap::Parser;
use domus::pipeline::{self, PipelineConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "domus", about = "Housing price analysis and regression benchmarking")]
struct Cli {
    /// Path to the housing CSV file
    #[arg(long, default_value = "data/housing.csv")]
    data: PathBuf,

    /// Directory for plots, tables, and saved models
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Target column to predict
    #[arg(long, default_value = "SalePrice")]
    target: String,

    /// Categorical column to one-hot encode
    #[arg(long, default_value = "Neighborhood")]
    categorical: String,

    /// Random seed for splits and model fitting
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Fraction of rows held out for testing
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f64,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "domus=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = PipelineConfig {
        data_path: cli.data,
        out_dir: cli.out_dir,
        target: cli.target,
        categorical: cli.categorical,
        seed: cli.seed,
        test_fraction: cli.test_fraction,
    };

    let outcome = pipeline::run(&config)?;

    tracing::info!(
        models = outcome.comparison.entries().len(),
        trials = outcome.search.trials.len(),
        "pipeline finished"
    );

    Ok(())
}
