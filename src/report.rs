//! Result persistence: comparison CSV, JSON artifacts, and text rendering

use crate::compare::ComparisonTable;
use crate::data::write_csv;
use crate::error::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Persist a fitted model as pretty-printed JSON.
///
/// Serialization failure is logged and swallowed: a missing model file
/// should not abort a pipeline whose metrics and plots already exist.
pub fn save_model<T: Serialize>(model: &T, path: &Path) {
    let payload = match serde_json::to_string_pretty(model) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "model serialization failed, skipping save");
            return;
        }
    };

    if let Err(e) = fs::write(path, payload) {
        tracing::warn!(path = %path.display(), error = %e, "model write failed, skipping save");
    } else {
        tracing::info!(path = %path.display(), "model saved");
    }
}

/// Persist any serializable artifact as pretty-printed JSON.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)?;
    fs::write(path, payload)?;
    Ok(())
}

/// Write the comparison table to a CSV file.
pub fn write_comparison_csv(table: &ComparisonTable, path: &Path) -> Result<()> {
    let mut df = table.to_dataframe()?;
    write_csv(&mut df, path)
}

/// Render the comparison table as aligned text for console output.
pub fn render_comparison_text(table: &ComparisonTable) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<20} {:>14} {:>16} {:>14} {:>8}\n",
        "Model", "MAE", "MSE", "RMSE", "R²"
    ));

    for entry in table.entries() {
        out.push_str(&format!(
            "{:<20} {:>14.2} {:>16.2} {:>14.2} {:>8.4}\n",
            entry.model,
            entry.metrics.mae,
            entry.metrics.mse,
            entry.metrics.rmse,
            entry.metrics.r2
        ));
    }

    if let Some(best) = table.best() {
        out.push_str(&format!(
            "\nBest model: {} (R² = {:.4})\n",
            best.model, best.metrics.r2
        ));
    }

    out
}
