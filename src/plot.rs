//! PNG chart rendering for the analysis and comparison stages
//!
//! All charts render to 800x600 PNG files via the bitmap backend so the
//! pipeline produces shareable artifacts instead of requiring a display.

use crate::analysis::CorrelationMatrix;
use crate::compare::ComparisonTable;
use crate::error::{DomusError, Result};
use plotters::prelude::*;
use std::path::Path;

const CHART_SIZE: (u32, u32) = (800, 600);

/// Padding factor for scatter axes (5% of range)
const AXIS_PADDING: f64 = 0.05;

fn plot_err<E: std::fmt::Display>(e: E) -> DomusError {
    DomusError::PlotError(e.to_string())
}

/// Map a correlation in [-1, 1] to a blue/white/red cell color.
fn correlation_color(r: f64) -> RGBColor {
    let r = r.clamp(-1.0, 1.0);
    if r >= 0.0 {
        let fade = (255.0 * (1.0 - r)) as u8;
        RGBColor(255, fade, fade)
    } else {
        let fade = (255.0 * (1.0 + r)) as u8;
        RGBColor(fade, fade, 255)
    }
}

/// Render the correlation matrix as a heatmap.
pub fn correlation_heatmap(corr: &CorrelationMatrix, path: &Path) -> Result<()> {
    let k = corr.columns.len();
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation Matrix", ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(80)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0..k as f64, 0.0..k as f64)
        .map_err(plot_err)?;

    let columns = corr.columns.clone();
    let columns_y = corr.columns.clone();
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(k)
        .y_labels(k)
        .x_label_formatter(&move |v| {
            columns
                .get(v.floor() as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_label_formatter(&move |v| {
            columns_y
                .get(v.floor() as usize)
                .cloned()
                .unwrap_or_default()
        })
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series((0..k).flat_map(|i| {
            let values = &corr.values;
            (0..k).map(move |j| {
                let color = correlation_color(values[[i, j]]);
                Rectangle::new(
                    [(j as f64, i as f64), (j as f64 + 1.0, i as f64 + 1.0)],
                    color.filled(),
                )
            })
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Scatter plot of one feature against the target.
pub fn scatter_plot(
    xs: &[f64],
    ys: &[f64],
    x_label: &str,
    y_label: &str,
    path: &Path,
) -> Result<()> {
    if xs.len() != ys.len() || xs.is_empty() {
        return Err(DomusError::PlotError(format!(
            "scatter needs equal non-empty series, got {} and {}",
            xs.len(),
            ys.len()
        )));
    }

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let (min_x, max_x) = padded_range(xs);
    let (min_y, max_y) = padded_range(ys);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{y_label} vs {x_label}"),
            ("sans-serif", 30).into_font(),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(min_x..max_x, min_y..max_y)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(
            xs.iter()
                .zip(ys.iter())
                .map(|(&x, &y)| Circle::new((x, y), 3, BLUE.mix(0.5).filled())),
        )
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Histogram of a numeric series with a fixed number of bins.
pub fn histogram(values: &[f64], n_bins: usize, title: &str, path: &Path) -> Result<()> {
    if values.is_empty() || n_bins == 0 {
        return Err(DomusError::PlotError(
            "histogram needs values and at least one bin".to_string(),
        ));
    }

    let min_v = values.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max_v = values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let width = ((max_v - min_v) / n_bins as f64).max(f64::EPSILON);

    let mut counts = vec![0usize; n_bins];
    for &v in values {
        let bin = (((v - min_v) / width) as usize).min(n_bins - 1);
        counts[bin] += 1;
    }
    let max_count = counts.iter().copied().max().unwrap_or(1);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(min_v..max_v, 0.0..(max_count as f64 * 1.1))
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc(title)
        .y_desc("Count")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, &count)| {
            let x0 = min_v + i as f64 * width;
            let x1 = x0 + width;
            Rectangle::new([(x0, 0.0), (x1, count as f64)], BLUE.mix(0.6).filled())
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Bar chart of category frequencies, in the order given.
pub fn category_bar_chart(
    freqs: &[(String, usize)],
    title: &str,
    path: &Path,
) -> Result<()> {
    if freqs.is_empty() {
        return Err(DomusError::PlotError(
            "bar chart needs at least one category".to_string(),
        ));
    }

    let max_count = freqs.iter().map(|(_, c)| *c).max().unwrap_or(1);
    let n = freqs.len();

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(80)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..n as f64, 0.0..(max_count as f64 * 1.1))
        .map_err(plot_err)?;

    let labels: Vec<String> = freqs.iter().map(|(name, _)| name.clone()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&move |v| {
            labels.get(v.floor() as usize).cloned().unwrap_or_default()
        })
        .y_desc("Count")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(freqs.iter().enumerate().map(|(i, (_, count))| {
            Rectangle::new(
                [(i as f64 + 0.1, 0.0), (i as f64 + 0.9, *count as f64)],
                GREEN.mix(0.6).filled(),
            )
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Bar chart of R² per model, in the table's ranked order.
pub fn model_ranking_chart(table: &ComparisonTable, path: &Path) -> Result<()> {
    let entries = table.entries();
    if entries.is_empty() {
        return Err(DomusError::PlotError(
            "ranking chart needs at least one model".to_string(),
        ));
    }

    let n = entries.len();
    let min_r2 = entries
        .iter()
        .map(|e| e.metrics.r2)
        .fold(f64::INFINITY, f64::min)
        .min(0.0);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Model Comparison (R²)", ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..n as f64, min_r2..1.0)
        .map_err(plot_err)?;

    let names: Vec<String> = entries.iter().map(|e| e.model.clone()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&move |v| {
            names.get(v.floor() as usize).cloned().unwrap_or_default()
        })
        .y_desc("R²")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(entries.iter().enumerate().map(|(i, entry)| {
            Rectangle::new(
                [(i as f64 + 0.1, 0.0), (i as f64 + 0.9, entry.metrics.r2)],
                RED.mix(0.6).filled(),
            )
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

fn padded_range(values: &[f64]) -> (f64, f64) {
    let min_v = values.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max_v = values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let pad = ((max_v - min_v) * AXIS_PADDING).max(1e-6);
    (min_v - pad, max_v + pad)
}
