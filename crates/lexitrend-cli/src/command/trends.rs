//! Normalized trend chart command
//!
//! Min-max normalizes each category's decade means, smooths them with LOWESS
//! and draws every category on one annotated chart.

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Args;
use lexitrend_analysis::{
    config::AnalysisConfig, decade::DecadeMeans, normalization::NormalizedTrends,
};

use crate::{
    model::report::TrendSeriesReport,
    plot,
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct TrendsArg {
    /// Path to the corpus CSV file
    pub data: PathBuf,

    /// Output PNG path [default: from configuration]
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// LOWESS bandwidth fraction in (0, 1] [default: from configuration]
    #[arg(long)]
    pub frac: Option<f64>,

    /// Also save the normalized and smoothed series as JSON to this path
    #[arg(long)]
    pub series_output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrendsArg, config: &AnalysisConfig) -> anyhow::Result<()> {
    let chart = &config.trends;
    let corpus = util::read_corpus_file(&arg.data, &config.categories)?;

    eprintln!("Aggregating by decade...");
    let means = DecadeMeans::from_corpus(&corpus);
    eprintln!(
        "Aggregated {} rows into {} decades ({} rows dropped for missing year)",
        means.rows_aggregated,
        means.rows.len(),
        means.rows_dropped
    );

    let frac = arg.frac.unwrap_or(chart.lowess_frac);
    eprintln!("Normalizing and smoothing (LOWESS frac = {frac})...");
    let trends = NormalizedTrends::from_decade_means(&means, frac)
        .context("Failed to compute normalized trends")?;
    for series in &trends.series {
        eprintln!("  {}: {} decades", series.category, series.decades.len());
    }

    let figure_path = arg.output.as_ref().unwrap_or(&chart.figure_path);
    plot::draw_normalized_trends(figure_path, chart, &trends)?;
    eprintln!();
    eprintln!("Figure saved to {}", figure_path.display());

    if let Some(path) = &arg.series_output {
        util::ensure_parent_dir(path)?;
        let report = TrendSeriesReport {
            generated_at: Utc::now(),
            source_path: &arg.data,
            lowess_frac: trends.lowess_frac,
            rows_aggregated: means.rows_aggregated,
            rows_dropped: means.rows_dropped,
            series: &trends.series,
        };
        Output::save_json(&report, Some(path.clone()))?;
        eprintln!("Series saved to {}", path.display());
    }

    Ok(())
}
