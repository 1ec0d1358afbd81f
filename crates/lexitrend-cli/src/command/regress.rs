//! Decade trend regression command
//!
//! Aggregates the corpus by decade, regresses each category's decade means on
//! the decade and prints an APA-style table. One chart per category is written
//! to the plot directory.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use lexitrend_analysis::{
    config::AnalysisConfig,
    decade::DecadeMeans,
    trend::{APA_HEADERS, CategoryTrend},
};

use super::table::Table;
use crate::{plot, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct RegressArg {
    /// Path to the corpus CSV file
    pub data: PathBuf,

    /// Directory for the per-category charts [default: from configuration]
    #[arg(long)]
    pub plot_dir: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long)]
    pub no_plots: bool,
}

pub(crate) fn run(arg: &RegressArg, config: &AnalysisConfig) -> anyhow::Result<()> {
    let corpus = util::read_corpus_file(&arg.data, &config.categories)?;

    eprintln!("Aggregating by decade...");
    let means = DecadeMeans::from_corpus(&corpus);
    eprintln!(
        "Aggregated {} rows into {} decades ({} rows dropped for missing year)",
        means.rows_aggregated,
        means.rows.len(),
        means.rows_dropped
    );

    let level = config.regression.confidence_level;
    let trends = CategoryTrend::fit_all(&means, level).context("Trend regression failed")?;

    println!("OLS Regression of Decade Means on Decade");
    println!();
    let mut table = Table::new(APA_HEADERS);
    for trend in &trends {
        table.push_row(trend.apa_row().cells());
    }
    table.print();
    println!();
    for trend in &trends {
        println!(
            "  {}: {} decades, intercept {:.4} (SE {:.4})",
            trend.category,
            trend.fit.n,
            trend.fit.intercept,
            trend.fit.intercept_std_err
        );
    }

    if arg.no_plots {
        return Ok(());
    }

    let plot_dir = arg
        .plot_dir
        .clone()
        .unwrap_or_else(|| config.regression.plot_dir.clone());
    util::ensure_dir(&plot_dir)?;
    eprintln!();
    eprintln!("Rendering charts to {}...", plot_dir.display());
    for trend in &trends {
        let path = plot_dir.join(chart_file_name(&trend.category));
        plot::draw_trend_chart(&path, config.regression.plot_size, trend)?;
        eprintln!("  {}", path.display());
    }

    Ok(())
}

/// `"{category}_by_decade.png"`, with characters unsafe in file names
/// replaced by `_`.
fn chart_file_name(category: &str) -> String {
    let stem = category
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>();
    format!("{stem}_by_decade.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_file_name() {
        assert_eq!(chart_file_name("Affect"), "Affect_by_decade.png");
        assert_eq!(chart_file_name("Social/Family"), "Social_Family_by_decade.png");
    }
}
