//! Group comparison command
//!
//! Compares the configured categories between two corpora and prints one
//! row per category. The full report can also be exported as JSON or CSV.

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Args;
use lexitrend_analysis::{
    comparison::{ComparisonRow, GroupComparison, row_headers},
    config::AnalysisConfig,
};

use super::table::Table;
use crate::{
    model::report::ComparisonReport,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct CompareArg {
    /// Path to the first group's corpus CSV (e.g. fiction)
    pub first: PathBuf,

    /// Path to the second group's corpus CSV (e.g. non-fiction)
    pub second: PathBuf,

    /// Export the report to this file ("-" for stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Export format: json or csv
    #[arg(long, default_value = "json")]
    pub format: ExportFormat,
}

pub(crate) fn run(arg: &CompareArg, config: &AnalysisConfig) -> anyhow::Result<()> {
    let labels = &config.comparison;
    let first = util::read_corpus_file(&arg.first, &config.categories)?;
    let second = util::read_corpus_file(&arg.second, &config.categories)?;

    eprintln!(
        "Comparing {} categories ({} vs {})...",
        config.categories.len(),
        labels.first_label,
        labels.second_label
    );
    let comparison = GroupComparison::run(&first, &second, &config.categories)
        .context("Group comparison failed")?;

    println!(
        "Mann-Whitney U Tests: {} vs {} (Bonferroni factor {})",
        labels.first_label,
        labels.second_label,
        config.categories.len()
    );
    println!();
    let mut table = Table::new(row_headers(&labels.first_label, &labels.second_label));
    for row in comparison.rows() {
        table.push_row(row.cells());
    }
    table.print();
    println!();
    for category in &comparison.categories {
        println!(
            "  {}: n = {} / {}, p-value method: {}",
            category.category, category.test.n1, category.test.n2, category.test.method
        );
    }

    if let Some(path) = &arg.output {
        let output_path = (path.as_os_str() != "-").then(|| path.clone());
        let mut output = Output::from_output_path(output_path)?;
        match arg.format {
            ExportFormat::Json => {
                let report = ComparisonReport {
                    generated_at: Utc::now(),
                    first_label: &labels.first_label,
                    second_label: &labels.second_label,
                    first_path: &arg.first,
                    second_path: &arg.second,
                    num_tests: config.categories.len(),
                    categories: &comparison.categories,
                };
                output.write_json(&report)?;
            }
            ExportFormat::Csv => {
                let headers = row_headers(&labels.first_label, &labels.second_label);
                output.write_csv(&headers, comparison.rows().iter().map(ComparisonRow::cells))?;
            }
        }
        eprintln!();
        eprintln!("Report saved to {}", output.display_path());
    }

    Ok(())
}
