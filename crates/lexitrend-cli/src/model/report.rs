use std::path::Path;

use chrono::{DateTime, Utc};
use lexitrend_analysis::{comparison::CategoryComparison, normalization::NormalizedSeries};
use serde::Serialize;

/// Exported group comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub first_label: &'a str,
    pub second_label: &'a str,
    pub first_path: &'a Path,
    pub second_path: &'a Path,
    /// Bonferroni factor.
    pub num_tests: usize,
    pub categories: &'a [CategoryComparison],
}

/// Exported normalized and smoothed decade series.
#[derive(Debug, Clone, Serialize)]
pub struct TrendSeriesReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub source_path: &'a Path,
    pub lowess_frac: f64,
    pub rows_aggregated: usize,
    pub rows_dropped: usize,
    pub series: &'a [NormalizedSeries],
}
