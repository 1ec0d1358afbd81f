//! Corpus analyses of LIWC category scores
//!
//! This crate turns LIWC-annotated corpus tables into the three reports of a
//! diachronic study of psychological vocabulary in fiction.
//!
//! # Overview
//!
//! ## Group Comparison
//!
//! Compare category scores between two corpora (e.g. fiction and non-fiction):
//!
//! 1. **Load Corpora** ([`corpus::Corpus`]): Read the `year` and category columns
//! 2. **Compare** ([`comparison::GroupComparison`]): Median and IQR per group,
//!    Mann-Whitney U, z approximation, effect size, Bonferroni-adjusted p
//!
//! ## Decade Trend Regression
//!
//! 1. **Load Corpus** ([`corpus::Corpus`])
//! 2. **Aggregate by Decade** ([`decade::DecadeMeans`]): Mean score per decade
//! 3. **Fit Trends** ([`trend::CategoryTrend`]): OLS of decade means on decade,
//!    formatted as APA table rows, with confidence bands for charts
//!
//! ## Normalized Trends
//!
//! 1. **Aggregate by Decade** ([`decade::DecadeMeans`])
//! 2. **Normalize and Smooth** ([`normalization::NormalizedTrends`]): Min-max
//!    rescaling to 0-100 followed by LOWESS
//!
//! All constants of these analyses live in [`config::AnalysisConfig`].
//!
//! # Example
//!
//! ```no_run
//! use lexitrend_analysis::{
//!     config::AnalysisConfig, corpus::Corpus, decade::DecadeMeans, trend::CategoryTrend,
//! };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let config = AnalysisConfig::default();
//! let corpus = Corpus::from_path("fiction.csv", &config.categories)?;
//! let means = DecadeMeans::from_corpus(&corpus);
//! for trend in CategoryTrend::fit_all(&means, config.regression.confidence_level)? {
//!     println!("{}", trend.chart_title());
//! }
//! # Ok(())
//! # }
//! ```

pub mod comparison;
pub mod config;
pub mod corpus;
pub mod decade;
pub mod normalization;
pub mod trend;
