//! Decade bucketing and per-decade category means
//!
//! Rows without a year are dropped first. Remaining rows are grouped by
//! `floor(year / 10) * 10`, and each category is averaged over its
//! non-missing scores. Only observed decades appear; there is no gap filling.

use std::collections::BTreeMap;

use lexitrend_stats::descriptive::DescriptiveStats;
use serde::Serialize;

use crate::corpus::Corpus;

/// Decade bucket of a year, `floor(year / 10) * 10`.
///
/// ```
/// use lexitrend_analysis::decade::decade_of;
///
/// assert_eq!(decade_of(1983), 1980);
/// assert_eq!(decade_of(1979), 1970);
/// assert_eq!(decade_of(2000), 2000);
/// assert_eq!(decade_of(-5), -10);
/// ```
#[must_use]
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Means of one decade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecadeRow {
    pub decade: i32,
    /// Mean per category; `None` when the decade has no score for it.
    pub means: Vec<Option<f64>>,
    /// Number of scores behind each mean.
    pub counts: Vec<usize>,
}

/// Per-decade category means of a corpus, ascending by decade.
#[derive(Debug, Clone, Serialize)]
pub struct DecadeMeans {
    pub categories: Vec<String>,
    pub rows: Vec<DecadeRow>,
    /// Rows that entered the aggregation.
    pub rows_aggregated: usize,
    /// Rows dropped for a missing year.
    pub rows_dropped: usize,
}

/// The present decade means of one category, as `f64` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecadeSeries {
    pub decades: Vec<f64>,
    pub means: Vec<f64>,
}

impl DecadeMeans {
    #[must_use]
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let num_categories = corpus.categories().len();
        let mut buckets = BTreeMap::<i32, Vec<Vec<f64>>>::new();
        let mut rows_aggregated = 0;
        let mut rows_dropped = 0;

        for obs in corpus.observations() {
            let Some(year) = obs.year else {
                rows_dropped += 1;
                continue;
            };
            rows_aggregated += 1;
            let scores = buckets
                .entry(decade_of(year))
                .or_insert_with(|| vec![vec![]; num_categories]);
            for (values, score) in scores.iter_mut().zip(&obs.scores) {
                values.extend(*score);
            }
        }

        let rows = buckets
            .into_iter()
            .map(|(decade, scores)| {
                let stats = scores
                    .into_iter()
                    .map(DescriptiveStats::new)
                    .collect::<Vec<_>>();
                let means = stats.iter().map(|s| s.as_ref().map(|s| s.mean)).collect();
                let counts = stats.iter().map(|s| s.as_ref().map_or(0, |s| s.count)).collect();
                DecadeRow {
                    decade,
                    means,
                    counts,
                }
            })
            .collect();

        Self {
            categories: corpus.categories().to_vec(),
            rows,
            rows_aggregated,
            rows_dropped,
        }
    }

    #[must_use]
    pub fn category_index(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == category)
    }

    /// Decades and means of the category at `index`, skipping decades
    /// without a mean for it.
    #[must_use]
    pub fn series(&self, index: usize) -> DecadeSeries {
        let (decades, means) = self
            .rows
            .iter()
            .filter_map(|row| row.means[index].map(|mean| (f64::from(row.decade), mean)))
            .unzip();
        DecadeSeries { decades, means }
    }
}
