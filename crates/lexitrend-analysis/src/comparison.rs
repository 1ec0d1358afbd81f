//! Group comparison of category scores between two corpora
//!
//! For each category, both groups are summarized by median and IQR and
//! compared with a two-sided Mann-Whitney U test. The report adds an
//! analytic z approximation of `U`, the effect size `r = z / sqrt(n1 + n2)`
//! and a Bonferroni-adjusted p-value.
//!
//! The z value is derived from `U` alone, without tie or continuity
//! correction, so it can disagree with the p-value of the test (which may be
//! exact for small samples). Both are reported as computed.
//!
//! `n1` and `n2` in z and r are the row counts of the two corpora, while the
//! test itself runs on the non-missing scores of each category. A category
//! with missing scores therefore gets a z centred on the full-table mean.
//!
//! # Example
//!
//! ```
//! use lexitrend_analysis::{
//!     comparison::GroupComparison,
//!     corpus::{Corpus, Observation},
//! };
//!
//! let categories = vec!["Affect".to_owned()];
//! let group = |scores: &[f64]| {
//!     let rows = scores
//!         .iter()
//!         .map(|&s| Observation { year: None, scores: vec![Some(s)] })
//!         .collect();
//!     Corpus::new(categories.clone(), rows)
//! };
//! let fiction = group(&[5.0, 6.0, 7.0, 8.0, 9.0]);
//! let nonfiction = group(&[1.0, 2.0, 3.0, 4.0, 5.5]);
//!
//! let report = GroupComparison::run(&fiction, &nonfiction, &categories).unwrap();
//! let affect = &report.categories[0];
//! assert_eq!(affect.first.median, 7.0);
//! assert!(affect.p_bonferroni >= affect.test.p_value);
//! ```

use lexitrend_stats::{
    percentiles::Quartiles,
    rank_sum::{RankSumError, RankSumTest, z_from_u},
};
use serde::Serialize;

use crate::corpus::Corpus;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ComparisonError {
    #[display("category '{category}' is not a column of the {group} corpus")]
    UnknownCategory {
        category: String,
        group: GroupName,
    },
    #[display("category '{category}': {source}")]
    Test {
        category: String,
        source: RankSumError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum GroupName {
    #[display("first")]
    First,
    #[display("second")]
    Second,
}

/// Median and interquartile range of one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupSummary {
    pub n: usize,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
}

impl GroupSummary {
    /// Summarizes `values`; every statistic is NaN when `values` is empty.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        let quartiles = Quartiles::new(values.iter().copied()).unwrap_or(Quartiles {
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
        });
        Self {
            n: values.len(),
            median: quartiles.median,
            q1: quartiles.q1,
            q3: quartiles.q3,
            iqr: quartiles.iqr(),
        }
    }

    /// `"{median:.2} ({iqr:.2})"`
    #[must_use]
    pub fn median_iqr(&self) -> String {
        format!("{:.2} ({:.2})", self.median, self.iqr)
    }
}

/// Comparison of one category between the two groups.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryComparison {
    pub category: String,
    pub first: GroupSummary,
    pub second: GroupSummary,
    pub test: RankSumTest,
    /// Normal approximation of `U` without tie or continuity correction,
    /// with `n1`, `n2` the corpus row counts.
    pub z: f64,
    /// Effect size `z / sqrt(n1 + n2)` over the corpus row counts.
    pub r: f64,
    /// `min(p * number of categories, 1)`.
    pub p_bonferroni: f64,
}

/// Rounded, display-ready values of a [`CategoryComparison`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub category: String,
    pub first_median_iqr: String,
    pub second_median_iqr: String,
    pub u: u64,
    pub z: f64,
    pub p: f64,
    pub r: f64,
    pub p_bonferroni: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupComparison {
    pub categories: Vec<CategoryComparison>,
}

impl GroupComparison {
    /// Compares every category in `categories` between the two corpora.
    ///
    /// Missing scores are dropped per group and category. The Bonferroni
    /// factor is the number of categories tested. Fails on the first category
    /// that is absent from either corpus or has fewer than two scores in
    /// either group.
    pub fn run<S>(
        first: &Corpus,
        second: &Corpus,
        categories: &[S],
    ) -> Result<Self, ComparisonError>
    where
        S: AsRef<str>,
    {
        let num_tests = categories.len();
        let categories = categories
            .iter()
            .map(|category| compare_category(first, second, category.as_ref(), num_tests))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { categories })
    }

    #[must_use]
    pub fn rows(&self) -> Vec<ComparisonRow> {
        self.categories
            .iter()
            .map(CategoryComparison::to_row)
            .collect()
    }
}

impl CategoryComparison {
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn to_row(&self) -> ComparisonRow {
        ComparisonRow {
            category: self.category.clone(),
            first_median_iqr: self.first.median_iqr(),
            second_median_iqr: self.second.median_iqr(),
            u: self.test.u.trunc() as u64,
            z: round2(self.z),
            p: self.test.p_value,
            r: round2(self.r),
            p_bonferroni: self.p_bonferroni,
        }
    }
}

/// Bonferroni adjustment: `min(p * num_tests, 1)`.
///
/// ```
/// use lexitrend_analysis::comparison::bonferroni;
///
/// assert_eq!(bonferroni(0.01, 3), 0.03);
/// assert_eq!(bonferroni(0.6, 3), 1.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn bonferroni(p_value: f64, num_tests: usize) -> f64 {
    (p_value * num_tests as f64).min(1.0)
}

/// Effect size `r = z / sqrt(n1 + n2)`.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn effect_size(z: f64, n1: usize, n2: usize) -> f64 {
    z / ((n1 + n2) as f64).sqrt()
}

fn compare_category(
    first: &Corpus,
    second: &Corpus,
    category: &str,
    num_tests: usize,
) -> Result<CategoryComparison, ComparisonError> {
    let values_of = |corpus: &Corpus, group| -> Result<Vec<f64>, ComparisonError> {
        let index = corpus
            .category_index(category)
            .ok_or_else(|| ComparisonError::UnknownCategory {
                category: category.to_owned(),
                group,
            })?;
        Ok(corpus.scores(index).collect::<Vec<_>>())
    };
    let first_values = values_of(first, GroupName::First)?;
    let second_values = values_of(second, GroupName::Second)?;

    let test = RankSumTest::two_sided(&first_values, &second_values).map_err(|source| {
        ComparisonError::Test {
            category: category.to_owned(),
            source,
        }
    })?;
    let (n1, n2) = (first.len(), second.len());
    let z = z_from_u(test.u, n1, n2);
    Ok(CategoryComparison {
        category: category.to_owned(),
        first: GroupSummary::from_values(&first_values),
        second: GroupSummary::from_values(&second_values),
        z,
        r: effect_size(z, n1, n2),
        p_bonferroni: bonferroni(test.p_value, num_tests),
        test,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Column headers of [`ComparisonRow`] for the given group labels.
#[must_use]
pub fn row_headers(first_label: &str, second_label: &str) -> [String; 8] {
    [
        "Category".to_owned(),
        format!("{first_label} Median (IQR)"),
        format!("{second_label} Median (IQR)"),
        "U".to_owned(),
        "z".to_owned(),
        "p".to_owned(),
        "r".to_owned(),
        "p (Bonf.)".to_owned(),
    ]
}

impl ComparisonRow {
    /// Cells in [`row_headers`] order.
    #[must_use]
    pub fn cells(&self) -> [String; 8] {
        [
            self.category.clone(),
            self.first_median_iqr.clone(),
            self.second_median_iqr.clone(),
            self.u.to_string(),
            format!("{:.2}", self.z),
            format_p(self.p),
            format!("{:.2}", self.r),
            format_p(self.p_bonferroni),
        ]
    }
}

fn format_p(p: f64) -> String {
    if p != 0.0 && p < 1e-4 {
        format!("{p:.3e}")
    } else {
        format!("{p:.4}")
    }
}

#[cfg(test)]
mod tests {
    use lexitrend_stats::rank_sum::PValueMethod;

    use super::*;
    use crate::corpus::Observation;

    fn corpus(columns: &[(&str, &[Option<f64>])]) -> Corpus {
        let categories = columns.iter().map(|(c, _)| (*c).to_owned()).collect();
        let len = columns.first().map_or(0, |(_, v)| v.len());
        let rows = (0..len)
            .map(|i| Observation {
                year: None,
                scores: columns.iter().map(|(_, v)| v[i]).collect(),
            })
            .collect();
        Corpus::new(categories, rows)
    }

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_bonferroni_invariants() {
        for p in [0.0, 1e-6, 0.01, 0.2, 0.34, 0.5, 1.0] {
            let adjusted = bonferroni(p, 3);
            assert!(adjusted >= p);
            assert!(adjusted <= 1.0);
            assert_eq!(adjusted, (p * 3.0).min(1.0));
        }
    }

    #[test]
    fn test_effect_size() {
        let z = z_from_u(1500.0, 50, 50);
        assert!((z - 1.72).abs() < 0.005);
        assert!((effect_size(z, 50, 50) - 0.172).abs() < 0.001);
    }

    #[test]
    fn test_compare_drops_missing_per_group() {
        let first_affect = [Some(5.0), None, Some(6.0), Some(7.0), Some(8.0)];
        let first_cog = some(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let second_affect = some(&[1.0, 2.0, 3.0, 4.0]);
        let second_cog = [None, Some(2.5), Some(3.5), None];
        let first = corpus(&[("Affect", &first_affect), ("Cognition", &first_cog)]);
        let second = corpus(&[("Affect", &second_affect), ("Cognition", &second_cog)]);

        let report = GroupComparison::run(&first, &second, &["Affect", "Cognition"]).unwrap();
        let affect = &report.categories[0];
        assert_eq!(affect.first.n, 4);
        assert_eq!(affect.second.n, 4);
        assert_eq!(affect.first.median, 6.5);
        assert_eq!(affect.test.u, 16.0);
        assert_eq!(affect.test.method, PValueMethod::Exact);
        assert!((affect.test.p_value - 2.0 / 70.0).abs() < 1e-12);
        assert!((affect.p_bonferroni - 2.0 * 2.0 / 70.0).abs() < 1e-12);

        let cognition = &report.categories[1];
        assert_eq!(cognition.second.n, 2);
        assert_eq!(cognition.second.iqr, 0.5);
    }

    #[test]
    fn test_z_and_r_use_row_counts() {
        let mut first_values = vec![None; 5];
        first_values.extend(some(&[11.0, 12.0, 13.0, 14.0, 15.0]));
        let second_values = some(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        let first = corpus(&[("Affect", &first_values)]);
        let second = corpus(&[("Affect", &second_values)]);

        let report = GroupComparison::run(&first, &second, &["Affect"]).unwrap();
        let affect = &report.categories[0];
        assert_eq!((affect.test.n1, affect.test.n2), (5, 10));
        assert_eq!(affect.first.n, 5);
        assert_eq!(affect.test.u, 50.0);
        // mean U over 10 x 10 rows is 50
        assert_eq!(affect.z, z_from_u(50.0, 10, 10));
        assert!(affect.z.abs() < 1e-12);
        assert!(affect.r.abs() < 1e-12);
        assert!(affect.test.p_value < 0.01);
    }

    #[test]
    fn test_insufficient_sample_names_category() {
        let first = corpus(&[("Affect", &some(&[1.0, 2.0, 3.0]))]);
        let second = corpus(&[("Affect", &[Some(1.0), None, None])]);
        let err = GroupComparison::run(&first, &second, &["Affect"]).unwrap_err();
        assert!(matches!(
            &err,
            ComparisonError::Test {
                category,
                source: RankSumError::InsufficientSample { len: 1, .. },
            } if category == "Affect"
        ));
        assert!(err.to_string().starts_with("category 'Affect'"));
    }

    #[test]
    fn test_unknown_category() {
        let first = corpus(&[("Affect", &some(&[1.0, 2.0]))]);
        let second = corpus(&[("Cognition", &some(&[1.0, 2.0]))]);
        let err = GroupComparison::run(&first, &second, &["Affect"]).unwrap_err();
        assert!(matches!(
            err,
            ComparisonError::UnknownCategory {
                group: GroupName::Second,
                ..
            }
        ));
    }

    #[test]
    fn test_row_formatting() {
        let first_values = some(&[5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0]);
        let second_values = some(&[1.0, 2.0, 3.0, 4.0, 5.5, 6.5, 7.5, 8.5, 9.5, 10.5]);
        let first = corpus(&[("Affect", &first_values)]);
        let second = corpus(&[("Affect", &second_values)]);
        let report = GroupComparison::run(&first, &second, &["Affect"]).unwrap();
        let row = &report.rows()[0];
        assert_eq!(row.first_median_iqr, "9.50 (4.50)");
        assert_eq!(row.second_median_iqr, "6.00 (5.00)");
        assert_eq!(row.u, report.categories[0].test.u.trunc() as u64);
        assert_eq!(row.z, (report.categories[0].z * 100.0).round() / 100.0);

        let headers = row_headers("Fiction", "Non-fiction");
        assert_eq!(headers[1], "Fiction Median (IQR)");
        assert_eq!(row.cells().len(), headers.len());
    }
}
