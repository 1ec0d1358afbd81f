//! Min-max normalized and LOWESS-smoothed decade trends
//!
//! Each category's decade means are rescaled to 0-100 independently, so that
//! categories with very different absolute frequencies share one chart. The
//! normalized series is then smoothed with LOWESS at the decades themselves.
//!
//! # Example
//!
//! ```
//! use lexitrend_analysis::normalization::min_max_normalize;
//!
//! assert_eq!(min_max_normalize(&[10.0, 20.0, 30.0]), [0.0, 50.0, 100.0]);
//! assert_eq!(min_max_normalize(&[5.0, 5.0, 5.0]), [50.0, 50.0, 50.0]);
//! ```

use lexitrend_stats::{
    descriptive::DescriptiveStats,
    lowess::{Lowess, LowessError},
};
use serde::Serialize;

use crate::decade::DecadeMeans;

/// Value assigned to every point of a series without spread.
pub const DEGENERATE_MIDPOINT: f64 = 50.0;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("category '{category}': failed to smooth trend")]
pub struct SmoothTrendError {
    pub category: String,
    pub source: LowessError,
}

/// Rescales `values` linearly so that the minimum maps to 0 and the maximum
/// to 100.
///
/// A series whose maximum equals its minimum (including a single value) maps
/// to [`DEGENERATE_MIDPOINT`] everywhere. An empty series stays empty.
#[must_use]
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let Some(stats) = DescriptiveStats::new(values.iter().copied()) else {
        return vec![];
    };
    let range = stats.max - stats.min;
    if range == 0.0 {
        return vec![DEGENERATE_MIDPOINT; values.len()];
    }
    values
        .iter()
        .map(|v| (v - stats.min) / range * 100.0)
        .collect()
}

/// Normalized and smoothed trend of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSeries {
    pub category: String,
    /// Decades with a mean for this category, ascending.
    pub decades: Vec<f64>,
    /// Min-max normalized decade means, 0-100.
    pub normalized: Vec<f64>,
    /// LOWESS fit of `normalized` at `decades`.
    pub smoothed: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NormalizedTrends {
    pub lowess_frac: f64,
    pub series: Vec<NormalizedSeries>,
}

impl NormalizedTrends {
    /// Normalizes and smooths every category of `means`, in category order.
    ///
    /// A category without any decade mean yields empty vectors.
    pub fn from_decade_means(
        means: &DecadeMeans,
        lowess_frac: f64,
    ) -> Result<Self, SmoothTrendError> {
        let lowess = Lowess::new(lowess_frac);
        let series = means
            .categories
            .iter()
            .enumerate()
            .map(|(index, category)| {
                let series = means.series(index);
                let normalized = min_max_normalize(&series.means);
                let smoothed = lowess
                    .smooth(&series.decades, &normalized)
                    .map_err(|source| SmoothTrendError {
                        category: category.clone(),
                        source,
                    })?;
                Ok(NormalizedSeries {
                    category: category.clone(),
                    decades: series.decades,
                    normalized,
                    smoothed,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            lowess_frac,
            series,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Corpus, Observation};

    #[test]
    fn test_normalization_bounds() {
        let values = [3.2, 1.5, 4.8, 2.2, 4.8, 1.5];
        let normalized = min_max_normalize(&values);
        assert_eq!(normalized.len(), values.len());
        assert!(normalized.iter().all(|v| (0.0..=100.0).contains(v)));
        assert_eq!(normalized[1], 0.0);
        assert_eq!(normalized[2], 100.0);
        assert!((normalized[0] - (3.2 - 1.5) / 3.3 * 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_series() {
        assert!(min_max_normalize(&[]).is_empty());
        assert_eq!(min_max_normalize(&[7.5]), [DEGENERATE_MIDPOINT]);
        assert_eq!(min_max_normalize(&[5.0, 5.0, 5.0]), [50.0, 50.0, 50.0]);
    }

    #[test]
    fn test_trends_from_decade_means() {
        let observations = (0..12)
            .map(|i| Observation {
                year: Some(1800 + 10 * i + 3),
                scores: vec![Some(f64::from(i)), Some(4.0), None],
            })
            .collect();
        let corpus = Corpus::new(
            vec!["Affect".to_owned(), "Cognition".to_owned(), "Perception".to_owned()],
            observations,
        );
        let means = DecadeMeans::from_corpus(&corpus);
        let trends = NormalizedTrends::from_decade_means(&means, 0.25).unwrap();
        assert_eq!(trends.series.len(), 3);

        let affect = &trends.series[0];
        assert_eq!(affect.decades.first(), Some(&1800.0));
        assert_eq!(affect.decades.last(), Some(&1910.0));
        assert_eq!(affect.normalized.first(), Some(&0.0));
        assert_eq!(affect.normalized.last(), Some(&100.0));
        // a linear trend is reproduced by local linear fits
        for (s, n) in affect.smoothed.iter().zip(&affect.normalized) {
            assert!((s - n).abs() < 1e-6);
        }

        let cognition = &trends.series[1];
        assert!(cognition.smoothed.iter().all(|v| (v - 50.0).abs() < 1e-9));

        let perception = &trends.series[2];
        assert!(perception.decades.is_empty() && perception.smoothed.is_empty());
    }

    #[test]
    fn test_invalid_fraction_names_category() {
        let corpus = Corpus::new(
            vec!["Affect".to_owned()],
            vec![Observation {
                year: Some(1900),
                scores: vec![Some(1.0)],
            }],
        );
        let means = DecadeMeans::from_corpus(&corpus);
        let err = NormalizedTrends::from_decade_means(&means, 0.0).unwrap_err();
        assert_eq!(err.category, "Affect");
        assert!(matches!(err.source, LowessError::InvalidFraction { .. }));
    }
}
