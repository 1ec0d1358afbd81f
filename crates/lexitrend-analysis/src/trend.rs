//! Linear trends of decade means
//!
//! Every category's decade means are regressed on the decade by ordinary
//! least squares. The result carries the slope inference for an APA-style
//! table, and the decade means with the fitted line and its confidence band
//! for charting.

use lexitrend_stats::regression::{
    LinearFit, MeanPrediction, RegressionError, SlopeInference, format_p_value,
};
use serde::Serialize;

use crate::decade::DecadeMeans;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("category '{category}': {source}")]
pub struct TrendError {
    pub category: String,
    pub source: RegressionError,
}

/// Fitted decade trend of one category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTrend {
    pub category: String,
    /// Decades with a mean for this category.
    pub decades: Vec<f64>,
    pub means: Vec<f64>,
    pub fit: LinearFit,
    pub slope: SlopeInference,
    /// Fitted means and confidence band at each decade.
    pub band: Vec<MeanPrediction>,
}

/// One line of the APA regression table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApaRow {
    pub dv: String,
    pub b: String,
    pub se: String,
    pub ci: String,
    pub t: String,
    pub p: String,
    pub r_squared: String,
    pub f: String,
    pub df: String,
}

/// Headers of [`ApaRow::cells`].
pub const APA_HEADERS: [&str; 9] = ["DV", "b", "SE", "95% CI", "t", "p", "R²", "F", "df"];

impl CategoryTrend {
    /// Fits the category at `index` of `means` at the given confidence level.
    pub fn fit(means: &DecadeMeans, index: usize, level: f64) -> Result<Self, TrendError> {
        let category = means.categories[index].clone();
        let series = means.series(index);
        let fit = match LinearFit::fit(&series.decades, &series.means) {
            Ok(fit) => fit,
            Err(source) => return Err(TrendError { category, source }),
        };
        let slope = fit.slope_inference(level);
        let band = fit.mean_predictions(&series.decades, level);
        Ok(Self {
            category,
            decades: series.decades,
            means: series.means,
            fit,
            slope,
            band,
        })
    }

    /// Fits every category of `means`, in category order.
    pub fn fit_all(means: &DecadeMeans, level: f64) -> Result<Vec<Self>, TrendError> {
        (0..means.categories.len())
            .map(|index| Self::fit(means, index, level))
            .collect()
    }

    #[must_use]
    pub fn apa_row(&self) -> ApaRow {
        let slope = &self.slope;
        ApaRow {
            dv: self.category.clone(),
            b: format!("{:.5}", slope.estimate),
            se: format!("{:.5}", slope.std_err),
            ci: format!("[{:.5}, {:.5}]", slope.ci_lower, slope.ci_upper),
            t: format!("{:.2}", slope.t_statistic),
            p: format_p_value(slope.p_value),
            r_squared: format!("{:.3}", self.fit.r_squared),
            f: format!("{:.2}", self.fit.f_statistic),
            df: format!("({}, {})", self.fit.df_model, self.fit.df_resid),
        }
    }

    /// `"{category} by Decade (R²={r2:.2}, p {p})"`
    #[must_use]
    pub fn chart_title(&self) -> String {
        format!(
            "{} by Decade (R²={:.2}, p {})",
            self.category,
            self.fit.r_squared,
            format_p_value(self.slope.p_value)
        )
    }
}

impl ApaRow {
    /// Cells in [`APA_HEADERS`] order.
    #[must_use]
    pub fn cells(&self) -> [&str; 9] {
        [
            &self.dv,
            &self.b,
            &self.se,
            &self.ci,
            &self.t,
            &self.p,
            &self.r_squared,
            &self.f,
            &self.df,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Corpus, Observation};

    fn corpus(rows: &[(i32, [Option<f64>; 2])]) -> Corpus {
        Corpus::new(
            vec!["Affect".to_owned(), "Cognition".to_owned()],
            rows.iter()
                .map(|(year, scores)| Observation {
                    year: Some(*year),
                    scores: scores.to_vec(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_perfect_trend() {
        let data = corpus(&[
            (1903, [Some(10.0), Some(1.0)]),
            (1907, [Some(10.0), Some(2.0)]),
            (1951, [Some(20.0), Some(4.0)]),
            (2004, [Some(30.0), Some(3.0)]),
        ]);
        let means = DecadeMeans::from_corpus(&data);
        let trend = CategoryTrend::fit(&means, 0, 0.95).unwrap();
        assert_eq!(trend.decades, [1900.0, 1950.0, 2000.0]);
        assert!((trend.fit.slope - 0.2).abs() < 1e-12);
        assert!((trend.fit.intercept + 370.0).abs() < 1e-9);

        let row = trend.apa_row();
        assert_eq!(row.b, "0.20000");
        assert_eq!(row.p, "< .001");
        assert_eq!(row.r_squared, "1.000");
        assert_eq!(row.df, "(1, 1)");
        assert_eq!(row.cells()[0], "Affect");
        assert_eq!(trend.band.len(), 3);
    }

    #[test]
    fn test_apa_row_formatting() {
        let data = corpus(&[
            (1901, [Some(2.0), Some(1.0)]),
            (1911, [Some(4.0), Some(1.0)]),
            (1921, [Some(5.0), Some(1.0)]),
            (1931, [Some(4.0), Some(1.0)]),
            (1941, [Some(5.0), Some(2.0)]),
        ]);
        let means = DecadeMeans::from_corpus(&data);
        let trend = CategoryTrend::fit(&means, 0, 0.95).unwrap();
        let row = trend.apa_row();
        // slope 0.06 per year, se 0.028284, t 2.1213, p 0.1240
        assert_eq!(row.b, "0.06000");
        assert_eq!(row.se, "0.02828");
        assert_eq!(row.t, "2.12");
        assert_eq!(row.p, "= 0.124");
        assert_eq!(row.r_squared, "0.600");
        assert_eq!(row.f, "4.50");
        assert_eq!(row.df, "(1, 3)");
        assert!(row.ci.starts_with("[-0.03"));
        assert_eq!(trend.chart_title(), "Affect by Decade (R²=0.60, p = 0.124)");
    }

    #[test]
    fn test_errors_name_category() {
        let data = corpus(&[
            (1900, [Some(1.0), Some(5.0)]),
            (1910, [Some(2.0), Some(5.0)]),
            (1920, [Some(4.0), Some(5.0)]),
            (1930, [None, Some(5.0)]),
        ]);
        let means = DecadeMeans::from_corpus(&data);
        assert!(CategoryTrend::fit(&means, 0, 0.95).is_ok());

        let err = CategoryTrend::fit_all(&means, 0.95).unwrap_err();
        assert_eq!(err.category, "Cognition");
        assert_eq!(err.source, RegressionError::ConstantOutcome);

        let short = corpus(&[(1900, [Some(1.0), Some(1.0)]), (1910, [Some(2.0), Some(2.0)])]);
        let err = CategoryTrend::fit_all(&DecadeMeans::from_corpus(&short), 0.95).unwrap_err();
        assert_eq!(err.category, "Affect");
        assert_eq!(
            err.source,
            RegressionError::InsufficientObservations { len: 2 }
        );
    }
}
