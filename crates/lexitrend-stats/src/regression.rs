//! Ordinary least squares for a single predictor with intercept
//!
//! Fits `y = intercept + slope * x` and reports the usual inferential
//! statistics for the slope, using Student's t with `n - 2` residual degrees
//! of freedom.
//!
//! # Examples
//!
//! ```
//! use lexitrend_stats::regression::LinearFit;
//!
//! let x = [1900.0, 1950.0, 2000.0];
//! let y = [10.0, 20.0, 30.0];
//! let fit = LinearFit::fit(&x, &y).unwrap();
//!
//! assert!((fit.slope - 0.2).abs() < 1e-12);
//! assert!((fit.intercept + 370.0).abs() < 1e-9);
//! assert!((fit.r_squared - 1.0).abs() < 1e-12);
//! ```

use serde::Serialize;
use statrs::distribution::{ContinuousCDF as _, StudentsT};

/// A two-parameter fit needs at least one residual degree of freedom.
pub const MIN_OBSERVATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum RegressionError {
    #[display("predictor and outcome lengths differ ({x_len} vs {y_len})")]
    LengthMismatch { x_len: usize, y_len: usize },
    #[display("{len} observation(s); at least 3 are required for a linear fit")]
    InsufficientObservations { len: usize },
    #[display("observations contain a non-finite value")]
    NonFiniteValue,
    #[display("predictor has zero variance")]
    ConstantPredictor,
    #[display("outcome has zero variance; R² is undefined")]
    ConstantOutcome,
}

/// Fitted simple linear regression.
#[derive(Debug, Clone, Serialize)]
pub struct LinearFit {
    pub n: usize,
    pub intercept: f64,
    pub slope: f64,
    pub intercept_std_err: f64,
    pub slope_std_err: f64,
    /// Residual standard error `sqrt(SSR / (n - 2))`.
    pub residual_std_err: f64,
    pub r_squared: f64,
    pub f_statistic: f64,
    /// Model degrees of freedom (always 1).
    pub df_model: usize,
    /// Residual degrees of freedom (`n - 2`).
    pub df_resid: usize,
    x_mean: f64,
    /// Sum of squared deviations of the predictor.
    sxx: f64,
    #[serde(skip)]
    t_dist: StudentsT,
}

/// Inference for the slope at a given confidence level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlopeInference {
    pub estimate: f64,
    pub std_err: f64,
    pub t_statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

/// Fitted mean at one predictor value with its confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanPrediction {
    pub x: f64,
    pub mean: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl LinearFit {
    /// Fits `y` on `x` by least squares.
    #[expect(clippy::cast_precision_loss)]
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self, RegressionError> {
        if x.len() != y.len() {
            return Err(RegressionError::LengthMismatch {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        let n = x.len();
        if n < MIN_OBSERVATIONS {
            return Err(RegressionError::InsufficientObservations { len: n });
        }
        if x.iter().chain(y).any(|v| !v.is_finite()) {
            return Err(RegressionError::NonFiniteValue);
        }

        let nf = n as f64;
        let x_mean = x.iter().sum::<f64>() / nf;
        let y_mean = y.iter().sum::<f64>() / nf;
        let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
        for (xi, yi) in x.iter().zip(y) {
            let (dx, dy) = (xi - x_mean, yi - y_mean);
            sxx += dx * dx;
            sxy += dx * dy;
            syy += dy * dy;
        }
        if sxx <= 0.0 {
            return Err(RegressionError::ConstantPredictor);
        }
        if syy <= 0.0 {
            return Err(RegressionError::ConstantOutcome);
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;
        let ssr = x
            .iter()
            .zip(y)
            .map(|(xi, yi)| (yi - (intercept + slope * xi)).powi(2))
            .sum::<f64>();
        let df_resid = n - 2;
        let t_dist = StudentsT::new(0.0, 1.0, df_resid as f64)
            .map_err(|_| RegressionError::InsufficientObservations { len: n })?;
        let sigma2 = ssr / df_resid as f64;
        let explained = syy - ssr;

        Ok(Self {
            n,
            intercept,
            slope,
            intercept_std_err: (sigma2 * (1.0 / nf + x_mean * x_mean / sxx)).sqrt(),
            slope_std_err: (sigma2 / sxx).sqrt(),
            residual_std_err: sigma2.sqrt(),
            r_squared: 1.0 - ssr / syy,
            f_statistic: explained / sigma2,
            df_model: 1,
            df_resid,
            x_mean,
            sxx,
            t_dist,
        })
    }

    /// Fitted value at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Slope estimate, t-test against zero and `level` confidence interval
    /// (e.g. `0.95`).
    ///
    /// An exact fit has zero standard error; its t statistic is infinite and
    /// its p-value zero.
    #[must_use]
    pub fn slope_inference(&self, level: f64) -> SlopeInference {
        let t_dist = &self.t_dist;
        let t_statistic = self.slope / self.slope_std_err;
        let p_value = (2.0 * t_dist.sf(t_statistic.abs())).clamp(0.0, 1.0);
        let margin = critical_value(t_dist, level) * self.slope_std_err;
        SlopeInference {
            estimate: self.slope,
            std_err: self.slope_std_err,
            t_statistic,
            p_value,
            ci_lower: self.slope - margin,
            ci_upper: self.slope + margin,
        }
    }

    /// Fitted means with a `level` confidence band at each of `xs`.
    ///
    /// The band is `ŷ ± t* s sqrt(1/n + (x - x̄)² / Sxx)`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean_predictions(&self, xs: &[f64], level: f64) -> Vec<MeanPrediction> {
        let t_star = critical_value(&self.t_dist, level);
        let n = self.n as f64;
        xs.iter()
            .map(|&x| {
                let mean = self.predict(x);
                let se = self.residual_std_err
                    * (1.0 / n + (x - self.x_mean).powi(2) / self.sxx).sqrt();
                MeanPrediction {
                    x,
                    mean,
                    ci_lower: mean - t_star * se,
                    ci_upper: mean + t_star * se,
                }
            })
            .collect()
    }
}

fn critical_value(t_dist: &StudentsT, level: f64) -> f64 {
    t_dist.inverse_cdf(0.5 + level.clamp(0.0, 1.0) / 2.0)
}

/// Formats a p-value the way APA tables print it.
///
/// ```
/// use lexitrend_stats::regression::format_p_value;
///
/// assert_eq!(format_p_value(0.0004), "< .001");
/// assert_eq!(format_p_value(0.0421), "= 0.042");
/// ```
#[must_use]
pub fn format_p_value(p: f64) -> String {
    if p < 0.001 {
        "< .001".to_owned()
    } else {
        format!("= {p:.3}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_few_observations() {
        let err = LinearFit::fit(&[1.0, 2.0], &[1.0, 3.0]).unwrap_err();
        assert_eq!(err, RegressionError::InsufficientObservations { len: 2 });
    }

    #[test]
    fn test_length_mismatch() {
        let err = LinearFit::fit(&[1.0, 2.0, 3.0], &[1.0, 3.0]).unwrap_err();
        assert!(matches!(err, RegressionError::LengthMismatch { .. }));
    }

    #[test]
    fn test_constant_outcome() {
        let err = LinearFit::fit(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]).unwrap_err();
        assert_eq!(err, RegressionError::ConstantOutcome);
    }

    #[test]
    fn test_constant_predictor() {
        let err = LinearFit::fit(&[1.0, 1.0, 1.0], &[5.0, 6.0, 7.0]).unwrap_err();
        assert_eq!(err, RegressionError::ConstantPredictor);
    }

    #[test]
    fn test_perfect_fit() {
        let fit = LinearFit::fit(&[1900.0, 1950.0, 2000.0], &[10.0, 20.0, 30.0]).unwrap();
        assert!((fit.slope - 0.2).abs() < 1e-12);
        assert!((fit.intercept + 370.0).abs() < 1e-9);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert_eq!((fit.df_model, fit.df_resid), (1, 1));
        let inference = fit.slope_inference(0.95);
        assert!(inference.p_value < 1e-12);
    }

    #[test]
    fn test_noisy_fit_matches_reference() {
        // Reference values from a standard OLS routine.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let fit = LinearFit::fit(&x, &y).unwrap();
        assert!((fit.slope - 0.6).abs() < 1e-12);
        assert!((fit.intercept - 2.2).abs() < 1e-12);
        assert!((fit.r_squared - 0.6).abs() < 1e-12);
        assert!((fit.f_statistic - 4.5).abs() < 1e-9);
        assert!((fit.slope_std_err - 0.282_842_712_5).abs() < 1e-9);

        let inference = fit.slope_inference(0.95);
        assert!((inference.t_statistic - 2.121_320_343_6).abs() < 1e-9);
        assert!((inference.p_value - 0.124_027_1).abs() < 1e-6);
        // t*(0.975, 3) = 3.182446305
        assert!((inference.ci_lower - (0.6 - 3.182_446_305 * 0.282_842_712_5)).abs() < 1e-6);
        assert!((inference.ci_upper - (0.6 + 3.182_446_305 * 0.282_842_712_5)).abs() < 1e-6);
    }

    #[test]
    fn test_mean_band_narrowest_at_centre() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let fit = LinearFit::fit(&x, &y).unwrap();
        let widths = fit
            .mean_predictions(&x, 0.95)
            .into_iter()
            .map(|p| {
                assert!(p.ci_lower <= p.mean && p.mean <= p.ci_upper);
                p.ci_upper - p.ci_lower
            })
            .collect::<Vec<_>>();
        assert!(widths[2] < widths[1] && widths[1] < widths[0]);
        assert!((widths[0] - widths[4]).abs() < 1e-12);
    }

    #[test]
    fn test_format_p_value_threshold() {
        assert_eq!(format_p_value(0.001), "= 0.001");
        assert_eq!(format_p_value(0.000_999), "< .001");
        assert_eq!(format_p_value(0.5), "= 0.500");
    }
}
