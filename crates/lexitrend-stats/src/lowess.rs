//! Locally weighted scatterplot smoothing (LOWESS)
//!
//! Each point is replaced by the value at that point of a weighted linear
//! fit over its `floor(frac * n)` nearest neighbours, with tricube distance
//! weights. Subsequent robustifying passes down-weight points with large
//! residuals using bisquare weights scaled by six times the median absolute
//! residual.
//!
//! The smoother is evaluated at the input points themselves; results are
//! returned in the input order, whatever order `x` comes in.
//!
//! # Examples
//!
//! ```
//! use lexitrend_stats::lowess::Lowess;
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
//! let y = x.map(|x| 3.0 * x - 2.0);
//! let smoothed = Lowess::new(0.5).smooth(&x, &y).unwrap();
//! for (s, y) in smoothed.iter().zip(y) {
//!     assert!((s - y).abs() < 1e-9);
//! }
//! ```

use crate::percentiles::compute_percentile;

/// Robustifying passes after the initial fit.
pub const ROBUSTNESS_ITERATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum LowessError {
    #[display("x and y lengths differ ({x_len} vs {y_len})")]
    LengthMismatch { x_len: usize, y_len: usize },
    #[display("bandwidth fraction {frac} is outside (0, 1]")]
    InvalidFraction { frac: f64 },
    #[display("input contains a non-finite value")]
    NonFiniteValue,
}

/// LOWESS smoother configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lowess {
    /// Fraction of the data used for each local fit.
    pub frac: f64,
}

impl Lowess {
    #[must_use]
    pub fn new(frac: f64) -> Self {
        Self { frac }
    }

    /// Smooths `y` against `x`, returning fitted values in input order.
    pub fn smooth(&self, x: &[f64], y: &[f64]) -> Result<Vec<f64>, LowessError> {
        if x.len() != y.len() {
            return Err(LowessError::LengthMismatch {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        if !(self.frac > 0.0 && self.frac <= 1.0) {
            return Err(LowessError::InvalidFraction { frac: self.frac });
        }
        if x.iter().chain(y).any(|v| !v.is_finite()) {
            return Err(LowessError::NonFiniteValue);
        }

        let n = x.len();
        if n < 2 {
            return Ok(y.to_vec());
        }

        let mut order = (0..n).collect::<Vec<_>>();
        order.sort_by(|&a, &b| x[a].total_cmp(&x[b]));
        let xs = order.iter().map(|&i| x[i]).collect::<Vec<_>>();
        let ys = order.iter().map(|&i| y[i]).collect::<Vec<_>>();

        let k = self.neighbourhood_size(n);
        let mut robustness = vec![1.0; n];
        let mut fitted = local_fits(&xs, &ys, k, &robustness);
        for _ in 0..ROBUSTNESS_ITERATIONS {
            robustness = residual_weights(&ys, &fitted);
            fitted = local_fits(&xs, &ys, k, &robustness);
        }

        let mut smoothed = vec![0.0; n];
        for (sorted_pos, &original) in order.iter().enumerate() {
            smoothed[original] = fitted[sorted_pos];
        }
        Ok(smoothed)
    }

    #[expect(
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss
    )]
    fn neighbourhood_size(&self, n: usize) -> usize {
        let k = (self.frac * n as f64 + 1e-10).floor() as usize;
        k.clamp(2, n)
    }
}

/// One weighted local linear fit per point of the sorted `xs`.
fn local_fits(xs: &[f64], ys: &[f64], k: usize, robustness: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut left = 0;
    let mut right = k;
    let mut weights = Vec::with_capacity(k);
    (0..n)
        .map(|i| {
            let xi = xs[i];
            // slide the window while it gets closer to xi
            while right < n && xi - xs[left] > xs[right] - xi {
                left += 1;
                right += 1;
            }
            let radius = (xi - xs[left]).max(xs[right - 1] - xi);

            weights.clear();
            weights.extend((left..right).map(|j| {
                let distance = if radius > 0.0 {
                    (xs[j] - xi).abs() / radius
                } else {
                    0.0
                };
                tricube(distance) * robustness[j]
            }));
            weighted_linear_value(&xs[left..right], &ys[left..right], &weights, xi)
                .unwrap_or(ys[i])
        })
        .collect()
}

/// Value at `at` of the weighted least-squares line through the points.
///
/// Falls back to the weighted mean when the weighted predictor variance
/// vanishes, and to `None` when all weights are zero.
fn weighted_linear_value(xs: &[f64], ys: &[f64], weights: &[f64], at: f64) -> Option<f64> {
    let total = weights.iter().sum::<f64>();
    if total <= 1e-12 {
        return None;
    }
    let x_mean = xs.iter().zip(weights).map(|(x, w)| x * w).sum::<f64>() / total;
    let y_mean = ys.iter().zip(weights).map(|(y, w)| y * w).sum::<f64>() / total;
    let (sxx, sxy) = xs
        .iter()
        .zip(ys)
        .zip(weights)
        .fold((0.0, 0.0), |(sxx, sxy), ((x, y), w)| {
            let dx = x - x_mean;
            (sxx + w * dx * dx, sxy + w * dx * (y - y_mean))
        });
    if sxx / total <= 1e-12 * (1.0 + x_mean * x_mean) {
        return Some(y_mean);
    }
    Some(y_mean + sxy / sxx * (at - x_mean))
}

fn residual_weights(ys: &[f64], fitted: &[f64]) -> Vec<f64> {
    let mut scaled = ys
        .iter()
        .zip(fitted)
        .map(|(y, f)| (y - f).abs())
        .collect::<Vec<_>>();
    let mut sorted = scaled.clone();
    sorted.sort_by(f64::total_cmp);
    let median = compute_percentile(&sorted, 50.0);
    // residuals at rounding-error level count as exact fits
    let tolerance = 1e-12 * ys.iter().fold(1.0_f64, |m, y| m.max(y.abs()));

    for r in &mut scaled {
        if median <= tolerance {
            *r = if *r > tolerance { 1.0 } else { 0.0 };
        } else {
            *r /= 6.0 * median;
        }
    }
    scaled.into_iter().map(|r| bisquare(r.min(1.0))).collect()
}

fn tricube(d: f64) -> f64 {
    if d >= 1.0 {
        0.0
    } else {
        (1.0 - d.powi(3)).powi(3)
    }
}

fn bisquare(u: f64) -> f64 {
    if u >= 1.0 { 0.0 } else { (1.0 - u * u).powi(2) }
}
