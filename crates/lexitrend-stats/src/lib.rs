//! Statistical kernels for the lexitrend analyses.
//!
//! This crate provides the numerical building blocks, independent of any
//! corpus or file format:
//!
//! - **Descriptive statistics**: count, extremes and mean
//! - **Percentiles**: linear-interpolation percentiles and quartiles
//! - **Rank-sum test**: two-sided Mann-Whitney U with exact and asymptotic p-values
//! - **Regression**: simple ordinary least squares with slope inference and
//!   mean confidence bands
//! - **LOWESS**: robust locally weighted scatterplot smoothing
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Percentile computation and quartile summaries
//! - [`rank_sum`]: Mann-Whitney U test
//! - [`regression`]: Ordinary least squares with one predictor
//! - [`lowess`]: Locally weighted scatterplot smoothing
//!
//! # Examples
//!
//! ## Comparing two samples
//!
//! ```
//! use lexitrend_stats::rank_sum::{RankSumTest, z_from_u};
//!
//! let first = [2.1, 3.4, 1.9, 5.6, 4.4, 3.8, 2.7, 4.9, 3.1, 2.2];
//! let second = [4.0, 5.2, 6.1, 5.9, 4.8, 7.2, 6.6, 5.5, 6.3, 5.0];
//! let test = RankSumTest::two_sided(&first, &second).unwrap();
//! let z = z_from_u(test.u, test.n1, test.n2);
//! assert!(z < 0.0);
//! assert!(test.p_value < 0.05);
//! ```
//!
//! ## Fitting a trend
//!
//! ```
//! use lexitrend_stats::regression::{LinearFit, format_p_value};
//!
//! let decades = [1900.0, 1910.0, 1920.0, 1930.0];
//! let means = [3.1, 3.4, 3.3, 3.9];
//! let fit = LinearFit::fit(&decades, &means).unwrap();
//! let slope = fit.slope_inference(0.95);
//! println!("b = {:.5}, p {}", slope.estimate, format_p_value(slope.p_value));
//! ```

pub mod descriptive;
pub mod lowess;
pub mod percentiles;
pub mod rank_sum;
pub mod regression;
