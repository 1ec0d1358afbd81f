//! Mann-Whitney U (Wilcoxon rank-sum) test for two independent samples
//!
//! The test ranks the pooled samples (mid-ranks for ties) and compares the
//! rank sum of the first sample against its null distribution.
//!
//! # P-value method
//!
//! - **Exact**: used when either sample has at most
//!   [`EXACT_MAX_SAMPLE_SIZE`] values and there are no ties. The null
//!   distribution of `U` is enumerated from the Gaussian binomial
//!   coefficient `[n1 + n2 choose n1]`.
//! - **Asymptotic**: normal approximation with tie-corrected variance and a
//!   0.5 continuity correction, used otherwise.
//!
//! Both are two-sided: the p-value is twice the upper tail at
//! `max(U1, U2)`, clipped to 1.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF as _, Normal};

/// Minimum number of values each sample needs.
pub const MIN_SAMPLE_SIZE: usize = 2;

/// Samples up to this size (without ties) use the exact null distribution.
pub const EXACT_MAX_SAMPLE_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Sample {
    #[display("first")]
    First,
    #[display("second")]
    Second,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum RankSumError {
    #[display("{sample} sample has {len} value(s); at least 2 are required")]
    InsufficientSample { sample: Sample, len: usize },
    #[display("{sample} sample contains a non-finite value")]
    NonFiniteValue { sample: Sample },
}

/// How the p-value of a [`RankSumTest`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum PValueMethod {
    #[display("exact")]
    Exact,
    #[display("asymptotic")]
    Asymptotic,
}

/// Result of a two-sided Mann-Whitney U test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankSumTest {
    /// `U` statistic of the first sample, `R1 - n1 (n1 + 1) / 2`.
    pub u: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    pub method: PValueMethod,
    pub n1: usize,
    pub n2: usize,
}

impl RankSumTest {
    /// Runs the two-sided test of `first` against `second`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexitrend_stats::rank_sum::{PValueMethod, RankSumTest};
    ///
    /// let first = [1.0, 2.0, 3.0, 4.0];
    /// let second = [5.0, 6.0, 7.0, 8.0];
    /// let test = RankSumTest::two_sided(&first, &second).unwrap();
    /// assert_eq!(test.u, 0.0);
    /// assert_eq!(test.method, PValueMethod::Exact);
    /// // 2 of the 70 equally likely rank assignments are at least this extreme
    /// assert!((test.p_value - 2.0 / 70.0).abs() < 1e-12);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn two_sided(first: &[f64], second: &[f64]) -> Result<Self, RankSumError> {
        check_sample(first, Sample::First)?;
        check_sample(second, Sample::Second)?;

        let n1 = first.len();
        let n2 = second.len();
        let ranked = RankedSamples::new(first, second);

        let n1f = n1 as f64;
        let u1 = ranked.first_rank_sum - n1f * (n1f + 1.0) / 2.0;
        let u2 = n1f * n2 as f64 - u1;
        let u_max = u1.max(u2);

        let method = if n1.min(n2) <= EXACT_MAX_SAMPLE_SIZE && !ranked.has_ties() {
            PValueMethod::Exact
        } else {
            PValueMethod::Asymptotic
        };
        let p_value = match method {
            PValueMethod::Exact => exact_upper_tail(u_max, n1, n2) * 2.0,
            PValueMethod::Asymptotic => asymptotic_upper_tail(u_max, n1, n2, ranked.tie_term) * 2.0,
        };

        Ok(Self {
            u: u1,
            p_value: p_value.clamp(0.0, 1.0),
            method,
            n1,
            n2,
        })
    }
}

/// Normal approximation of `U` without tie or continuity correction.
///
/// Uses `mean = n1 n2 / 2` and `sd = sqrt(n1 n2 (n1 + n2 + 1) / 12)`. This is
/// independent of the method behind [`RankSumTest::p_value`], so for small or
/// heavily tied samples the two need not agree.
///
/// ```
/// use lexitrend_stats::rank_sum::z_from_u;
///
/// // sd = sqrt(50 * 50 * 101 / 12) = 145.057
/// let z = z_from_u(1500.0, 50, 50);
/// assert!((z - 1.7235).abs() < 1e-4);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn z_from_u(u: f64, n1: usize, n2: usize) -> f64 {
    let (n1, n2) = (n1 as f64, n2 as f64);
    let mean = n1 * n2 / 2.0;
    let std_dev = (n1 * n2 * (n1 + n2 + 1.0) / 12.0).sqrt();
    (u - mean) / std_dev
}

fn check_sample(values: &[f64], sample: Sample) -> Result<(), RankSumError> {
    if values.len() < MIN_SAMPLE_SIZE {
        return Err(RankSumError::InsufficientSample {
            sample,
            len: values.len(),
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(RankSumError::NonFiniteValue { sample });
    }
    Ok(())
}

#[derive(Debug)]
struct RankedSamples {
    first_rank_sum: f64,
    /// `sum(t^3 - t)` over groups of tied values.
    tie_term: f64,
}

impl RankedSamples {
    #[expect(clippy::cast_precision_loss)]
    fn new(first: &[f64], second: &[f64]) -> Self {
        let mut pooled = first
            .iter()
            .map(|&v| (v, true))
            .chain(second.iter().map(|&v| (v, false)))
            .collect::<Vec<_>>();
        pooled.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut first_rank_sum = 0.0;
        let mut tie_term = 0.0;
        let mut i = 0;
        while i < pooled.len() {
            let mut j = i;
            while j < pooled.len() && pooled[j].0 == pooled[i].0 {
                j += 1;
            }
            // 1-based ranks i+1..=j share their average
            let mid_rank = (i + 1 + j) as f64 / 2.0;
            let in_first = pooled[i..j].iter().filter(|(_, first)| *first).count();
            first_rank_sum += mid_rank * in_first as f64;

            let t = (j - i) as f64;
            tie_term += t * t * t - t;
            i = j;
        }

        Self {
            first_rank_sum,
            tie_term,
        }
    }

    fn has_ties(&self) -> bool {
        self.tie_term > 0.0
    }
}

#[expect(clippy::cast_precision_loss)]
fn asymptotic_upper_tail(u: f64, n1: usize, n2: usize, tie_term: f64) -> f64 {
    let n = (n1 + n2) as f64;
    let (n1, n2) = (n1 as f64, n2 as f64);
    let mean = n1 * n2 / 2.0;
    let variance = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if variance <= 0.0 {
        // every value tied: no evidence either way
        return 0.5;
    }
    let z = (u - mean - 0.5) / variance.sqrt();
    Normal::standard().sf(z)
}

/// `P(U >= u)` under the null hypothesis, without ties.
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
fn exact_upper_tail(u: f64, n1: usize, n2: usize) -> f64 {
    let counts = u_frequencies(n1.min(n2), n1.max(n2));
    let total = counts.iter().sum::<f64>();
    let start = (u.ceil().max(0.0) as usize).min(counts.len());
    counts[start..].iter().sum::<f64>() / total
}

/// Number of rank assignments giving each value of `U`, for `U = 0..=m n`.
///
/// These are the coefficients of the Gaussian binomial
/// `prod_{i=1..m} (1 - q^(n+i)) / (1 - q^i)`, built one factor at a time.
/// After each pair of steps the polynomial is `[n + i choose i]_q`.
fn u_frequencies(m: usize, n: usize) -> Vec<f64> {
    let mut coefficients = vec![0.0; m * n + 1];
    coefficients[0] = 1.0;
    let mut degree = 0;
    for i in 1..=m {
        // multiply by (1 - q^(n+i))
        let shift = n + i;
        degree += n;
        for k in (shift..=degree + i).rev() {
            if k < coefficients.len() {
                coefficients[k] -= coefficients[k - shift];
            }
        }
        // divide by (1 - q^i)
        for k in i..=degree {
            coefficients[k] += coefficients[k - i];
        }
        // the quotient has degree i n; clear what is left of the product
        for c in coefficients.iter_mut().skip(degree + 1) {
            *c = 0.0;
        }
    }
    coefficients
}

#[cfg(test)]
mod tests {
    use rand::Rng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn binomial(n: usize, k: usize) -> f64 {
        (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
    }

    #[test]
    fn test_insufficient_sample() {
        let err = RankSumTest::two_sided(&[1.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(
            err,
            RankSumError::InsufficientSample {
                sample: Sample::First,
                len: 1
            }
        );
        let err = RankSumTest::two_sided(&[1.0, 2.0], &[]).unwrap_err();
        assert!(matches!(
            err,
            RankSumError::InsufficientSample {
                sample: Sample::Second,
                len: 0
            }
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = RankSumTest::two_sided(&[1.0, f64::NAN], &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            RankSumError::NonFiniteValue {
                sample: Sample::First
            }
        );
    }

    #[test]
    fn test_u_frequencies_sum_to_binomial() {
        for (m, n) in [(1, 1), (2, 3), (3, 3), (4, 7), (8, 8), (5, 20)] {
            let counts = u_frequencies(m, n);
            assert_eq!(counts.len(), m * n + 1);
            assert!(counts.iter().all(|&c| c >= 0.0));
            let total = counts.iter().sum::<f64>();
            assert!((total - binomial(m + n, m)).abs() < 1e-6, "m={m} n={n}");
            // symmetric around m n / 2
            for k in 0..counts.len() {
                assert_eq!(counts[k], counts[counts.len() - 1 - k]);
            }
        }
    }

    #[test]
    fn test_u_frequencies_small_table() {
        // m = 2, n = 2: U takes 0,1,2,2,3,4 over the 6 assignments
        assert_eq!(u_frequencies(2, 2), vec![1.0, 1.0, 2.0, 1.0, 1.0]);
    }

    #[test]
    fn test_u_statistic_with_ties() {
        let first = [1.0, 2.0, 2.0, 3.0];
        let second = [2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let test = RankSumTest::two_sided(&first, &second).unwrap();
        // ranks of first: 1, 3, 3, 5.5 -> R1 = 12.5, U1 = 12.5 - 10
        assert!((test.u - 2.5).abs() < 1e-12);
        assert_eq!(test.method, PValueMethod::Asymptotic);
    }

    #[test]
    fn test_asymptotic_matches_reference() {
        // Reference: two-sided normal approximation with continuity
        // correction for fully separated samples of 10 and 10.
        let first = (0..10).map(f64::from).collect::<Vec<_>>();
        let second = (10..20).map(f64::from).collect::<Vec<_>>();
        let test = RankSumTest::two_sided(&first, &second).unwrap();
        assert_eq!(test.u, 0.0);
        assert_eq!(test.method, PValueMethod::Asymptotic);
        let s = (100.0_f64 * 21.0 / 12.0).sqrt();
        let z = (100.0 - 50.0 - 0.5) / s;
        let expected = 2.0 * Normal::standard().sf(z);
        assert!((test.p_value - expected).abs() < 1e-12);
        assert!(test.p_value < 0.001);
    }

    #[test]
    fn test_all_tied_gives_p_one() {
        let test = RankSumTest::two_sided(&[3.0; 12], &[3.0; 15]).unwrap();
        assert_eq!(test.p_value, 1.0);
        assert!((test.u - 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_u_symmetry() {
        let mut rng = Pcg64Mcg::new(42);
        for _ in 0..100 {
            let first = (0..rng.random_range(2..30))
                .map(|_| rng.random_range(0.0..10.0))
                .collect::<Vec<f64>>();
            let second = (0..rng.random_range(2..30))
                .map(|_| rng.random_range(0.0..10.0))
                .collect::<Vec<f64>>();
            let forward = RankSumTest::two_sided(&first, &second).unwrap();
            let backward = RankSumTest::two_sided(&second, &first).unwrap();
            let product = (first.len() * second.len()) as f64;
            assert!((forward.u + backward.u - product).abs() < 1e-9);
            assert!((forward.p_value - backward.p_value).abs() < 1e-12);
            assert!((0.0..=1.0).contains(&forward.p_value));
        }
    }

    #[test]
    fn test_z_from_u_centre() {
        assert_eq!(z_from_u(12.5, 5, 5), 0.0);
    }
}
