//! Special functions underlying the significance tests.
//!
//! Provides [`ln_gamma`], the regularized lower incomplete gamma function
//! ([`incomplete_gamma_cdf`]) and the chi-square survival function built on it
//! ([`chi_square_sf`]), plus the log-space hypergeometric probability mass
//! function ([`hypergeometric_pmf`]) used by Fisher's exact test.

use outbreak_core::{OutbreakError, Result};

// ── Numerical constants ────────────────────────────────────────────────────

/// Convergence tolerance shared by the incomplete-gamma series and continued
/// fraction. Both branches stop on the same bound so that P(a, x) is equally
/// accurate on either side of the `x < a + 1` crossover.
pub const CONVERGENCE_TOLERANCE: f64 = 1e-10;

/// Iteration cap shared by the series and continued fraction.
pub const MAX_ITERATIONS: usize = 100;

/// Smallest magnitude Lentz's algorithm lets a partial denominator reach
/// before substituting it, keeping the recurrence away from division by zero.
pub const LENTZ_FLOOR: f64 = 1e-30;

// ── Gamma function ─────────────────────────────────────────────────────────

/// Natural log of the gamma function via the Lanczos approximation (g=5,
/// 6 coefficients). Absolute error is below 2e-10 for `x > 0`.
///
/// Returns [`OutbreakError::InvalidArgument`] when `x <= 0` or `x` is NaN.
pub fn ln_gamma(x: f64) -> Result<f64> {
    if x.is_nan() || x <= 0.0 {
        return Err(OutbreakError::InvalidArgument(format!(
            "ln_gamma: x must be positive (got {x})"
        )));
    }
    Ok(lanczos_ln_gamma(x))
}

/// Unchecked Lanczos evaluation; callers guarantee `x > 0`.
fn lanczos_ln_gamma(x: f64) -> f64 {
    const COEFFS: [f64; 6] = [
        76.18009172947146,
        -86.50532032941677,
        24.01409824083091,
        -1.231739572450155,
        0.1208650973866179e-2,
        -0.5395239384953e-5,
    ];
    const SQRT_2PI: f64 = 2.5066282746310005;

    let tmp = x + 5.5;
    let tmp = tmp - (x + 0.5) * tmp.ln();
    let mut y = x;
    let mut ser = 1.000000000190015_f64;
    for &c in &COEFFS {
        y += 1.0;
        ser += c / y;
    }
    -tmp + (SQRT_2PI * ser / x).ln()
}

// ── Regularized lower incomplete gamma ─────────────────────────────────────

/// Regularized lower incomplete gamma function P(a, x) = γ(a, x) / Γ(a).
///
/// The chi-square CDF with `df` degrees of freedom is `P(df/2, x/2)`.
///
/// Uses the power series when `x < a + 1` and the continued fraction for
/// Q = 1 - P otherwise. The crossover is fixed: the series converges slowly
/// for large `x`, the fraction for small `x`.
///
/// Returns [`OutbreakError::InvalidArgument`] for `x < 0`, `a <= 0` or NaN
/// inputs.
pub fn incomplete_gamma_cdf(x: f64, a: f64) -> Result<f64> {
    if a.is_nan() || a <= 0.0 {
        return Err(OutbreakError::InvalidArgument(format!(
            "incomplete_gamma_cdf: a must be positive (got {a})"
        )));
    }
    if x.is_nan() || x < 0.0 {
        return Err(OutbreakError::InvalidArgument(format!(
            "incomplete_gamma_cdf: x must be non-negative (got {x})"
        )));
    }
    if x == 0.0 {
        return Ok(0.0);
    }
    if x.is_infinite() {
        return Ok(1.0);
    }

    let p = if x < a + 1.0 {
        gamma_series(x, a)
    } else {
        1.0 - gamma_continued_fraction(x, a)
    };
    Ok(p.clamp(0.0, 1.0))
}

/// Series expansion for P(a, x).
fn gamma_series(x: f64, a: f64) -> f64 {
    let ln_prefix = a * x.ln() - x - lanczos_ln_gamma(a);

    let mut ap = a;
    let mut term = 1.0 / a;
    let mut sum = term;
    for _ in 0..MAX_ITERATIONS {
        ap += 1.0;
        term *= x / ap;
        sum += term;
        if term.abs() < CONVERGENCE_TOLERANCE {
            return sum * ln_prefix.exp();
        }
    }

    tracing::debug!(x, a, "incomplete gamma series hit iteration cap");
    sum * ln_prefix.exp()
}

/// Continued fraction for Q(a, x) = 1 - P(a, x) via modified Lentz's method.
fn gamma_continued_fraction(x: f64, a: f64) -> f64 {
    let ln_prefix = a * x.ln() - x - lanczos_ln_gamma(a);

    let mut b = x + 1.0 - a;
    let mut c = 1.0 / LENTZ_FLOOR;
    let mut d = 1.0 / b;
    let mut h = d;

    for i in 1..=MAX_ITERATIONS {
        let i = i as f64;
        let an = -i * (i - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < LENTZ_FLOOR {
            d = LENTZ_FLOOR;
        }
        c = b + an / c;
        if c.abs() < LENTZ_FLOOR {
            c = LENTZ_FLOOR;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < CONVERGENCE_TOLERANCE {
            return h * ln_prefix.exp();
        }
    }

    tracing::debug!(x, a, "incomplete gamma continued fraction hit iteration cap");
    h * ln_prefix.exp()
}

/// Upper-tail probability of the chi-square distribution:
/// `1 - P(df/2, statistic/2)`.
pub fn chi_square_sf(statistic: f64, df: u32) -> Result<f64> {
    if df == 0 {
        return Err(OutbreakError::InvalidArgument(
            "chi_square_sf: degrees of freedom must be at least 1".into(),
        ));
    }
    let cdf = incomplete_gamma_cdf(statistic / 2.0, f64::from(df) / 2.0)?;
    Ok((1.0 - cdf).clamp(0.0, 1.0))
}

// ── Hypergeometric distribution ────────────────────────────────────────────

/// Log of the binomial coefficient C(n, k). `-∞` when `k > n`, so the
/// corresponding probability exponentiates to exactly 0.
pub fn ln_combination(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    lanczos_ln_gamma(n as f64 + 1.0)
        - lanczos_ln_gamma(k as f64 + 1.0)
        - lanczos_ln_gamma((n - k) as f64 + 1.0)
}

/// Hypergeometric PMF: probability of exactly `k` successes in a sample of
/// `sample_size` drawn without replacement from `total` items of which
/// `successes` are successes.
///
/// Computed as `exp(lnC(K, k) + lnC(N-K, n-k) - lnC(N, n))` so that tables
/// with a few hundred observations never overflow. Infeasible arguments give 0.
pub fn hypergeometric_pmf(k: u64, sample_size: u64, successes: u64, total: u64) -> f64 {
    if successes > total || sample_size > total || k > sample_size {
        return 0.0;
    }
    let log_p = ln_combination(successes, k)
        + ln_combination(total - successes, sample_size - k)
        - ln_combination(total, sample_size);
    if log_p == f64::NEG_INFINITY {
        0.0
    } else {
        log_p.exp()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    /// Abramowitz & Stegun 7.1.26 (max error ~1.5e-7), used as an
    /// independent reference for the chi-square(1) tail.
    fn erfc_reference(x: f64) -> f64 {
        let t = 1.0 / (1.0 + 0.3275911 * x);
        let poly = t
            * (0.254829592
                + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
        poly * (-x * x).exp()
    }

    #[test]
    fn ln_gamma_integers_match_factorials() {
        // Γ(n) = (n-1)!
        assert!(ln_gamma(1.0).unwrap().abs() < TOL);
        assert!(ln_gamma(2.0).unwrap().abs() < TOL);
        assert!((ln_gamma(5.0).unwrap() - 24.0_f64.ln()).abs() < TOL);
        assert!((ln_gamma(10.0).unwrap() - 362_880.0_f64.ln()).abs() < TOL);
    }

    #[test]
    fn ln_gamma_half() {
        // Γ(1/2) = √π
        let expected = std::f64::consts::PI.sqrt().ln();
        assert!((ln_gamma(0.5).unwrap() - expected).abs() < TOL);
    }

    #[test]
    fn ln_gamma_large_argument_stays_finite() {
        let v = ln_gamma(301.0).unwrap();
        assert!(v.is_finite());
        assert!(v > 1000.0);
    }

    #[test]
    fn ln_gamma_rejects_non_positive() {
        assert!(ln_gamma(0.0).is_err());
        assert!(ln_gamma(-2.5).is_err());
        assert!(ln_gamma(f64::NAN).is_err());
    }

    #[test]
    fn incomplete_gamma_zero() {
        assert_eq!(incomplete_gamma_cdf(0.0, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn incomplete_gamma_exponential() {
        // P(1, x) = 1 - e^{-x}, on both sides of the crossover
        for &x in &[0.3_f64, 1.5, 2.0, 7.0] {
            let expected = 1.0 - (-x).exp();
            let got = incomplete_gamma_cdf(x, 1.0).unwrap();
            assert!((got - expected).abs() < 1e-8, "x={x} got={got}");
        }
    }

    #[test]
    fn incomplete_gamma_branches_agree_at_crossover() {
        let a = 2.5;
        let below = incomplete_gamma_cdf(a + 1.0 - 1e-9, a).unwrap();
        let above = incomplete_gamma_cdf(a + 1.0, a).unwrap();
        assert!((below - above).abs() < 1e-8);
    }

    #[test]
    fn incomplete_gamma_large_x_saturates() {
        assert!((incomplete_gamma_cdf(50.0, 2.0).unwrap() - 1.0).abs() < 1e-10);
        assert_eq!(incomplete_gamma_cdf(f64::INFINITY, 2.0).unwrap(), 1.0);
    }

    #[test]
    fn incomplete_gamma_rejects_domain_violations() {
        assert!(incomplete_gamma_cdf(-1.0, 1.0).is_err());
        assert!(incomplete_gamma_cdf(1.0, 0.0).is_err());
        assert!(incomplete_gamma_cdf(1.0, -1.0).is_err());
        assert!(incomplete_gamma_cdf(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn chi_square_sf_df1_matches_erfc() {
        // For df = 1 the upper tail is erfc(sqrt(x/2)).
        for &x in &[0.5_f64, 1.153153153, 3.841, 11.28] {
            let expected = erfc_reference((x / 2.0).sqrt());
            let got = chi_square_sf(x, 1).unwrap();
            assert!((got - expected).abs() < 1e-6, "x={x} got={got} expected={expected}");
        }
    }

    #[test]
    fn chi_square_sf_df2_closed_form() {
        // df = 2: survival is e^{-x/2}
        let x = 6.6666666666;
        assert!((chi_square_sf(x, 2).unwrap() - (-x / 2.0).exp()).abs() < 1e-9);
    }

    #[test]
    fn chi_square_sf_zero_df_rejected() {
        assert!(chi_square_sf(1.0, 0).is_err());
    }

    #[test]
    fn ln_combination_out_of_range() {
        assert_eq!(ln_combination(3, 4), f64::NEG_INFINITY);
        assert!((ln_combination(5, 2) - 10.0_f64.ln()).abs() < TOL);
    }

    #[test]
    fn hypergeometric_pmf_known_value() {
        // C(10,1)·C(10,9)/C(20,10) = 100 / 184756
        let p = hypergeometric_pmf(1, 10, 10, 20);
        assert!((p - 100.0 / 184_756.0).abs() < 1e-11);
    }

    #[test]
    fn hypergeometric_pmf_sums_to_one() {
        let sum: f64 = (0..=12).map(|k| hypergeometric_pmf(k, 12, 15, 40)).sum();
        assert!((sum - 1.0).abs() < 1e-8);
    }

    #[test]
    fn hypergeometric_pmf_infeasible_is_zero() {
        assert_eq!(hypergeometric_pmf(6, 5, 10, 20), 0.0);
        assert_eq!(hypergeometric_pmf(3, 5, 2, 20), 0.0);
        assert_eq!(hypergeometric_pmf(0, 30, 10, 20), 0.0);
    }
}
