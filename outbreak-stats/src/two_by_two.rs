//! Epidemiological analysis of a 2×2 exposure/outcome table.
//!
//! [`analyze`] produces a [`TwoByTwoResult`] snapshot with attack rates, risk
//! ratio, odds ratio, risk difference, attributable-risk percent, their
//! confidence intervals, the Yates chi-square test and (for small tables)
//! Fisher's exact p-value. The individual measures are also exposed as free
//! functions.
//!
//! No input can make these functions panic or produce NaN: zero denominators
//! resolve to `0`, `f64::INFINITY`, or the `[0, ∞)` interval, which callers
//! render as "Undefined".

use outbreak_core::{Scored, Summarizable};

use crate::chisq::{yates_chi_square, ChiSquareResult};
use crate::fisher::{fisher_exact_within, FISHER_MAX_TOTAL};
use crate::table::{ConfidenceInterval, TwoByTwoTable};

/// Standard normal critical value for a two-sided 95% interval.
pub const Z_95: f64 = 1.96;

/// Tunables for [`analyze_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwoByTwoOptions {
    /// Critical value multiplying the standard errors (1.96 → 95%).
    pub z_critical: f64,
    /// Fisher's exact test runs only when N is at most this value. Values
    /// above [`FISHER_ENUMERATION_LIMIT`](crate::fisher::FISHER_ENUMERATION_LIMIT)
    /// behave like that limit.
    pub fisher_max_total: u64,
}

impl Default for TwoByTwoOptions {
    fn default() -> Self {
        Self {
            z_critical: Z_95,
            fisher_max_total: FISHER_MAX_TOTAL,
        }
    }
}

/// Immutable analysis of one [`TwoByTwoTable`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwoByTwoResult {
    pub table: TwoByTwoTable,
    pub exposed_total: u64,
    pub unexposed_total: u64,
    pub ill_total: u64,
    pub well_total: u64,
    pub total: u64,
    /// a / (a + b)
    pub attack_rate_exposed: f64,
    /// c / (c + d)
    pub attack_rate_unexposed: f64,
    /// (a + c) / N
    pub attack_rate_overall: f64,
    pub risk_ratio: f64,
    pub risk_ratio_ci: ConfidenceInterval,
    pub odds_ratio: f64,
    pub odds_ratio_ci: ConfidenceInterval,
    /// Whether 0.5 was added to every cell before estimating the odds ratio.
    pub haldane_corrected: bool,
    pub risk_difference: f64,
    pub risk_difference_ci: ConfidenceInterval,
    pub attributable_risk_percent: f64,
    pub attributable_risk_percent_ci: ConfidenceInterval,
    /// `None` when the statistic is undefined (an empty row or column).
    pub chi_square: Option<ChiSquareResult>,
    /// `None` when N exceeds the Fisher limit.
    pub fisher_p_value: Option<f64>,
}

impl TwoByTwoResult {
    /// The most appropriate p-value: Fisher's when it was computed, otherwise
    /// the Yates chi-square p-value.
    pub fn preferred_p_value(&self) -> Option<f64> {
        self.fisher_p_value
            .or_else(|| self.chi_square.map(|c| c.p_value))
    }
}

impl Scored for TwoByTwoResult {
    fn score(&self) -> f64 {
        self.risk_ratio
    }
}

impl Summarizable for TwoByTwoResult {
    fn summary(&self) -> String {
        format!(
            "N={}, RR={:.3} ({:.3}-{:.3}), OR={:.3} ({:.3}-{:.3})",
            self.total,
            self.risk_ratio,
            self.risk_ratio_ci.lower,
            self.risk_ratio_ci.upper,
            self.odds_ratio,
            self.odds_ratio_ci.lower,
            self.odds_ratio_ci.upper,
        )
    }
}

/// Analyze `table` with the default options (95% intervals, Fisher for N ≤ 100).
pub fn analyze(table: &TwoByTwoTable) -> TwoByTwoResult {
    analyze_with(table, &TwoByTwoOptions::default())
}

/// Analyze `table` with explicit options.
pub fn analyze_with(table: &TwoByTwoTable, options: &TwoByTwoOptions) -> TwoByTwoResult {
    let z = options.z_critical;
    let (attack_rate_exposed, attack_rate_unexposed) = attack_rates(table);
    let rr = risk_ratio(table, z);
    let or = odds_ratio(table, z);
    let rd = risk_difference(table, z);

    TwoByTwoResult {
        table: *table,
        exposed_total: table.exposed_total(),
        unexposed_total: table.unexposed_total(),
        ill_total: table.ill_total(),
        well_total: table.well_total(),
        total: table.total(),
        attack_rate_exposed,
        attack_rate_unexposed,
        attack_rate_overall: overall_attack_rate(table),
        risk_ratio: rr.estimate,
        risk_ratio_ci: rr.ci,
        odds_ratio: or.estimate,
        odds_ratio_ci: or.ci,
        haldane_corrected: or.corrected,
        risk_difference: rd.estimate,
        risk_difference_ci: rd.ci,
        attributable_risk_percent: attributable_risk_percent(table),
        attributable_risk_percent_ci: attributable_risk_percent_ci(rr.ci),
        chi_square: yates_chi_square(table),
        fisher_p_value: fisher_exact_within(table, options.fisher_max_total),
    }
}

// ── Individual measures ────────────────────────────────────────────────────

/// A point estimate with its confidence interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub estimate: f64,
    pub ci: ConfidenceInterval,
}

/// Odds ratio estimate, flagged when the Haldane-Anscombe correction was used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OddsRatio {
    pub estimate: f64,
    pub ci: ConfidenceInterval,
    pub corrected: bool,
}

/// `numerator / denominator`, or 0 when the denominator is 0.
fn proportion(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Attack rates of the exposed and unexposed groups; 0 for an empty group.
pub fn attack_rates(table: &TwoByTwoTable) -> (f64, f64) {
    let (a, b, c, d) = table.cells_f64();
    (proportion(a, a + b), proportion(c, c + d))
}

/// Share of all persons who became ill, (a + c) / N.
fn overall_attack_rate(table: &TwoByTwoTable) -> f64 {
    let (a, b, c, d) = table.cells_f64();
    proportion(a + c, a + b + c + d)
}

/// Risk ratio with a log-transform confidence interval.
///
/// The estimate is `∞` when only the unexposed attack rate is 0 and 0 when the
/// exposed attack rate is 0. The interval is `[0, ∞)` whenever `a` or `c` is
/// zero.
pub fn risk_ratio(table: &TwoByTwoTable, z: f64) -> Estimate {
    let (p1, p2) = attack_rates(table);
    let estimate = if p1 == 0.0 {
        0.0
    } else if p2 == 0.0 {
        f64::INFINITY
    } else {
        p1 / p2
    };

    if table.a == 0 || table.c == 0 {
        return Estimate {
            estimate,
            ci: ConfidenceInterval::unbounded_ratio(),
        };
    }

    let (a, b, c, d) = table.cells_f64();
    let n1 = a + b;
    let n2 = c + d;
    let se = (b / (a * n1) + d / (c * n2)).sqrt();
    Estimate {
        estimate,
        ci: log_interval(estimate, se, z),
    }
}

/// Odds ratio `(a·d)/(b·c)` with a Woolf (log) confidence interval.
///
/// When any cell is zero the Haldane-Anscombe correction adds 0.5 to every
/// cell for both the estimate and the interval, so the result is always
/// finite and positive.
pub fn odds_ratio(table: &TwoByTwoTable, z: f64) -> OddsRatio {
    let corrected = table.has_zero_cell();
    let (mut a, mut b, mut c, mut d) = table.cells_f64();
    if corrected {
        tracing::debug!(?table, "applying Haldane-Anscombe correction");
        a += 0.5;
        b += 0.5;
        c += 0.5;
        d += 0.5;
    }

    let estimate = (a * d) / (b * c);
    let se = (1.0 / a + 1.0 / b + 1.0 / c + 1.0 / d).sqrt();
    OddsRatio {
        estimate,
        ci: log_interval(estimate, se, z),
        corrected,
    }
}

/// Risk difference (exposed minus unexposed attack rate) with a Wald
/// interval. A group with no members contributes nothing to the standard
/// error.
pub fn risk_difference(table: &TwoByTwoTable, z: f64) -> Estimate {
    let (p1, p2) = attack_rates(table);
    let (a, b, c, d) = table.cells_f64();
    let variance_term = |p: f64, n: f64| {
        if n == 0.0 {
            0.0
        } else {
            p * (1.0 - p) / n
        }
    };
    let se = (variance_term(p1, a + b) + variance_term(p2, c + d)).sqrt();
    let estimate = p1 - p2;
    Estimate {
        estimate,
        ci: ConfidenceInterval::new(estimate - z * se, estimate + z * se),
    }
}

/// Attributable-risk percent among the exposed:
/// `(ARe − ARu) / ARe × 100`, or 0 when the exposed attack rate is 0.
pub fn attributable_risk_percent(table: &TwoByTwoTable) -> f64 {
    let (p1, p2) = attack_rates(table);
    if p1 == 0.0 {
        0.0
    } else {
        (p1 - p2) / p1 * 100.0
    }
}

/// Interval for the attributable-risk percent obtained by mapping each bound
/// of the risk-ratio interval through `(RR − 1) / RR × 100`.
fn attributable_risk_percent_ci(rr_ci: ConfidenceInterval) -> ConfidenceInterval {
    let to_percent = |rr: f64| {
        if rr == 0.0 {
            f64::NEG_INFINITY
        } else if rr.is_infinite() {
            100.0
        } else {
            (rr - 1.0) / rr * 100.0
        }
    };
    ConfidenceInterval::new(to_percent(rr_ci.lower), to_percent(rr_ci.upper))
}

/// `exp(ln(estimate) ± z·se)`.
fn log_interval(estimate: f64, se: f64, z: f64) -> ConfidenceInterval {
    let ln_est = estimate.ln();
    ConfidenceInterval::new((ln_est - z * se).exp(), (ln_est + z * se).exp())
}

// ── Tests ──────────────────────────────────────────────────────────────────


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn table() -> impl Strategy<Value = TwoByTwoTable> {
        (0..200u64, 0..200u64, 0..200u64, 0..200u64)
            .prop_map(|(a, b, c, d)| TwoByTwoTable::new(a, b, c, d))
    }

    proptest! {
        #[test]
        fn attack_rates_are_proportions(t in table()) {
            let r = analyze(&t);
            prop_assert!((0.0..=1.0).contains(&r.attack_rate_exposed));
            prop_assert!((0.0..=1.0).contains(&r.attack_rate_unexposed));
            prop_assert!((0.0..=1.0).contains(&r.attack_rate_overall));
        }

        #[test]
        fn no_nan_anywhere(t in table()) {
            let r = analyze(&t);
            for v in [r.risk_ratio, r.odds_ratio, r.risk_difference, r.attributable_risk_percent] {
                prop_assert!(!v.is_nan());
            }
            for ci in [r.risk_ratio_ci, r.odds_ratio_ci, r.risk_difference_ci, r.attributable_risk_percent_ci] {
                prop_assert!(!ci.lower.is_nan() && !ci.upper.is_nan());
                prop_assert!(ci.lower <= ci.upper);
            }
        }

        #[test]
        fn odds_ratio_always_finite_positive(t in table()) {
            let or = odds_ratio(&t, Z_95);
            prop_assert!(or.estimate.is_finite() && or.estimate > 0.0);
        }

        #[test]
        fn p_values_are_probabilities(t in table()) {
            let r = analyze(&t);
            if let Some(c) = r.chi_square {
                prop_assert!((0.0..=1.0).contains(&c.p_value));
            }
            if let Some(p) = r.fisher_p_value {
                prop_assert!(p > 0.0 && p <= 1.0);
            }
        }
    }
}
