//! Fisher's exact test for 2×2 tables.
//!
//! The two-tailed p-value sums the hypergeometric probability of every table
//! sharing the observed margins that is no more probable than the observed
//! one.

use crate::special::hypergeometric_pmf;
use crate::table::TwoByTwoTable;

/// Slack when comparing a table's probability with the observed table's.
/// Tables mathematically tied with the observed one can differ in the last
/// few bits after the log-space evaluation; this keeps them in the tail sum.
pub const FISHER_TIE_TOLERANCE: f64 = 1e-10;

/// Largest grand total for which [`fisher_exact`] runs the enumeration.
pub const FISHER_MAX_TOTAL: u64 = 100;

/// Hard ceiling on the grand total for any caller-supplied limit passed to
/// [`fisher_exact_within`].
pub const FISHER_ENUMERATION_LIMIT: u64 = 10_000;

/// Two-tailed Fisher's exact p-value, or `None` when the table holds more than
/// [`FISHER_MAX_TOTAL`] observations.
pub fn fisher_exact(table: &TwoByTwoTable) -> Option<f64> {
    fisher_exact_within(table, FISHER_MAX_TOTAL)
}

/// Fisher's exact p-value, or `None` when the grand total exceeds
/// `max_total`. Limits above [`FISHER_ENUMERATION_LIMIT`] are lowered to it,
/// and a table whose total does not fit in a `u64` is always declined.
pub fn fisher_exact_within(table: &TwoByTwoTable, max_total: u64) -> Option<f64> {
    let limit = max_total.min(FISHER_ENUMERATION_LIMIT);
    match table.checked_total() {
        Some(n) if n <= limit => Some(two_tailed_p(table, n)),
        n => {
            tracing::debug!(?n, limit, "Fisher's exact test declined for large table");
            None
        }
    }
}

/// Enumerates every feasible value `i` of the exposed-ill cell in
/// `[max(0, r1 − c2), min(r1, c1)]` and sums `PMF(i)` where
/// `PMF(i) <= PMF(a) + FISHER_TIE_TOLERANCE`, clamped to at most 1.
///
/// `n` must be the grand total, so every margin fits in a `u64`.
fn two_tailed_p(table: &TwoByTwoTable, n: u64) -> f64 {
    let row1 = table.exposed_total();
    let col1 = table.ill_total();
    let col2 = table.well_total();

    let p_observed = hypergeometric_pmf(table.a, row1, col1, n);

    let min_i = row1.saturating_sub(col2);
    let max_i = row1.min(col1);

    let p_value: f64 = (min_i..=max_i)
        .map(|i| hypergeometric_pmf(i, row1, col1, n))
        .filter(|&p_i| p_i <= p_observed + FISHER_TIE_TOLERANCE)
        .sum();

    p_value.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(t: TwoByTwoTable) -> f64 {
        fisher_exact(&t).unwrap()
    }

    #[test]
    fn small_discordant_table() {
        // Tables i = 0, 1, 9, 10 are at least as extreme: 202 / C(20, 10)
        let p = p(TwoByTwoTable::new(1, 9, 9, 1));
        assert!((p - 202.0 / 184_756.0).abs() < 1e-10, "p={p}");
        assert!((p - 0.001_093).abs() < 1e-6);
    }

    #[test]
    fn tea_tasting_style_table() {
        let p = p(TwoByTwoTable::new(3, 1, 1, 3));
        assert!((p - 0.485_714_285_714_285_7).abs() < 1e-8, "p={p}");
    }

    #[test]
    fn strong_association() {
        let p = p(TwoByTwoTable::new(8, 1, 1, 8));
        assert!((p - 0.003_373_097_490_744_549).abs() < 1e-9, "p={p}");
    }

    #[test]
    fn balanced_table_is_one() {
        let p = p(TwoByTwoTable::new(5, 5, 5, 5));
        assert!((p - 1.0).abs() < 1e-8);
        assert!(p <= 1.0);
    }

    #[test]
    fn degenerate_tables_do_not_panic() {
        assert!((p(TwoByTwoTable::default()) - 1.0).abs() < 1e-8);
        assert!((p(TwoByTwoTable::new(0, 0, 0, 7)) - 1.0).abs() < 1e-8);
        assert!((p(TwoByTwoTable::new(4, 0, 0, 0)) - 1.0).abs() < 1e-8);
    }

    #[test]
    fn gated_above_limit() {
        let t = TwoByTwoTable::new(30, 30, 30, 30);
        assert!(fisher_exact_within(&t, FISHER_MAX_TOTAL).is_none());
        let t = TwoByTwoTable::new(25, 25, 25, 25);
        assert!(fisher_exact_within(&t, FISHER_MAX_TOTAL).is_some());
    }

    #[test]
    fn default_gate_applies() {
        assert!(fisher_exact(&TwoByTwoTable::new(26, 25, 25, 25)).is_none());
    }

    #[test]
    fn caller_limit_is_capped() {
        let t = TwoByTwoTable::new(3_000, 3_000, 3_000, 3_000);
        assert!(fisher_exact_within(&t, u64::MAX).is_none());
        let t = TwoByTwoTable::new(2_000, 2_000, 2_000, 2_000);
        assert!(fisher_exact_within(&t, u64::MAX).is_some());
    }

    #[test]
    fn overflowing_total_is_declined() {
        let t = TwoByTwoTable::new(1 << 62, 1 << 62, 1 << 62, 1 << 62);
        assert!(fisher_exact_within(&t, 100).is_none());
        assert!(fisher_exact_within(&t, u64::MAX).is_none());
        let t = TwoByTwoTable::new(u64::MAX, 1, 0, 0);
        assert!(fisher_exact(&t).is_none());
    }
}
