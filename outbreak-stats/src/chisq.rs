//! Chi-square tests of association.
//!
//! [`yates_chi_square`] handles the 2×2 exposure table with Yates' continuity
//! correction; [`chi_square_r_by_2`] generalizes Pearson's statistic to R
//! groups by two outcome levels.

use outbreak_core::{Scored, Summarizable};

use crate::special::chi_square_sf;
use crate::table::TwoByTwoTable;

/// Result of a chi-square test.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChiSquareResult {
    /// The chi-square statistic.
    pub statistic: f64,
    /// Degrees of freedom.
    pub degrees_of_freedom: u32,
    /// Upper-tail p-value.
    pub p_value: f64,
    /// Smallest expected cell count. Below 5 the asymptotic p-value is
    /// unreliable and Fisher's exact test is preferred.
    pub min_expected: f64,
}

impl ChiSquareResult {
    /// Whether any expected count falls below 5.
    pub fn has_small_expected(&self) -> bool {
        self.min_expected < 5.0
    }
}

impl Scored for ChiSquareResult {
    fn score(&self) -> f64 {
        self.p_value
    }
}

impl Summarizable for ChiSquareResult {
    fn summary(&self) -> String {
        format!(
            "chi2={:.4}, df={}, p={:.6}",
            self.statistic, self.degrees_of_freedom, self.p_value,
        )
    }
}

/// Yates-corrected chi-square test for a 2×2 table (1 degree of freedom).
///
/// Expected counts come from the margins under independence, and the
/// statistic is `Σ (|O − E| − 0.5)² / E` over the four cells.
///
/// Returns `None` when any expected count is zero (an empty row or column),
/// where the statistic is undefined.
pub fn yates_chi_square(table: &TwoByTwoTable) -> Option<ChiSquareResult> {
    let (a, b, c, d) = table.cells_f64();
    let n = a + b + c + d;
    let rows = [a + b, c + d];
    let cols = [a + c, b + d];
    let observed = [[a, b], [c, d]];

    let mut statistic = 0.0;
    let mut min_expected = f64::INFINITY;
    for (i, row) in observed.iter().enumerate() {
        for (j, &o) in row.iter().enumerate() {
            let expected = if n > 0.0 { rows[i] * cols[j] / n } else { 0.0 };
            if expected == 0.0 {
                tracing::debug!(?table, "chi-square undefined: zero expected count");
                return None;
            }
            min_expected = min_expected.min(expected);
            let diff = (o - expected).abs() - 0.5;
            statistic += diff * diff / expected;
        }
    }

    let p_value = chi_square_sf(statistic, 1).ok()?;
    Some(ChiSquareResult {
        statistic,
        degrees_of_freedom: 1,
        p_value,
        min_expected,
    })
}

/// Pearson chi-square test for R groups × 2 outcome levels.
///
/// Each row is `[positive, negative]`. Cells whose expected count is zero are
/// skipped; degrees of freedom are `rows − 1`.
///
/// Returns `None` with fewer than two rows or an all-zero table.
pub fn chi_square_r_by_2(rows: &[[u64; 2]]) -> Option<ChiSquareResult> {
    if rows.len() < 2 {
        return None;
    }

    // Margins are accumulated in f64; integer sums could overflow.
    let col_totals = rows
        .iter()
        .fold([0.0f64; 2], |acc, r| [acc[0] + r[0] as f64, acc[1] + r[1] as f64]);
    let grand_total = col_totals[0] + col_totals[1];
    if grand_total == 0.0 {
        tracing::debug!(groups = rows.len(), "chi-square undefined: empty table");
        return None;
    }

    let mut statistic = 0.0;
    let mut min_expected = f64::INFINITY;
    for row in rows {
        let row_total = row[0] as f64 + row[1] as f64;
        for (j, &o) in row.iter().enumerate() {
            let expected = row_total * col_totals[j] / grand_total;
            min_expected = min_expected.min(expected);
            if expected > 0.0 {
                let diff = o as f64 - expected;
                statistic += diff * diff / expected;
            }
        }
    }

    let degrees_of_freedom = u32::try_from(rows.len() - 1).ok()?;
    let p_value = chi_square_sf(statistic, degrees_of_freedom).ok()?;
    Some(ChiSquareResult {
        statistic,
        degrees_of_freedom,
        p_value,
        min_expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yates_matches_closed_form() {
        // Expected: a=c=7.5, b=d=92.5; every |O-E| = 2.5
        let t = TwoByTwoTable::new(10, 90, 5, 95);
        let r = yates_chi_square(&t).unwrap();
        let closed_form = 2.0 * 4.0 / 7.5 + 2.0 * 4.0 / 92.5;
        assert!((r.statistic - closed_form).abs() < 1e-12);
        assert!((r.statistic - 1.153_153_153_153).abs() < 1e-6);
        assert!((r.p_value - 0.282_890_055_754_668).abs() < 1e-7, "p={}", r.p_value);
        assert_eq!(r.degrees_of_freedom, 1);
        assert!((r.min_expected - 7.5).abs() < 1e-12);
    }

    #[test]
    fn yates_strong_association() {
        let t = TwoByTwoTable::new(30, 70, 10, 90);
        let r = yates_chi_square(&t).unwrap();
        assert!((r.statistic - 11.28125).abs() < 1e-9);
        assert!((r.p_value - 0.000_782_938_217_891).abs() < 1e-8, "p={}", r.p_value);
    }

    #[test]
    fn yates_undefined_for_empty_column() {
        let t = TwoByTwoTable::new(0, 10, 0, 12);
        assert!(yates_chi_square(&t).is_none());
    }

    #[test]
    fn yates_undefined_for_empty_table() {
        assert!(yates_chi_square(&TwoByTwoTable::default()).is_none());
    }

    #[test]
    fn yates_flags_small_expected() {
        let t = TwoByTwoTable::new(3, 1, 1, 3);
        let r = yates_chi_square(&t).unwrap();
        assert!(r.has_small_expected());
    }

    #[test]
    fn r_by_2_three_groups() {
        let rows = [[10, 20], [20, 10], [15, 15]];
        let r = chi_square_r_by_2(&rows).unwrap();
        assert!((r.statistic - 20.0 / 3.0).abs() < 1e-10);
        assert_eq!(r.degrees_of_freedom, 2);
        // df = 2: p = e^{-x/2}
        assert!((r.p_value - (-r.statistic / 2.0).exp()).abs() < 1e-9);
    }

    #[test]
    fn r_by_2_skips_zero_expected_cells() {
        // Second outcome column empty: no association can be measured.
        let rows = [[5, 0], [7, 0]];
        let r = chi_square_r_by_2(&rows).unwrap();
        assert_eq!(r.statistic, 0.0);
        assert!((r.p_value - 1.0).abs() < 1e-12);
        assert_eq!(r.min_expected, 0.0);
    }

    #[test]
    fn r_by_2_requires_two_groups() {
        assert!(chi_square_r_by_2(&[[3, 4]]).is_none());
        assert!(chi_square_r_by_2(&[]).is_none());
        assert!(chi_square_r_by_2(&[[0, 0], [0, 0]]).is_none());
    }

    #[test]
    fn large_counts_stay_finite() {
        let big = 1u64 << 62;
        let r = yates_chi_square(&TwoByTwoTable::new(big, big, big, big)).unwrap();
        assert!(r.statistic.is_finite());
        assert!((r.p_value - 1.0).abs() < 1e-9);

        let half = u64::MAX / 2;
        let r = chi_square_r_by_2(&[[half, half], [half, half], [3, 4]]).unwrap();
        assert!(r.statistic.is_finite());
        assert_eq!(r.degrees_of_freedom, 2);
    }

    #[test]
    fn summary_formats_df() {
        let r = yates_chi_square(&TwoByTwoTable::new(10, 90, 5, 95)).unwrap();
        assert!(r.summary().contains("df=1"));
        assert!((r.score() - r.p_value).abs() < 1e-15);
    }
}
