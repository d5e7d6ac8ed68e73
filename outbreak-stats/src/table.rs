//! The 2×2 exposure/outcome table and confidence interval value types.

use outbreak_core::Summarizable;

/// Counts of a 2×2 exposure-by-outcome table.
///
/// ```text
///              Ill     Well
/// Exposed       a        b
/// Unexposed     c        d
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwoByTwoTable {
    /// Exposed and ill.
    pub a: u64,
    /// Exposed and well.
    pub b: u64,
    /// Unexposed and ill.
    pub c: u64,
    /// Unexposed and well.
    pub d: u64,
}

impl TwoByTwoTable {
    pub const fn new(a: u64, b: u64, c: u64, d: u64) -> Self {
        Self { a, b, c, d }
    }

    /// Build a table by counting `(exposed, ill)` observations.
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = (bool, bool)>,
    {
        let mut table = Self::default();
        for (exposed, ill) in observations {
            match (exposed, ill) {
                (true, true) => table.a += 1,
                (true, false) => table.b += 1,
                (false, true) => table.c += 1,
                (false, false) => table.d += 1,
            }
        }
        table
    }

    /// Row total of the exposed group (a + b).
    pub fn exposed_total(&self) -> u64 {
        self.a.saturating_add(self.b)
    }

    /// Row total of the unexposed group (c + d).
    pub fn unexposed_total(&self) -> u64 {
        self.c.saturating_add(self.d)
    }

    /// Column total of ill persons (a + c).
    pub fn ill_total(&self) -> u64 {
        self.a.saturating_add(self.c)
    }

    /// Column total of well persons (b + d).
    pub fn well_total(&self) -> u64 {
        self.b.saturating_add(self.d)
    }

    /// Grand total N, saturating at `u64::MAX`.
    ///
    /// The margins above saturate the same way. Rates and test statistics are
    /// computed from the cells in floating point and do not depend on them.
    pub fn total(&self) -> u64 {
        self.checked_total().unwrap_or(u64::MAX)
    }

    /// Grand total N, or `None` when it does not fit in a `u64`.
    pub fn checked_total(&self) -> Option<u64> {
        self.a
            .checked_add(self.b)?
            .checked_add(self.c)?
            .checked_add(self.d)
    }

    /// Cells as floats, in the order `(a, b, c, d)`.
    pub fn cells_f64(&self) -> (f64, f64, f64, f64) {
        (self.a as f64, self.b as f64, self.c as f64, self.d as f64)
    }

    /// Whether any cell is zero.
    pub fn has_zero_cell(&self) -> bool {
        self.a == 0 || self.b == 0 || self.c == 0 || self.d == 0
    }

    /// Cells in row-major order `[[a, b], [c, d]]`.
    pub fn as_rows(&self) -> [[u64; 2]; 2] {
        [[self.a, self.b], [self.c, self.d]]
    }
}

impl From<[[u64; 2]; 2]> for TwoByTwoTable {
    fn from(rows: [[u64; 2]; 2]) -> Self {
        Self::new(rows[0][0], rows[0][1], rows[1][0], rows[1][1])
    }
}

impl Summarizable for TwoByTwoTable {
    fn summary(&self) -> String {
        format!("a={}, b={}, c={}, d={}, N={}", self.a, self.b, self.c, self.d, self.total())
    }
}

/// A two-sided confidence interval. `lower <= upper`; either bound may be
/// infinite when the estimate is not bounded on that side.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Build an interval, swapping the bounds if they arrive reversed.
    pub fn new(lower: f64, upper: f64) -> Self {
        if lower <= upper {
            Self { lower, upper }
        } else {
            Self { lower: upper, upper: lower }
        }
    }

    /// The `[0, ∞)` interval reported when a ratio is not estimable.
    pub const fn unbounded_ratio() -> Self {
        Self {
            lower: 0.0,
            upper: f64::INFINITY,
        }
    }

    /// Whether `value` lies within the interval (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }
}
