//! Descriptive statistics for numeric data.
//!
//! [`describe`] computes every summary in one call and never fails: an empty
//! sample yields a zero count and NaN-filled statistics. [`percentile`] is the
//! linear-interpolation quantile used for the median and quartiles.

use outbreak_core::Summarizable;

use crate::coerce::NumericColumn;

/// Aggregate descriptive statistics for a numeric sample.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DescriptiveStats {
    /// Number of valid (finite) observations.
    pub count: usize,
    /// Entries in the original column that did not yield a valid number.
    pub missing: usize,
    pub sum: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median (50th percentile).
    pub median: f64,
    /// Most frequent value; `None` when no value repeats.
    pub mode: Option<f64>,
    /// Sample variance (n − 1 denominator; 1 when n = 1).
    pub variance: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Range (max - min).
    pub range: f64,
    /// First quartile (25th percentile).
    pub q1: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
    /// Interquartile range (q3 - q1).
    pub iqr: f64,
}

impl DescriptiveStats {
    fn empty(missing: usize) -> Self {
        Self {
            count: 0,
            missing,
            sum: 0.0,
            mean: f64::NAN,
            median: f64::NAN,
            mode: None,
            variance: f64::NAN,
            std_dev: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            range: f64::NAN,
            q1: f64::NAN,
            q3: f64::NAN,
            iqr: f64::NAN,
        }
    }
}

impl Summarizable for DescriptiveStats {
    fn summary(&self) -> String {
        format!(
            "n={}, missing={}, mean={:.4}, sd={:.4}, median={:.4}, min={:.4}, max={:.4}",
            self.count, self.missing, self.mean, self.std_dev, self.median, self.min, self.max,
        )
    }
}

/// Compute descriptive statistics for `values`.
///
/// `pre_filter_len` is the length of the column before the caller removed
/// null or unparsable entries; `missing` is reported relative to it. Values
/// that are not finite are dropped here as well and count as missing.
pub fn describe(values: &[f64], pre_filter_len: usize) -> DescriptiveStats {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    let n = sorted.len();
    let missing = pre_filter_len.max(values.len()) - n;

    if n == 0 {
        return DescriptiveStats::empty(missing);
    }

    sorted.sort_by(|a, b| a.total_cmp(b));

    let n_f = n as f64;
    let sum: f64 = sorted.iter().sum();
    let mean = sum / n_f;
    let ss: f64 = sorted.iter().map(|&x| (x - mean).powi(2)).sum();
    let denominator = if n > 1 { n_f - 1.0 } else { 1.0 };
    let variance = ss / denominator;

    let min = sorted[0];
    let max = sorted[n - 1];
    let q1 = percentile(&sorted, 25.0);
    let q3 = percentile(&sorted, 75.0);

    DescriptiveStats {
        count: n,
        missing,
        sum,
        mean,
        median: median_sorted(&sorted),
        mode: mode_sorted(&sorted),
        variance,
        std_dev: variance.sqrt(),
        min,
        max,
        range: max - min,
        q1,
        q3,
        iqr: q3 - q1,
    }
}

/// Descriptive statistics for a coerced column; missing includes both empty
/// and unparsable entries.
pub fn describe_column(column: &NumericColumn) -> DescriptiveStats {
    describe(&column.values, column.total)
}

/// The `p`-th percentile (0–100) of an ascending slice by linear
/// interpolation between ranks `floor(p/100·(n−1))` and `ceil(...)`.
///
/// NaN for an empty slice; `p` is clamped to [0, 100].
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 || p.is_nan() {
        return f64::NAN;
    }
    let index = p.clamp(0.0, 100.0) / 100.0 * (n - 1) as f64;
    let lo = index.floor() as usize;
    let hi = (index.ceil() as usize).min(n - 1);
    let weight = index - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * weight
}

fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Longest run of equal values; the smallest value wins ties. `None` unless
/// some value occurs more than once.
fn mode_sorted(sorted: &[f64]) -> Option<f64> {
    let mut best: Option<(f64, usize)> = None;
    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        let run = sorted[i..].iter().take_while(|&&x| x == value).count();
        if run > 1 && best.map_or(true, |(_, count)| run > count) {
            best = Some((value, run));
        }
        i += run;
    }
    best.map(|(value, _)| value)
}

// ── Tests ──────────────────────────────────────────────────────────────────


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn quartiles_are_monotone(values in proptest::collection::vec(-1.0e6..1.0e6f64, 1..200)) {
            // Rounding slack for interpolated values near 1e6.
            let eps = 1e-6;
            let stats = describe(&values, values.len());
            prop_assert!(stats.min <= stats.q1 + eps);
            prop_assert!(stats.q1 <= stats.median + eps);
            prop_assert!(stats.median <= stats.q3 + eps);
            prop_assert!(stats.q3 <= stats.max + eps);
            prop_assert!(stats.iqr >= -eps);
        }

        #[test]
        fn missing_accounts_for_every_entry(
            values in proptest::collection::vec(-100.0..100.0f64, 0..50),
            extra in 0usize..20,
        ) {
            let stats = describe(&values, values.len() + extra);
            prop_assert_eq!(stats.count + stats.missing, values.len() + extra);
        }
    }
}
