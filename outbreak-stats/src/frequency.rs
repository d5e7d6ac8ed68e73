//! Category frequency tables.
//!
//! [`frequencies`] counts each distinct non-missing value, orders categories
//! by descending count, and reports percent and cumulative percent against a
//! denominator chosen explicitly through [`DenominatorPolicy`].

use std::collections::HashMap;

use outbreak_core::Summarizable;

use crate::coerce::Scalar;

/// Which total the percentages are relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DenominatorPolicy {
    /// Non-missing values only; percentages sum to 100.
    ValidOnly,
    /// Every value including missing ones; percentages sum to the valid share.
    IncludingMissing,
}

/// One category of a [`FrequencyTable`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrequencyItem {
    pub value: String,
    pub count: usize,
    pub percent: f64,
    pub cumulative_count: usize,
    pub cumulative_percent: f64,
}

/// Frequency distribution of a categorical column.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrequencyTable {
    /// Categories by descending count; ties keep first-appearance order.
    pub items: Vec<FrequencyItem>,
    /// Number of non-missing values.
    pub valid: usize,
    /// Number of null or blank values.
    pub missing: usize,
    /// The count percentages were computed against.
    pub denominator: usize,
    pub policy: DenominatorPolicy,
}

impl FrequencyTable {
    /// Number of distinct categories.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a category by its label.
    pub fn get(&self, value: &str) -> Option<&FrequencyItem> {
        self.items.iter().find(|item| item.value == value)
    }
}

impl Summarizable for FrequencyTable {
    fn summary(&self) -> String {
        format!(
            "{} categories, valid={}, missing={}, denominator={}",
            self.items.len(),
            self.valid,
            self.missing,
            self.denominator,
        )
    }
}

/// Build a frequency table from raw values. `None` and blank (empty or
/// whitespace-only) strings are missing. Every other value is counted under
/// its exact text, so `" A"` and `"A"` are different categories.
pub fn frequencies<I, S>(values: I, policy: DenominatorPolicy) -> FrequencyTable
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut missing = 0;

    for value in values {
        let label = match value.as_ref().map(|s| s.as_ref()) {
            Some(s) if !s.trim().is_empty() => s,
            _ => {
                missing += 1;
                continue;
            }
        };
        match index.get(label) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(label.to_owned(), counts.len());
                counts.push((label.to_owned(), 1));
            }
        }
    }

    // Stable sort keeps first-appearance order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let valid: usize = counts.iter().map(|(_, c)| c).sum();
    let denominator = match policy {
        DenominatorPolicy::ValidOnly => valid,
        DenominatorPolicy::IncludingMissing => valid + missing,
    };
    let percent_of = |count: usize| {
        if denominator == 0 {
            0.0
        } else {
            count as f64 / denominator as f64 * 100.0
        }
    };

    let mut cumulative_count = 0;
    let items = counts
        .into_iter()
        .map(|(value, count)| {
            cumulative_count += count;
            FrequencyItem {
                value,
                count,
                percent: percent_of(count),
                cumulative_count,
                cumulative_percent: percent_of(cumulative_count),
            }
        })
        .collect();

    FrequencyTable {
        items,
        valid,
        missing,
        denominator,
        policy,
    }
}

/// Frequency table over raw record cells, using [`Scalar::as_category`].
pub fn frequencies_of_scalars(cells: &[Scalar], policy: DenominatorPolicy) -> FrequencyTable {
    frequencies(cells.iter().map(Scalar::as_category), policy)
}
