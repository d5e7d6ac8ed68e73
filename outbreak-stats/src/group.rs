//! Association between a categorical grouping and a binary outcome.
//!
//! [`tabulate_groups`] is the explicit group-by step: it turns `(label,
//! outcome)` observations into ordered [`GroupCounts`]. [`compare_groups`]
//! then reports per-group proportions and an R×2 chi-square test.

use std::collections::HashMap;

use crate::chisq::{chi_square_r_by_2, ChiSquareResult};

/// Outcome counts for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupCounts {
    pub label: String,
    /// Members with the outcome.
    pub positive: u64,
    /// Members without the outcome.
    pub negative: u64,
}

impl GroupCounts {
    pub fn new(label: impl Into<String>, positive: u64, negative: u64) -> Self {
        Self {
            label: label.into(),
            positive,
            negative,
        }
    }

    /// Group size, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.positive.saturating_add(self.negative)
    }

    /// positive / total, or 0 for an empty group.
    pub fn proportion(&self) -> f64 {
        let total = self.positive as f64 + self.negative as f64;
        if total == 0.0 {
            0.0
        } else {
            self.positive as f64 / total
        }
    }
}

/// Per-group row of a [`GroupComparisonResult`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupSummary {
    pub label: String,
    pub positive: u64,
    pub negative: u64,
    pub total: u64,
    /// positive / total, or 0 for an empty group.
    pub proportion: f64,
}

/// Outcome proportions by group plus the aggregate chi-square test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupComparisonResult {
    pub groups: Vec<GroupSummary>,
    /// `None` with fewer than two groups or no observations.
    pub chi_square: Option<ChiSquareResult>,
}

/// Group `(label, outcome)` observations into counts, preserving the order
/// in which each label first appears.
pub fn tabulate_groups<I, S>(observations: I) -> Vec<GroupCounts>
where
    I: IntoIterator<Item = (S, bool)>,
    S: AsRef<str>,
{
    let mut groups: Vec<GroupCounts> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (label, outcome) in observations {
        let label = label.as_ref();
        let slot = match index.get(label) {
            Some(&i) => i,
            None => {
                index.insert(label.to_owned(), groups.len());
                groups.push(GroupCounts::new(label, 0, 0));
                groups.len() - 1
            }
        };
        if outcome {
            groups[slot].positive += 1;
        } else {
            groups[slot].negative += 1;
        }
    }

    groups
}

/// Compare outcome proportions across groups.
pub fn compare_groups(groups: &[GroupCounts]) -> GroupComparisonResult {
    let summaries = groups
        .iter()
        .map(|g| GroupSummary {
            label: g.label.clone(),
            positive: g.positive,
            negative: g.negative,
            total: g.total(),
            proportion: g.proportion(),
        })
        .collect();

    let rows: Vec<[u64; 2]> = groups.iter().map(|g| [g.positive, g.negative]).collect();

    GroupComparisonResult {
        groups: summaries,
        chi_square: chi_square_r_by_2(&rows),
    }
}
