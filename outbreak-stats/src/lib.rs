//! Statistical engine for outbreak investigations.
//!
//! - **2×2 analysis** — attack rates, risk ratio, odds ratio, risk difference,
//!   attributable-risk percent with confidence intervals ([`two_by_two`])
//! - **Significance tests** — Yates chi-square, R×2 chi-square ([`chisq`]) and
//!   Fisher's exact test ([`fisher`])
//! - **Group comparison** — outcome proportions across many groups ([`group`])
//! - **Descriptive statistics** — mean, median, mode, quartiles ([`descriptive`])
//! - **Frequencies** — category counts under an explicit denominator policy
//!   ([`frequency`])
//! - **Special functions** — log-gamma, incomplete gamma, hypergeometric PMF
//!   ([`special`])
//! - **Coercion** — raw record cells to typed engine inputs ([`coerce`])
//!
//! Every function is a pure computation over its arguments; nothing is cached
//! or retained between calls.

pub mod chisq;
pub mod coerce;
pub mod descriptive;
pub mod fisher;
pub mod frequency;
pub mod group;
pub mod special;
pub mod table;
pub mod two_by_two;

pub use chisq::{chi_square_r_by_2, yates_chi_square, ChiSquareResult};
pub use coerce::{Coerced, NumericColumn, Scalar};
pub use descriptive::{describe, describe_column, percentile, DescriptiveStats};
pub use fisher::{fisher_exact, fisher_exact_within, FISHER_ENUMERATION_LIMIT, FISHER_MAX_TOTAL};
pub use frequency::{
    frequencies, frequencies_of_scalars, DenominatorPolicy, FrequencyItem, FrequencyTable,
};
pub use group::{
    compare_groups, tabulate_groups, GroupComparisonResult, GroupCounts, GroupSummary,
};
pub use table::{ConfidenceInterval, TwoByTwoTable};
pub use two_by_two::{analyze, analyze_with, TwoByTwoOptions, TwoByTwoResult};
