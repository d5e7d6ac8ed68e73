//! Outbreak analyses with JSON input/output.
//!
//! The result types of `outbreak-stats` derive `Serialize` through its `serde`
//! feature, so most functions hand them straight to the envelope. Only the
//! column summary needs a wrapper (`JsColumnStats`) to carry the coercion
//! counts next to the statistics.

use serde::Serialize;

use outbreak_core::{OutbreakError, Result};
use outbreak_stats::{
    DenominatorPolicy, DescriptiveStats, GroupCounts, NumericColumn, Scalar, TwoByTwoTable,
};

use crate::error::{wasm_ok, wasm_result};

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

// ── Wrapper types ────────────────────────────────────────────────────────

/// Descriptive statistics of a raw column plus how many cells were not
/// numbers.
#[derive(Debug, Serialize)]
pub struct JsColumnStats {
    #[serde(flatten)]
    pub stats: DescriptiveStats,
    /// Cells that were present but not numeric (already included in
    /// `missing`).
    pub unparsable: usize,
}

// ── JSON parsing ─────────────────────────────────────────────────────────

fn parse_scalars(json: &str) -> Result<Vec<Scalar>> {
    serde_json::from_str::<Vec<Scalar>>(json)
        .map_err(|e| OutbreakError::Parse(format!("invalid JSON array: {e}")))
}

fn parse_policy(policy: &str) -> Result<DenominatorPolicy> {
    match policy {
        "valid" => Ok(DenominatorPolicy::ValidOnly),
        "total" => Ok(DenominatorPolicy::IncludingMissing),
        other => Err(OutbreakError::InvalidArgument(format!(
            "unknown denominator policy {other:?}, expected \"valid\" or \"total\""
        ))),
    }
}

fn table(a: u32, b: u32, c: u32, d: u32) -> TwoByTwoTable {
    TwoByTwoTable::new(a.into(), b.into(), c.into(), d.into())
}

// ── JSON boundary functions ──────────────────────────────────────────────

/// Full 2×2 analysis of exposed ill `a`, exposed well `b`, unexposed ill `c`
/// and unexposed well `d`.
#[cfg_attr(feature = "wasm", wasm_bindgen)]
pub fn two_by_two(a: u32, b: u32, c: u32, d: u32) -> String {
    wasm_ok(&outbreak_stats::analyze(&table(a, b, c, d)))
}

/// 2×2 analysis built from two JSON arrays of yes/no cells, paired by row.
///
/// Input: `'["yes","no",null]'`, `'[true,false,true]'`.
#[cfg_attr(feature = "wasm", wasm_bindgen)]
pub fn two_by_two_from_columns(exposure_json: &str, outcome_json: &str) -> String {
    wasm_result(parse_scalars(exposure_json).and_then(|exposure| {
        let outcome = parse_scalars(outcome_json)?;
        let t = TwoByTwoTable::from_scalars(&exposure, &outcome);
        Ok(outbreak_stats::analyze(&t))
    }))
}

/// Two-tailed Fisher exact p-value; `null` when the table holds more than
/// 100 observations.
#[cfg_attr(feature = "wasm", wasm_bindgen)]
pub fn fisher_exact(a: u32, b: u32, c: u32, d: u32) -> String {
    wasm_ok(&outbreak_stats::fisher_exact(&table(a, b, c, d)))
}

/// Descriptive statistics of a JSON array of raw cells.
///
/// Input: `'[1, "2.5", null, "n/a"]'`. Output: JSON `JsColumnStats`.
#[cfg_attr(feature = "wasm", wasm_bindgen)]
pub fn describe(values_json: &str) -> String {
    wasm_result(parse_scalars(values_json).map(|cells| {
        let column = NumericColumn::from_scalars(&cells);
        JsColumnStats {
            stats: outbreak_stats::describe_column(&column),
            unparsable: column.unparsable,
        }
    }))
}

/// Frequency table of a JSON array of raw cells. `policy` is `"valid"` (share
/// of non-missing values) or `"total"` (share of all values).
#[cfg_attr(feature = "wasm", wasm_bindgen)]
pub fn frequencies(values_json: &str, policy: &str) -> String {
    wasm_result(parse_policy(policy).and_then(|policy| {
        let cells = parse_scalars(values_json)?;
        Ok(outbreak_stats::frequencies_of_scalars(&cells, policy))
    }))
}

/// Compare outcome proportions across groups.
///
/// Input: `'[{"label":"A","positive":3,"negative":7}, ...]'`.
#[cfg_attr(feature = "wasm", wasm_bindgen)]
pub fn compare_groups(groups_json: &str) -> String {
    let groups = serde_json::from_str::<Vec<GroupCounts>>(groups_json)
        .map_err(|e| OutbreakError::Parse(format!("invalid group counts: {e}")));
    wasm_result(groups.map(|groups| outbreak_stats::compare_groups(&groups)))
}

// ── Tests ────────────────────────────────────────────────────────────────
