//! Conversion of raw record cells into the typed inputs the engines accept.
//!
//! Records arrive as heterogeneous scalars (numbers, text, booleans, nulls).
//! This module is the single place where they are interpreted: numbers for
//! [`describe`](crate::descriptive::describe), category labels for
//! [`frequencies`](crate::frequency::frequencies), and yes/no flags for
//! [`TwoByTwoTable`].

use crate::table::TwoByTwoTable;

/// One cell of a record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Number(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map_or(Scalar::Null, Into::into)
    }
}

/// Outcome of interpreting a cell as a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerced<T> {
    Value(T),
    /// Null, blank text or NaN.
    Missing,
    /// Present but not a number (e.g. `"abc"`, `true`).
    Unparsable,
}

impl Scalar {
    /// Whether the cell is null or blank text.
    pub fn is_missing(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Text(s) => s.trim().is_empty(),
            Scalar::Number(v) => v.is_nan(),
            Scalar::Bool(_) => false,
        }
    }

    /// Interpret the cell as a finite number.
    pub fn as_number(&self) -> Coerced<f64> {
        match self {
            Scalar::Null => Coerced::Missing,
            Scalar::Number(v) if v.is_nan() => Coerced::Missing,
            Scalar::Number(v) if v.is_finite() => Coerced::Value(*v),
            Scalar::Number(_) => Coerced::Unparsable,
            Scalar::Bool(_) => Coerced::Unparsable,
            Scalar::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Coerced::Missing;
                }
                match s.parse::<f64>() {
                    Ok(v) if v.is_finite() => Coerced::Value(v),
                    _ => Coerced::Unparsable,
                }
            }
        }
    }

    /// The category label of the cell, or `None` when it is missing. Text is
    /// returned as written.
    pub fn as_category(&self) -> Option<String> {
        if self.is_missing() {
            return None;
        }
        match self {
            Scalar::Null => None,
            Scalar::Bool(b) => Some(b.to_string()),
            Scalar::Number(v) => Some(v.to_string()),
            Scalar::Text(s) => Some(s.clone()),
        }
    }

    /// Interpret the cell as a yes/no flag.
    ///
    /// Accepts booleans, the numbers 1 and 0, and (case-insensitive) `yes`,
    /// `no`, `y`, `n`, `true`, `false`, `1`, `0`.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Scalar::Null => None,
            Scalar::Bool(b) => Some(*b),
            Scalar::Number(v) if *v == 1.0 => Some(true),
            Scalar::Number(v) if *v == 0.0 => Some(false),
            Scalar::Number(_) => None,
            Scalar::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "yes" | "y" | "true" | "1" => Some(true),
                "no" | "n" | "false" | "0" => Some(false),
                _ => None,
            },
        }
    }
}

/// A strictly numeric column extracted from raw cells.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumericColumn {
    /// Finite values in original order.
    pub values: Vec<f64>,
    /// Number of cells before filtering.
    pub total: usize,
    /// Null, blank or NaN cells.
    pub missing: usize,
    /// Cells that were present but not numeric.
    pub unparsable: usize,
}

impl NumericColumn {
    pub fn from_scalars(cells: &[Scalar]) -> Self {
        let mut column = NumericColumn {
            values: Vec::with_capacity(cells.len()),
            total: cells.len(),
            ..Default::default()
        };
        for cell in cells {
            match cell.as_number() {
                Coerced::Value(v) => column.values.push(v),
                Coerced::Missing => column.missing += 1,
                Coerced::Unparsable => column.unparsable += 1,
            }
        }
        if column.unparsable > 0 {
            tracing::debug!(
                unparsable = column.unparsable,
                total = column.total,
                "dropped non-numeric cells"
            );
        }
        column
    }

    /// Whether every non-missing cell parsed as a number.
    pub fn is_clean(&self) -> bool {
        self.unparsable == 0
    }
}

impl TwoByTwoTable {
    /// Cross-tabulate an exposure column against an outcome column, row by
    /// row. Rows where either cell is not a recognizable flag are skipped.
    ///
    /// Columns of different lengths are paired up to the shorter one; the
    /// extra rows of the longer column have no counterpart and are ignored.
    pub fn from_scalars(exposure: &[Scalar], outcome: &[Scalar]) -> Self {
        if exposure.len() != outcome.len() {
            tracing::debug!(
                exposure = exposure.len(),
                outcome = outcome.len(),
                "column lengths differ, ignoring unpaired rows"
            );
        }
        let pairs = exposure
            .iter()
            .zip(outcome)
            .filter_map(|(e, o)| Some((e.as_flag()?, o.as_flag()?)));
        Self::from_observations(pairs)
    }
}
