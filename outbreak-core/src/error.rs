//! Structured error types for the outbreak engine.
//!
//! Only caller mistakes are errors. A statistic that cannot be estimated
//! (zero denominator, empty sample) is reported through the result value
//! itself, never through this type.

use thiserror::Error;

/// Unified error type for all outbreak operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OutbreakError {
    /// Argument outside the mathematical domain of a function.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Malformed boundary input (e.g. JSON handed in from the browser).
    #[error("parse error: {0}")]
    Parse(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the outbreak crates.
pub type Result<T> = std::result::Result<T, OutbreakError>;
