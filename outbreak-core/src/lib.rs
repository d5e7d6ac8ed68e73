//! Shared primitives for the outbreak analysis engine.
//!
//! `outbreak-core` provides the foundation the other crates build on:
//!
//! - **Error types** — [`OutbreakError`] and [`Result`] for structured error handling
//! - **Traits** — [`Summarizable`] and [`Scored`], implemented by result types

pub mod error;
pub mod traits;

pub use error::{OutbreakError, Result};
pub use traits::*;
