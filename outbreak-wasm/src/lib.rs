//! Browser bindings for the outbreak statistics engine.
//!
//! Every public function accepts simple types (`&str`, `u32`) and returns a
//! JSON `String`:
//!
//! - Success: `{"ok": <value>}`
//! - Failure: `{"error": "<message>", "kind": "<kind>"}`
//!
//! `#[wasm_bindgen]` annotations are applied only with the `wasm` feature, so
//! the same functions are callable and testable natively.
//!
//! # Example
//!
//! ```
//! let json = outbreak_wasm::two_by_two(30, 70, 10, 90);
//! let v: serde_json::Value = serde_json::from_str(&json).unwrap();
//! assert!((v["ok"]["risk_ratio"].as_f64().unwrap() - 3.0).abs() < 1e-9);
//! ```

pub mod error;
pub mod stats;

/// Crate version (set from Cargo.toml at compile time).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use stats::{
    compare_groups, describe, fisher_exact, frequencies, two_by_two, two_by_two_from_columns,
    JsColumnStats,
};
