//! JSON result envelope for the WASM boundary.
//!
//! Every public function in `outbreak-wasm` returns a `String` containing JSON:
//!
//! - success: `{"ok": <value>}`
//! - failure: `{"error": "<message>", "kind": "<kind>"}`
//!
//! `kind` names the [`OutbreakError`] variant (`invalid_argument`, `parse` or
//! `other`) so the presentation layer can tell a malformed upload from a bad
//! option without matching on message text.
//!
//! Non-finite floats (an undefined ratio, the statistics of an empty column)
//! serialize as `null`, which the presentation layer renders as "Undefined".

use std::fmt::Display;

use outbreak_core::OutbreakError;
use serde::Serialize;

#[derive(Serialize)]
struct OkEnvelope<'a, T: Serialize> {
    ok: &'a T,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: String,
    kind: &'a str,
}

/// Stable machine-readable name of an error variant.
pub fn error_kind(err: &OutbreakError) -> &'static str {
    match err {
        OutbreakError::InvalidArgument(_) => "invalid_argument",
        OutbreakError::Parse(_) => "parse",
        OutbreakError::Other(_) => "other",
    }
}

/// Serialize a success value as `{"ok": val}`.
pub fn wasm_ok<T: Serialize>(val: &T) -> String {
    serde_json::to_string(&OkEnvelope { ok: val }).unwrap_or_else(wasm_err)
}

/// Serialize an engine error with its kind.
pub fn wasm_error(err: &OutbreakError) -> String {
    envelope(err.to_string(), error_kind(err))
}

/// Serialize a free-form failure as kind `other`.
pub fn wasm_err(msg: impl Display) -> String {
    envelope(msg.to_string(), "other")
}

fn envelope(error: String, kind: &str) -> String {
    serde_json::to_string(&ErrorEnvelope { error, kind })
        .unwrap_or_else(|_| r#"{"error":"serialization failed","kind":"other"}"#.into())
}

/// Map an `outbreak_core::Result<T>` into the JSON envelope.
pub fn wasm_result<T: Serialize>(r: outbreak_core::Result<T>) -> String {
    match r {
        Ok(val) => wasm_ok(&val),
        Err(e) => wasm_error(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> serde_json::Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn ok_wraps_value() {
        let v = parse(&wasm_ok(&42));
        assert_eq!(v["ok"], 42);
        assert!(v.get("error").is_none());
    }

    #[test]
    fn non_finite_becomes_null() {
        let v = parse(&wasm_ok(&[1.0, f64::INFINITY, f64::NAN]));
        assert_eq!(v["ok"][0], 1.0);
        assert!(v["ok"][1].is_null());
        assert!(v["ok"][2].is_null());
    }

    #[test]
    fn error_carries_kind() {
        let v = parse(&wasm_error(&OutbreakError::Parse("bad json".into())));
        assert_eq!(v["kind"], "parse");
        assert!(v["error"].as_str().unwrap().contains("bad json"));

        let v = parse(&wasm_error(&OutbreakError::InvalidArgument("policy".into())));
        assert_eq!(v["kind"], "invalid_argument");
    }

    #[test]
    fn free_form_error_is_other() {
        let v = parse(&wasm_err("something broke"));
        assert_eq!(v["error"], "something broke");
        assert_eq!(v["kind"], "other");
    }

    #[test]
    fn result_maps_both_arms() {
        let ok: outbreak_core::Result<u64> = Ok(7);
        assert_eq!(parse(&wasm_result(ok))["ok"], 7);

        let err: outbreak_core::Result<u64> =
            Err(OutbreakError::InvalidArgument("bad".into()));
        let v = parse(&wasm_result(err));
        assert_eq!(v["kind"], "invalid_argument");
        assert!(v["error"].as_str().unwrap().contains("bad"));
    }
}
