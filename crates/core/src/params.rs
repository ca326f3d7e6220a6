//! Typed extraction of scene parameters from a JSON object.
//!
//! Scenes accept a free-form `serde_json::Value` (from the CLI, a seed file,
//! or the browser host). Numeric and boolean lookups fall back to a default
//! when the key is missing or has the wrong type. Colors are stricter: a
//! present-but-unparsable color is reported, since silently replacing a
//! typo'd color is more confusing than an error.

use serde_json::Value;

use crate::color::Srgb;
use crate::error::FolioError;

/// `params[name]` as `f64`, or `default` if missing, non-numeric, or not finite.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params
        .get(name)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// `params[name]` as `usize`, or `default` if missing or not a non-negative integer.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

/// `params[name]` parsed as a hex color.
///
/// Missing key → `default`. Present but not a valid hex string →
/// `FolioError::ParamTypeMismatch`.
pub fn param_color(params: &Value, name: &str, default: Srgb) -> Result<Srgb, FolioError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::String(s)) => Srgb::from_hex(s).map_err(|e| FolioError::ParamTypeMismatch {
            name: name.to_owned(),
            expected: "hex color".to_owned(),
            got: e.to_string(),
        }),
        Some(other) => Err(FolioError::ParamTypeMismatch {
            name: name.to_owned(),
            expected: "hex color".to_owned(),
            got: json_type_name(other).to_owned(),
        }),
    }
}

/// Short JSON type label for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_f64_reads_float_and_integer() {
        let params = json!({"link_distance": 120.5, "count": 40});
        assert!((param_f64(&params, "link_distance", 80.0) - 120.5).abs() < f64::EPSILON);
        assert!((param_f64(&params, "count", 0.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_defaults_on_missing_or_wrong_type() {
        let params = json!({"damping": "soft"});
        assert!((param_f64(&params, "damping", 0.8) - 0.8).abs() < f64::EPSILON);
        assert!((param_f64(&params, "clock_step", 0.005) - 0.005).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_defaults_for_non_object() {
        let params = json!([1, 2, 3]);
        assert!((param_f64(&params, "damping", 0.8) - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn param_usize_rejects_negative_and_fractional() {
        let params = json!({"a": -3, "b": 2.5, "c": 12});
        assert_eq!(param_usize(&params, "a", 30), 30);
        assert_eq!(param_usize(&params, "b", 30), 30);
        assert_eq!(param_usize(&params, "c", 30), 12);
    }

    #[test]
    fn param_bool_and_string() {
        let params = json!({"wrap": true, "mode": "elapsed", "n": 1});
        assert!(param_bool(&params, "wrap", false));
        assert!(!param_bool(&params, "n", false));
        assert_eq!(param_string(&params, "mode", "per_frame"), "elapsed");
        assert_eq!(param_string(&params, "missing", "per_frame"), "per_frame");
    }

    #[test]
    fn param_color_missing_uses_default() {
        let c = param_color(&json!({}), "color", Srgb::WHITE).unwrap();
        assert_eq!(c, Srgb::WHITE);
    }

    #[test]
    fn param_color_parses_hex() {
        let c = param_color(&json!({"color": "#06b6d4"}), "color", Srgb::WHITE).unwrap();
        assert_eq!(c.to_rgb8(), [6, 182, 212]);
    }

    #[test]
    fn param_color_reports_bad_string() {
        let err = param_color(&json!({"color": "teal"}), "color", Srgb::WHITE).unwrap_err();
        assert!(matches!(err, FolioError::ParamTypeMismatch { ref name, .. } if name == "color"));
    }

    #[test]
    fn param_color_reports_wrong_type() {
        let err = param_color(&json!({"color": 42}), "color", Srgb::WHITE).unwrap_err();
        assert!(err.to_string().contains("number"));
    }
}
