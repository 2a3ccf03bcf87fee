//! Numeric coercion for loosely typed JSON payloads.
//!
//! NSE's APIs mix real numbers with numbers quoted as strings (`"1234.5"`),
//! often within the same object. [`normalize`] walks a value and turns every
//! numeric-looking string into a number so downstream code sees one shape.

use serde_json::{Map, Number, Value};

pub const DEFAULT_ROUND_DIGITS: u32 = 2;

/// Returns a copy of `value` with numeric strings converted to numbers.
///
/// Strings are parsed as integers first, then as floats (rounded to
/// `round_digits`); anything else is left untouched. Existing floats are
/// re-rounded. Integers, booleans, null and object keys never change.
/// Thousands separators are not understood: `"1,000"` stays a string.
pub fn normalize(value: &Value, round_digits: u32) -> Value {
    match value {
        Value::Object(map) => {
            let normalized: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), normalize(v, round_digits)))
                .collect();
            Value::Object(normalized)
        }
        Value::Array(items) => {
            Value::Array(items.iter().map(|v| normalize(v, round_digits)).collect())
        }
        Value::String(s) => parse_numeric(s, round_digits).unwrap_or_else(|| value.clone()),
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) => float_value(round_to(f, round_digits)).unwrap_or_else(|| value.clone()),
            None => value.clone(),
        },
        Value::Number(_) | Value::Bool(_) | Value::Null => value.clone(),
    }
}

/// [`normalize`] with two decimal places.
pub fn normalize_default(value: &Value) -> Value {
    normalize(value, DEFAULT_ROUND_DIGITS)
}

fn parse_numeric(s: &str, round_digits: u32) -> Option<Value> {
    let trimmed = s.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Value::Number(i.into()));
    }
    if let Ok(u) = trimmed.parse::<u64>() {
        return Some(Value::Number(u.into()));
    }
    // "nan" and "inf" parse as f64 but have no JSON representation
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(|f| float_value(round_to(f, round_digits)))
}

fn float_value(f: f64) -> Option<Value> {
    Number::from_f64(f).map(Value::Number)
}

/// Rounds via fixed-precision formatting so that 456.789 becomes exactly
/// 456.79 rather than 456.78999999999996.
pub fn round_to(f: f64, digits: u32) -> f64 {
    if !f.is_finite() {
        return f;
    }
    format!("{:.*}", digits as usize, f).parse().unwrap_or(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_flat_object() {
        let input = json!({"a": "10", "b": "10.0", "c": "text", "d": true, "e": null});
        assert_eq!(
            normalize_default(&input),
            json!({"a": 10, "b": 10.0, "c": "text", "d": true, "e": null})
        );
    }

    #[test]
    fn converts_array_and_rounds_floats() {
        let input = json!(["123", "456.789", "abc", 789, 123.456]);
        assert_eq!(
            normalize(&input, 2),
            json!([123, 456.79, "abc", 789, 123.46])
        );
    }

    #[test]
    fn recurses_into_nested_containers() {
        let input = json!({"outer": {"n": "5"}});
        assert_eq!(normalize_default(&input), json!({"outer": {"n": 5}}));

        let deep = json!({"a": [{"b": ["1", {"c": "2.556"}]}]});
        assert_eq!(
            normalize_default(&deep),
            json!({"a": [{"b": [1, {"c": 2.56}]}]})
        );
    }

    #[test]
    fn empty_containers_keep_their_kind() {
        assert_eq!(normalize_default(&json!({})), json!({}));
        assert_eq!(normalize_default(&json!([])), json!([]));
    }

    #[test]
    fn thousands_separator_is_left_alone() {
        assert_eq!(normalize_default(&json!("1,000")), json!("1,000"));
    }

    #[test]
    fn non_finite_strings_stay_strings() {
        assert_eq!(normalize_default(&json!("NaN")), json!("NaN"));
        assert_eq!(normalize_default(&json!("inf")), json!("inf"));
    }

    #[test]
    fn negative_and_signed_numbers() {
        let input = json!(["-3", "+4", "-0.127", " 7 "]);
        assert_eq!(normalize(&input, 2), json!([-3, 4, -0.13, 7]));
    }

    #[test]
    fn oversized_integer_falls_back_to_float() {
        let input = json!("123456789012345678901234567890");
        let out = normalize_default(&input);
        assert!(out.is_f64());
        assert!((out.as_f64().unwrap() - 1.2345678901234568e29).abs() < 1e15);
    }

    #[test]
    fn custom_round_digits() {
        assert_eq!(normalize(&json!("3.14159"), 3), json!(3.142));
        assert_eq!(normalize(&json!(2.7), 0), json!(3.0));
    }

    #[test]
    fn input_is_not_mutated() {
        let input = json!({"a": "1", "b": ["2.5"]});
        let snapshot = input.clone();
        let _ = normalize_default(&input);
        assert_eq!(input, snapshot);
    }

    #[test]
    fn idempotent_at_target_precision() {
        let input = json!({
            "p": "12.34",
            "q": ["1", "2.5", "x", false, null, {"r": 0.75}],
            "s": 99
        });
        let once = normalize_default(&input);
        assert_eq!(normalize_default(&once), once);
    }

    #[test]
    fn keys_are_untouched() {
        let input = json!({"10": "20"});
        assert_eq!(normalize_default(&input), json!({"10": 20}));
    }
}
