//! Canonical string form of stored values.
//!
//! Every codec that needs a flat string per key, and [`BodyMap::get_string`](crate::BodyMap::get_string),
//! goes through [`coerce_to_string`]. The rule:
//!
//! | Value | String form |
//! |-------|-------------|
//! | `Null` | `""` |
//! | `String(s)` | `s`, verbatim |
//! | `Number` | shortest decimal text, whole floats without a fraction (`5`, `2.5`, `1e+21`) |
//! | anything else | compact JSON text (`true`, `[1,2]`, `{"a":"b"}`) |
//! | value JSON cannot represent (NaN, ±Infinity anywhere inside) | `""` |
//!
//! Coercion never fails. A value that cannot be serialized is reported as empty, which the
//! XML and URL encoders then skip and [`BodyMap::check_required`](crate::BodyMap::check_required)
//! treats as missing.

use crate::{Number, Value};

/// Returns the canonical string form of `value`.
///
/// # Examples
///
/// ```rust
/// use bodymap::{coerce_to_string, Value};
///
/// assert_eq!(coerce_to_string(&Value::Null), "");
/// assert_eq!(coerce_to_string(&Value::from("a b")), "a b");
/// assert_eq!(coerce_to_string(&Value::from(5)), "5");
/// assert_eq!(coerce_to_string(&Value::from(2.5)), "2.5");
/// assert_eq!(coerce_to_string(&Value::from(10.0)), "10");
/// assert_eq!(coerce_to_string(&Value::from(false)), "false");
/// assert_eq!(coerce_to_string(&Value::from(f64::NAN)), "");
/// ```
#[must_use]
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(Number::Float(f)) if f.is_finite() => format_float(*f),
        other => match serde_json::to_string(other) {
            Ok(text) => text,
            Err(err) => {
                log::debug!("value coerced to empty string: {}", err);
                String::new()
            }
        },
    }
}

/// Plain notation inside `[1e-6, 1e21)`, exponent notation with a signed exponent outside.
fn format_float(f: f64) -> String {
    let abs = f.abs();
    if abs == 0.0 || (1e-6..1e21).contains(&abs) {
        return f.to_string();
    }
    let text = format!("{:e}", f);
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BodyMap, File};

    #[test]
    fn test_strings_are_not_quoted() {
        assert_eq!(coerce_to_string(&Value::from("")), "");
        assert_eq!(coerce_to_string(&Value::from("\"q\"")), "\"q\"");
    }

    #[test]
    fn test_numbers_use_json_text() {
        assert_eq!(coerce_to_string(&Value::from(-17)), "-17");
        assert_eq!(coerce_to_string(&Value::from(0.1)), "0.1");
        assert_eq!(coerce_to_string(&Value::from(u32::MAX)), "4294967295");
    }

    #[test]
    fn test_whole_floats_drop_the_fraction() {
        assert_eq!(coerce_to_string(&Value::from(5.0)), "5");
        assert_eq!(coerce_to_string(&Value::from(-10.0)), "-10");
        assert_eq!(coerce_to_string(&Value::from(0.0)), "0");
        assert_eq!(coerce_to_string(&Value::from(1e20)), "100000000000000000000");
        assert_eq!(coerce_to_string(&Value::from(-106633661.30099145)), "-106633661.30099145");
    }

    #[test]
    fn test_float_exponent_form() {
        assert_eq!(coerce_to_string(&Value::from(1e21)), "1e+21");
        assert_eq!(coerce_to_string(&Value::from(1.5e-7)), "1.5e-7");
        assert_eq!(coerce_to_string(&Value::from(-2e300)), "-2e+300");
        assert_eq!(coerce_to_string(&Value::from(0.000001)), "0.000001");
    }

    #[test]
    fn test_decoded_exponent_reads_as_plain_number() {
        let bm = BodyMap::from_json(r#"{"fee":1e2}"#).unwrap();
        assert_eq!(bm.get_string("fee"), "100");
        assert_eq!(bm.encode_url_params(), "fee=100");
    }

    #[test]
    fn test_structured_values_use_compact_json() {
        let arr = Value::from(vec![Value::from(1), Value::from("x"), Value::Null]);
        assert_eq!(coerce_to_string(&arr), r#"[1,"x",null]"#);

        let mut bm = BodyMap::new();
        bm.set("b", 1).set("a", "2");
        assert_eq!(coerce_to_string(&Value::from(bm)), r#"{"b":1,"a":"2"}"#);

        let file = File::new("f", Vec::new());
        assert_eq!(
            coerce_to_string(&Value::from(file)),
            r#"{"name":"f","content":""}"#
        );
    }

    #[test]
    fn test_nested_non_finite_collapses_whole_value() {
        let mut bm = BodyMap::new();
        bm.set("ok", 1).set("bad", f64::INFINITY);
        assert_eq!(coerce_to_string(&Value::from(bm)), "");
    }
}
