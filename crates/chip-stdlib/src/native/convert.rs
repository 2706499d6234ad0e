//! CONVERT: conversions between value kinds

use super::helpers::{arg, items, module, native, number_or, strings, text};
use super::math::{parse_integer, round};
use chip_core::runtime::ops::arith::parse_number;
use chip_core::runtime::{RuntimeError, Value};

const NAME: &str = "CONVERT";

/// Most decimal places `float` rounds to.
const MAX_DIGITS: f64 = 100.0;

pub fn module_value() -> Value {
    module(
        NAME,
        vec![
            ("array", native(NAME, "array", array)),
            ("boolean", native(NAME, "boolean", boolean)),
            ("string", native(NAME, "string", string)),
            ("integer", native(NAME, "integer", integer)),
            ("float", native(NAME, "float", float)),
            ("number", native(NAME, "number", number)),
        ],
    )
}

fn numeric(value: &Value) -> f64 {
    match value {
        Value::String(s) => parse_number(s),
        Value::Number(n) => *n,
        Value::Void => 0.0,
        _ => f64::NAN,
    }
}

/// Strings split into characters, sequences are copied, maps become `.:[key; value]`
/// pairs.
pub fn array(args: &[Value]) -> Result<Value, RuntimeError> {
    match arg("array", args, 0)? {
        Value::String(s) => Ok(strings(s.chars().map(String::from))),
        Value::Sequence(seq) => Ok(Value::from(items(seq))),
        Value::Map(map) => Ok(Value::from(
            map.borrow()
                .iter()
                .map(|(key, value)| Value::from(vec![Value::from(key), value.clone()]))
                .collect::<Vec<_>>(),
        )),
        other => Err(RuntimeError::type_error(format!(
            "array [] cannot spread a {}",
            other.kind()
        ))),
    }
}

pub fn boolean(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::bool(arg("boolean", args, 0)?.is_truthy()))
}

pub fn string(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::String(text(arg("string", args, 0)?)))
}

/// Leading base-10 integer of the value's text form.
pub fn integer(args: &[Value]) -> Result<Value, RuntimeError> {
    let input = text(arg("integer", args, 0)?);
    Ok(Value::Number(parse_integer(&input, 10)))
}

/// Rounds to `digits` decimal places (one when left out).
pub fn float(args: &[Value]) -> Result<Value, RuntimeError> {
    let n = numeric(arg("float", args, 0)?);
    let digits = number_or("float", args, 1, 1.0)?;
    if !(0.0..=MAX_DIGITS).contains(&digits) || digits.fract() != 0.0 {
        return Err(RuntimeError::range(format!(
            "float [] digits must be an integer between 0 and {MAX_DIGITS} but got {digits}"
        )));
    }
    if !n.is_finite() {
        return Ok(Value::Number(n));
    }
    let scale = 10f64.powf(digits);
    let scaled = n * scale;
    if !scaled.is_finite() {
        return Ok(Value::Number(n));
    }
    Ok(Value::Number(round(scaled) / scale))
}

pub fn number(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Number(numeric(arg("number", args, 0)?)))
}
