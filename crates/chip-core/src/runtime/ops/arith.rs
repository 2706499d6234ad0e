//! Numeric, string, comparison and miscellaneous scalar operators

use super::args;
use crate::runtime::{Kind, RuntimeError, Value, format_number};
use crate::sequence::Sequence;
use std::cmp::Ordering;

fn numbers(op: &str, operands: &[Value]) -> Result<Vec<f64>, RuntimeError> {
    operands
        .iter()
        .map(|value| {
            value.as_number().ok_or_else(|| {
                RuntimeError::type_error(format!(
                    "invalid use of {op} [] (not all args are numbers)"
                ))
            })
        })
        .collect()
}

fn fold(op: &str, operands: &[Value], f: fn(f64, f64) -> f64) -> Result<Value, RuntimeError> {
    let mut values = numbers(op, operands)?.into_iter();
    let first = values.next().unwrap_or(0.0);
    Ok(Value::Number(values.fold(first, f)))
}

pub fn add(operands: &[Value]) -> Result<Value, RuntimeError> {
    fold("+", operands, |a, b| a + b)
}

pub fn subtract(operands: &[Value]) -> Result<Value, RuntimeError> {
    fold("-", operands, |a, b| a - b)
}

pub fn multiply(operands: &[Value]) -> Result<Value, RuntimeError> {
    fold("*", operands, |a, b| a * b)
}

/// One operand is a reciprocal; a zero anywhere is rejected, including the dividend.
pub fn divide(operands: &[Value]) -> Result<Value, RuntimeError> {
    let values = numbers("/", operands)?;
    if values.contains(&0.0) {
        return Err(RuntimeError::range(
            "invalid operation to / [] (division by zero)",
        ));
    }
    match values.as_slice() {
        [single] => Ok(Value::Number(1.0 / single)),
        [first, rest @ ..] => Ok(Value::Number(rest.iter().fold(*first, |acc, x| acc / x))),
        [] => Ok(Value::Void),
    }
}

/// Remainder takes the sign of the dividend.
pub fn remainder(operands: &[Value]) -> Result<Value, RuntimeError> {
    numbers("%", operands)?;
    let dividend = args::number("%", operands, 0)?;
    let divisor = args::number("%", operands, 1)?;
    Ok(Value::Number(dividend % divisor))
}

pub fn round(operands: &[Value]) -> Result<Value, RuntimeError> {
    numbers("|", operands)?;
    let value = args::number("|", operands, 0)?;
    let digits = if operands.len() > 1 {
        args::number("|", operands, 1)?
    } else {
        0.0
    };
    if !(0.0..=100.0).contains(&digits) || digits.fract() != 0.0 {
        return Err(RuntimeError::range(format!(
            "second argument of | [] must be an integer between 0 and 100 but got {}",
            format_number(digits)
        )));
    }
    let factor = 10f64.powi(digits as i32);
    Ok(Value::Number((value * factor).round() / factor))
}

pub fn concat(operands: &[Value]) -> Result<Value, RuntimeError> {
    let mut out = String::new();
    for value in operands {
        match value {
            Value::String(s) => out.push_str(s),
            _ => {
                return Err(RuntimeError::type_error(
                    "invalid use of ~ [] (not all args are strings)",
                ));
            }
        }
    }
    Ok(Value::String(out))
}

pub fn not(operands: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::bool(!args::arg("!", operands, 0)?.is_truthy()))
}

pub fn equal(operands: &[Value]) -> Result<Value, RuntimeError> {
    let (first, rest) = split("==", operands)?;
    Ok(Value::bool(rest.iter().all(|x| first.scalar_eq(x))))
}

pub fn not_equal(operands: &[Value]) -> Result<Value, RuntimeError> {
    let (first, rest) = split("!=", operands)?;
    Ok(Value::bool(rest.iter().all(|x| !first.scalar_eq(x))))
}

fn split<'a>(op: &str, operands: &'a [Value]) -> Result<(&'a Value, &'a [Value]), RuntimeError> {
    operands
        .split_first()
        .ok_or_else(|| RuntimeError::range(format!("missing first argument of {op} []")))
}

/// Ordering between two operands of the same comparable kind.
fn order(op: &str, a: &Value, b: &Value) -> Result<Option<Ordering>, RuntimeError> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Ok(Some(a.cmp(b))),
        _ => match (a.as_number(), b.as_number()) {
            (Some(a), Some(b)) => Ok(a.partial_cmp(&b)),
            _ => Err(RuntimeError::type_error(format!(
                "invalid use of {op} [] (cannot compare {} with {})",
                a.kind(),
                b.kind()
            ))),
        },
    }
}

fn compare(
    op: &str,
    operands: &[Value],
    holds: fn(Ordering) -> bool,
) -> Result<Value, RuntimeError> {
    let (first, rest) = split(op, operands)?;
    let mut all = true;
    for other in rest {
        // NaN compares false against everything
        all &= order(op, first, other)?.is_some_and(holds);
    }
    Ok(Value::bool(all))
}

pub fn less(operands: &[Value]) -> Result<Value, RuntimeError> {
    compare("<", operands, Ordering::is_lt)
}

pub fn greater(operands: &[Value]) -> Result<Value, RuntimeError> {
    compare(">", operands, Ordering::is_gt)
}

pub fn less_equal(operands: &[Value]) -> Result<Value, RuntimeError> {
    compare("<=", operands, Ordering::is_le)
}

pub fn greater_equal(operands: &[Value]) -> Result<Value, RuntimeError> {
    compare(">=", operands, Ordering::is_ge)
}

/// Wraps a value in a one-element sequence before structural comparison.
fn sequence_cast(value: &Value) -> Value {
    Value::sequence(Sequence::from_vec(vec![value.clone()]))
}

pub fn deep_equal(operands: &[Value]) -> Result<Value, RuntimeError> {
    let (first, rest) = split("===", operands)?;
    let first = sequence_cast(first);
    Ok(Value::bool(
        rest.iter().all(|x| first.deep_eq(&sequence_cast(x))),
    ))
}

pub fn deep_not_equal(operands: &[Value]) -> Result<Value, RuntimeError> {
    let (first, rest) = split("!==", operands)?;
    let first = sequence_cast(first);
    Ok(Value::bool(
        rest.iter().all(|x| !first.deep_eq(&sequence_cast(x))),
    ))
}

pub fn assert(operands: &[Value]) -> Result<Value, RuntimeError> {
    if args::arg("!throw", operands, 0)?.is_truthy() {
        return Ok(Value::Void);
    }
    let message = operands
        .get(1)
        .map(Value::to_string)
        .unwrap_or_else(|| "assertion".to_string());
    Err(RuntimeError::assertion(format!("{message} failed!")))
}

pub fn same_kind(operands: &[Value]) -> Result<Value, RuntimeError> {
    let (first, rest) = split("?==", operands)?;
    let kind = |v: &Value| match v.kind() {
        Kind::Void => Kind::Number,
        other => other,
    };
    let expected = kind(first);
    Ok(Value::bool(rest.iter().all(|x| kind(x) == expected)))
}

/// String to number (blank is zero, malformed is NaN), number to string, Void to zero.
pub fn cast(operands: &[Value]) -> Result<Value, RuntimeError> {
    match args::arg("`", operands, 0)? {
        Value::String(s) => Ok(Value::Number(parse_number(s))),
        Value::Number(n) => Ok(Value::String(format_number(*n))),
        Value::Void => Ok(Value::Number(0.0)),
        other => Err(RuntimeError::type_error(format!(
            "can only cast number or string at ` [] but got {}",
            other.kind()
        ))),
    }
}

pub fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    match text {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')) =>
        {
            text.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

pub fn apply(operands: &[Value]) -> Result<Value, RuntimeError> {
    let callback = args::function("=>", operands, 1)?;
    callback.call(std::slice::from_ref(args::arg("=>", operands, 0)?))
}

/// Calls the callback with `0..n`, returning the last result.
pub fn repeat(operands: &[Value]) -> Result<Value, RuntimeError> {
    let n = args::number("*loop", operands, 0)?;
    let callback = args::function("*loop", operands, 1)?;
    let mut out = Value::Void;
    let mut i = 0.0;
    while i < n {
        out = callback.call(&[Value::Number(i)])?;
        i += 1.0;
    }
    Ok(out)
}
