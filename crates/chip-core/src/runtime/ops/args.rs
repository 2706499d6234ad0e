//! Operand extraction with the operator-specific error messages

use crate::runtime::{Function, MapRef, RuntimeError, SeqRef, Value};

fn ordinal(i: usize) -> String {
    match i {
        0 => "first".to_string(),
        1 => "second".to_string(),
        2 => "third".to_string(),
        n => format!("argument {}", n + 1),
    }
}

pub(crate) fn mismatch(op: &str, i: usize, expected: &str, found: &Value) -> RuntimeError {
    RuntimeError::type_error(format!(
        "{} of {op} [] must be {expected} but got {}",
        ordinal(i),
        found.kind()
    ))
}

pub(crate) fn arg<'a>(op: &str, args: &'a [Value], i: usize) -> Result<&'a Value, RuntimeError> {
    args.get(i)
        .ok_or_else(|| RuntimeError::range(format!("missing {} of {op} []", ordinal(i))))
}

pub(crate) fn number(op: &str, args: &[Value], i: usize) -> Result<f64, RuntimeError> {
    let value = arg(op, args, i)?;
    value
        .as_number()
        .ok_or_else(|| mismatch(op, i, "a number", value))
}

pub(crate) fn integer(op: &str, args: &[Value], i: usize) -> Result<i64, RuntimeError> {
    let value = arg(op, args, i)?;
    match value.as_number() {
        Some(n) if n.is_finite() && n.fract() == 0.0 => Ok(n as i64),
        _ => Err(mismatch(op, i, "an integer", value)),
    }
}

/// A non-negative integer count or size.
pub(crate) fn count(op: &str, args: &[Value], i: usize) -> Result<usize, RuntimeError> {
    let n = integer(op, args, i)?;
    usize::try_from(n).map_err(|_| {
        RuntimeError::range(format!("{} of {op} [] must be >= 0 but got {n}", ordinal(i)))
    })
}

pub(crate) fn string<'a>(op: &str, args: &'a [Value], i: usize) -> Result<&'a str, RuntimeError> {
    match arg(op, args, i)? {
        Value::String(s) => Ok(s),
        other => Err(mismatch(op, i, "a string", other)),
    }
}

pub(crate) fn sequence(op: &str, args: &[Value], i: usize) -> Result<SeqRef, RuntimeError> {
    match arg(op, args, i)? {
        Value::Sequence(seq) => Ok(seq.clone()),
        other => Err(mismatch(op, i, "an .: []", other)),
    }
}

pub(crate) fn map(op: &str, args: &[Value], i: usize) -> Result<MapRef, RuntimeError> {
    match arg(op, args, i)? {
        Value::Map(map) => Ok(map.clone()),
        other => Err(mismatch(op, i, "a :: []", other)),
    }
}

pub(crate) fn function<'a>(
    op: &str,
    args: &'a [Value],
    i: usize,
) -> Result<&'a Function, RuntimeError> {
    match arg(op, args, i)? {
        Value::Function(f) => Ok(f),
        other => Err(mismatch(op, i, "an -> []", other)),
    }
}

/// Map key from a string or number operand.
pub(crate) fn key(op: &str, args: &[Value], i: usize) -> Result<String, RuntimeError> {
    match arg(op, args, i)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(crate::runtime::format_number(*n)),
        Value::Void => Err(RuntimeError::type_error(format!(
            "void key for accessing :: at {op} []"
        ))),
        other => Err(mismatch(op, i, "a string key", other)),
    }
}

/// Snapshot of a sequence's items, so callbacks may mutate the sequence freely.
pub(crate) fn items(seq: &SeqRef) -> Vec<Value> {
    seq.borrow().iter().cloned().collect()
}
