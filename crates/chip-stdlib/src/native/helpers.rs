//! Helper functions for native function implementations.

use chip_core::runtime::{Function, OrderedMap, RuntimeError, SeqRef, Value};

fn missing(name: &str, i: usize) -> RuntimeError {
    RuntimeError::range(format!("{name} [] expects at least {} arguments", i + 1))
}

fn mismatch(name: &str, i: usize, expected: &str, found: &Value) -> RuntimeError {
    RuntimeError::type_error(format!(
        "argument {} of {name} [] must be {expected} but got {}",
        i + 1,
        found.kind()
    ))
}

pub fn arg<'a>(name: &str, args: &'a [Value], i: usize) -> Result<&'a Value, RuntimeError> {
    args.get(i).ok_or_else(|| missing(name, i))
}

/// An argument that may be left out or passed as Void.
pub fn optional<'a>(args: &'a [Value], i: usize) -> Option<&'a Value> {
    args.get(i).filter(|value| !matches!(value, Value::Void))
}

pub fn number(name: &str, args: &[Value], i: usize) -> Result<f64, RuntimeError> {
    let value = arg(name, args, i)?;
    value
        .as_number()
        .ok_or_else(|| mismatch(name, i, "a number", value))
}

pub fn number_or(name: &str, args: &[Value], i: usize, default: f64) -> Result<f64, RuntimeError> {
    match optional(args, i) {
        Some(_) => number(name, args, i),
        None => Ok(default),
    }
}

pub fn string<'a>(name: &str, args: &'a [Value], i: usize) -> Result<&'a str, RuntimeError> {
    match arg(name, args, i)? {
        Value::String(s) => Ok(s),
        other => Err(mismatch(name, i, "a string", other)),
    }
}

pub fn sequence(name: &str, args: &[Value], i: usize) -> Result<SeqRef, RuntimeError> {
    match arg(name, args, i)? {
        Value::Sequence(seq) => Ok(seq.clone()),
        other => Err(mismatch(name, i, "an .: []", other)),
    }
}

pub fn function<'a>(name: &str, args: &'a [Value], i: usize) -> Result<&'a Function, RuntimeError> {
    match arg(name, args, i)? {
        Value::Function(f) => Ok(f),
        other => Err(mismatch(name, i, "an -> []", other)),
    }
}

/// Snapshot of a sequence's items, so callbacks may mutate it while it is walked.
pub fn items(seq: &SeqRef) -> Vec<Value> {
    seq.borrow().iter().cloned().collect()
}

/// Text form used when natives turn values into strings; Void becomes empty.
pub fn text(value: &Value) -> String {
    match value {
        Value::Void => String::new(),
        other => other.to_string(),
    }
}

pub fn strings<I, S>(parts: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Value::from(
        parts
            .into_iter()
            .map(|part| Value::String(part.into()))
            .collect::<Vec<_>>(),
    )
}

/// Native function value registered under `MODULE.member`.
pub fn native(
    module: &str,
    member: &str,
    func: impl Fn(&[Value]) -> Result<Value, RuntimeError> + 'static,
) -> Value {
    Value::Function(Function::native(format!("{module}.{member}"), func))
}

/// Builds a module map. Every module carries its own `NAME`.
pub fn module(name: &str, members: Vec<(&str, Value)>) -> Value {
    let mut map = OrderedMap::new();
    map.insert("NAME", Value::from(name));
    for (member, value) in members {
        map.insert(member, value);
    }
    Value::map(map)
}
