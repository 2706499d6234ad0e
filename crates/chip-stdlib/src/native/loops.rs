//! LOOP: callback-driven iteration

use super::helpers::{arg, function, module, native, number, number_or};
use chip_core::runtime::{Function, RuntimeError, Value};
use std::cell::Cell;

const NAME: &str = "LOOP";

pub fn module_value() -> Value {
    module(
        NAME,
        vec![
            ("for_of", native(NAME, "for_of", for_of)),
            ("for_of_every", native(NAME, "for_of_every", for_of_every)),
            ("iterate", native(NAME, "iterate", iterate)),
            ("routine", native(NAME, "routine", routine)),
            ("loop", native(NAME, "loop", range_loop)),
            ("while_true", native(NAME, "while_true", while_true)),
            ("repeat", native(NAME, "repeat", repeat)),
            ("counter", native(NAME, "counter", counter)),
        ],
    )
}

/// Key and item pairs of anything iterable: sequence indices, map keys or string
/// character positions.
fn entries(member: &str, iterable: &Value) -> Result<Vec<(Value, Value)>, RuntimeError> {
    match iterable {
        Value::Sequence(seq) => Ok(seq
            .borrow()
            .iter()
            .enumerate()
            .map(|(i, item)| (Value::Number(i as f64), item.clone()))
            .collect()),
        Value::Map(map) => Ok(map
            .borrow()
            .iter()
            .map(|(key, value)| (Value::from(key), value.clone()))
            .collect()),
        Value::String(s) => Ok(s
            .chars()
            .enumerate()
            .map(|(i, c)| (Value::Number(i as f64), Value::String(c.to_string())))
            .collect()),
        other => Err(RuntimeError::type_error(format!(
            "{member} [] cannot iterate a {}",
            other.kind()
        ))),
    }
}

/// Calls back with each item and the iterable, then returns the iterable.
pub fn for_of(args: &[Value]) -> Result<Value, RuntimeError> {
    let iterable = arg("for_of", args, 0)?;
    let callback = function("for_of", args, 1)?;
    for (_, item) in entries("for_of", iterable)? {
        callback.call(&[item, iterable.clone()])?;
    }
    Ok(iterable.clone())
}

/// Calls back with each item alone; map entries arrive as `.:[key; value]`.
pub fn for_of_every(args: &[Value]) -> Result<Value, RuntimeError> {
    let iterable = arg("for_of_every", args, 0)?;
    let callback = function("for_of_every", args, 1)?;
    let is_map = matches!(iterable, Value::Map(_));
    for (key, item) in entries("for_of_every", iterable)? {
        let item = if is_map { Value::from(vec![key, item]) } else { item };
        callback.call(&[item])?;
    }
    Ok(iterable.clone())
}

/// Calls back with key, item and the iterable.
pub fn iterate(args: &[Value]) -> Result<Value, RuntimeError> {
    let iterable = arg("iterate", args, 0)?;
    let callback = function("iterate", args, 1)?;
    for (key, item) in entries("iterate", iterable)? {
        callback.call(&[key, item, iterable.clone()])?;
    }
    Ok(iterable.clone())
}

/// Calls back `times` times with the entity and the round, returning the last result.
pub fn routine(args: &[Value]) -> Result<Value, RuntimeError> {
    let entity = arg("routine", args, 0)?;
    let times = number("routine", args, 1)?;
    let callback = function("routine", args, 2)?;
    let mut out = Value::Void;
    let mut i = 0.0;
    while i < times {
        out = callback.call(&[entity.clone(), Value::Number(i)])?;
        i += 1.0;
    }
    Ok(out)
}

/// Counts from `start` up to but excluding `end`.
pub fn range_loop(args: &[Value]) -> Result<Value, RuntimeError> {
    let start = number("loop", args, 0)?;
    let end = number("loop", args, 1)?;
    let callback = function("loop", args, 2)?;
    let mut i = start;
    while i < end {
        callback.call(&[Value::Number(i)])?;
        i += 1.0;
    }
    Ok(Value::Void)
}

pub fn while_true(args: &[Value]) -> Result<Value, RuntimeError> {
    let condition = function("while_true", args, 0)?;
    let callback = function("while_true", args, 1)?;
    let mut out = Value::Void;
    while condition.call(&[])?.is_truthy() {
        out = callback.call(&[])?;
    }
    Ok(out)
}

pub fn repeat(args: &[Value]) -> Result<Value, RuntimeError> {
    let times = number("repeat", args, 0)?;
    let callback = function("repeat", args, 1)?;
    let mut out = Value::Void;
    let mut i = 0.0;
    while i < times {
        out = callback.call(&[Value::Number(i)])?;
        i += 1.0;
    }
    Ok(out)
}

/// A function returning `start`, `start + 1`, ... on successive calls.
pub fn counter(args: &[Value]) -> Result<Value, RuntimeError> {
    let next = Cell::new(number_or("counter", args, 0, 0.0)?);
    Ok(Value::Function(Function::native("LOOP.counter", move |_| {
        let current = next.get();
        next.set(current + 1.0);
        Ok(Value::Number(current))
    })))
}
