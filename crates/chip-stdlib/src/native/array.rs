//! ARRAY: building and splitting sequences

use super::helpers::{
    arg, items, module, native, number, number_or, sequence, string, strings, text,
};
use chip_core::runtime::{RuntimeError, Value};
use chip_core::sequence::Sequence;

const NAME: &str = "ARRAY";

/// Largest sequence `range`, `zeroes` and `ones` will build.
pub const MAX_GENERATED: usize = 1 << 24;

pub fn module_value() -> Value {
    module(
        NAME,
        vec![
            ("from", native(NAME, "from", from)),
            (
                "split_new_line",
                native(NAME, "split_new_line", |args| {
                    split_on("split_new_line", args, "\n")
                }),
            ),
            (
                "split_spaces",
                native(NAME, "split_spaces", |args| split_on("split_spaces", args, " ")),
            ),
            ("split", native(NAME, "split", split)),
            ("join", native(NAME, "join", join)),
            ("zeroes", native(NAME, "zeroes", |args| filled("zeroes", args, 0.0))),
            ("ones", native(NAME, "ones", |args| filled("ones", args, 1.0))),
            ("range", native(NAME, "range", range)),
        ],
    )
}

fn too_large(member: &str, size: f64) -> RuntimeError {
    RuntimeError::range(format!(
        "{member} [] cannot build {size} items (limit is {MAX_GENERATED})"
    ))
}

/// A fresh sequence with the items of a sequence or the characters of a string.
pub fn from(args: &[Value]) -> Result<Value, RuntimeError> {
    match arg("from", args, 0)? {
        Value::String(s) => Ok(strings(s.chars().map(String::from))),
        _ => Ok(Value::from(items(&sequence("from", args, 0)?))),
    }
}

/// An empty separator splits into characters.
fn split_text(input: &str, separator: &str) -> Value {
    if separator.is_empty() {
        strings(input.chars().map(String::from))
    } else {
        strings(input.split(separator))
    }
}

fn split_on(member: &str, args: &[Value], separator: &str) -> Result<Value, RuntimeError> {
    Ok(split_text(string(member, args, 0)?, separator))
}

pub fn split(args: &[Value]) -> Result<Value, RuntimeError> {
    let separator = string("split", args, 1)?;
    split_on("split", args, separator)
}

/// Items in text form with Void as the empty string.
pub fn join(args: &[Value]) -> Result<Value, RuntimeError> {
    let seq = sequence("join", args, 0)?;
    let separator = match args.get(1) {
        None | Some(Value::Void) => ",".to_string(),
        Some(value) => text(value),
    };
    let parts: Vec<String> = seq.borrow().iter().map(text).collect();
    Ok(Value::String(parts.join(&separator)))
}

fn filled(member: &str, args: &[Value], fill: f64) -> Result<Value, RuntimeError> {
    let size = number(member, args, 0)?;
    if !(0.0..=MAX_GENERATED as f64).contains(&size) || size.fract() != 0.0 {
        return Err(too_large(member, size));
    }
    let seq: Sequence<Value> = (0..size as usize).map(|_| Value::Number(fill)).collect();
    Ok(Value::sequence(seq))
}

/// Every integer from `start` to `end` inclusive, counting down when `start > end`,
/// each multiplied by `step`.
pub fn range(args: &[Value]) -> Result<Value, RuntimeError> {
    let start = number("range", args, 0)?;
    let end = number("range", args, 1)?;
    let step = number_or("range", args, 2, 1.0)?;
    let span = (end - start).abs();
    if !span.is_finite() || span >= MAX_GENERATED as f64 {
        return Err(too_large("range", span + 1.0));
    }
    let mut out = Vec::new();
    let mut i = start;
    if start > end {
        while i >= end {
            out.push(Value::Number(i * step));
            i -= 1.0;
        }
    } else {
        while i <= end {
            out.push(Value::Number(i * step));
            i += 1.0;
        }
    }
    Ok(Value::from(out))
}
