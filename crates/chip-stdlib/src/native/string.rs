//! STRING: text helpers

use super::helpers::{arg, module, native, number, optional, string, text};
use chip_core::runtime::{RuntimeError, Value};

const NAME: &str = "STRING";

pub fn module_value() -> Value {
    let mut members = vec![
        ("to_capital_case", native(NAME, "to_capital_case", to_capital_case)),
        ("from_char_code", native(NAME, "from_char_code", from_char_code)),
        ("interpolate", native(NAME, "interpolate", interpolate)),
        ("includes", native(NAME, "includes", includes)),
        ("string", native(NAME, "string", to_string)),
        ("substring", native(NAME, "substring", substring)),
        ("replace", native(NAME, "replace", replace)),
        ("replace_all", native(NAME, "replace_all", replace_all)),
    ];
    let transforms: [(&str, fn(&str) -> String); 5] = [
        ("upper_case", str::to_uppercase),
        ("lower_case", str::to_lowercase),
        ("trim", |s| s.trim().to_string()),
        ("trim_start", |s| s.trim_start().to_string()),
        ("trim_end", |s| s.trim_end().to_string()),
    ];
    for (member, f) in transforms {
        members.push((
            member,
            native(NAME, member, move |args| Ok(Value::String(f(string(member, args, 0)?)))),
        ));
    }
    members.push(("sp", Value::from(" ")));
    module(NAME, members)
}

/// Upper-cases the first character; the empty string stays empty.
pub fn to_capital_case(args: &[Value]) -> Result<Value, RuntimeError> {
    let input = string("to_capital_case", args, 0)?;
    let mut chars = input.chars();
    let out = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    Ok(Value::String(out))
}

/// Code points that are not valid characters become U+FFFD.
pub fn from_char_code(args: &[Value]) -> Result<Value, RuntimeError> {
    let code = number("from_char_code", args, 0)?;
    let c = if code >= 0.0 && code.fract() == 0.0 {
        char::from_u32(code as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
    } else {
        char::REPLACEMENT_CHARACTER
    };
    Ok(Value::String(c.to_string()))
}

/// Concatenates the text form of every argument.
pub fn interpolate(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::String(args.iter().map(text).collect()))
}

pub fn includes(args: &[Value]) -> Result<Value, RuntimeError> {
    let haystack = string("includes", args, 0)?;
    let needle = string("includes", args, 1)?;
    Ok(Value::bool(haystack.contains(needle)))
}

pub fn to_string(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::String(text(arg("string", args, 0)?)))
}

/// Character range `[start, end)`. Bounds are clamped to the string, swapped when
/// reversed, and `end` defaults to the length.
pub fn substring(args: &[Value]) -> Result<Value, RuntimeError> {
    let input = string("substring", args, 0)?;
    let len = input.chars().count();
    let clamp = |n: f64| {
        if n.is_nan() || n < 0.0 {
            0
        } else {
            (n as usize).min(len)
        }
    };
    let start = clamp(number("substring", args, 1)?);
    let end = match optional(args, 2) {
        Some(_) => clamp(number("substring", args, 2)?),
        None => len,
    };
    let (from, to) = if start > end { (end, start) } else { (start, end) };
    Ok(Value::String(input.chars().skip(from).take(to - from).collect()))
}

/// Replaces the first occurrence only.
pub fn replace(args: &[Value]) -> Result<Value, RuntimeError> {
    let input = string("replace", args, 0)?;
    let pattern = string("replace", args, 1)?;
    let replacement = string("replace", args, 2)?;
    Ok(Value::String(input.replacen(pattern, replacement, 1)))
}

pub fn replace_all(args: &[Value]) -> Result<Value, RuntimeError> {
    let input = string("replace_all", args, 0)?;
    let pattern = string("replace_all", args, 1)?;
    let replacement = string("replace_all", args, 2)?;
    if pattern.is_empty() {
        return Err(RuntimeError::range(
            "replace_all [] needs a non-empty pattern",
        ));
    }
    Ok(Value::String(input.replace(pattern, replacement)))
}
