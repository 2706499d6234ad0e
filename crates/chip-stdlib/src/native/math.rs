//! MATH: arithmetic helpers, rounding, trigonometry and constants

use super::convert;
use super::helpers::{arg, items, module, native, number, number_or, optional, sequence, text};
use chip_core::runtime::{RuntimeError, Value};

const NAME: &str = "MATH";

/// Longest sequence `permutations_array` will expand.
pub const MAX_PERMUTED: usize = 8;

/// Largest integer an f64 holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

pub fn module_value() -> Value {
    let mut members = vec![
        ("factorial", native(NAME, "factorial", factorial)),
        ("permutations", native(NAME, "permutations", permutations)),
        (
            "permutations_array",
            native(NAME, "permutations_array", permutations_array),
        ),
        ("lerp", native(NAME, "lerp", lerp)),
        ("mod", native(NAME, "mod", modulo)),
        ("clamp", native(NAME, "clamp", clamp)),
        ("inc", native(NAME, "inc", inc)),
        ("add", binary("add", |a, b| a + b)),
        ("sub", binary("sub", |a, b| a - b)),
        ("mult", binary("mult", |a, b| a * b)),
        ("divide", binary("divide", |a, b| a / b)),
        ("pow", binary("pow", f64::powf)),
        ("atan2", binary("atan2", f64::atan2)),
        ("hypot", binary("hypot", f64::hypot)),
        ("max", native(NAME, "max", max)),
        ("min", native(NAME, "min", min)),
        ("sum", native(NAME, "sum", sum)),
        ("parse_int", native(NAME, "parse_int", parse_int)),
        ("number", native(NAME, "number", convert::number)),
    ];

    let unary: [(&str, fn(f64) -> f64); 24] = [
        ("abs", f64::abs),
        ("sqrt", f64::sqrt),
        ("pow2", |n| n * n),
        ("sign", sign),
        ("trunc", f64::trunc),
        ("exp", f64::exp),
        ("floor", f64::floor),
        ("ceil", f64::ceil),
        ("round", round),
        ("negative", |n| -n),
        ("sin", f64::sin),
        ("cos", f64::cos),
        ("tan", f64::tan),
        ("tanh", f64::tanh),
        ("atan", f64::atan),
        ("asinh", f64::asinh),
        ("fround", |n| n as f32 as f64),
        ("log", f64::ln),
        ("log2", f64::log2),
        ("log10", f64::log10),
        ("acos", f64::acos),
        ("acosh", f64::acosh),
        ("asin", f64::asin),
        ("atanh", f64::atanh),
    ];
    for (member, f) in unary {
        members.push((member, unary_fn(member, f)));
    }

    members.extend([
        ("MININT", Value::Number(-MAX_SAFE_INTEGER)),
        ("MAXINT", Value::Number(MAX_SAFE_INTEGER)),
        ("infinity", Value::Number(f64::INFINITY)),
        ("PI", Value::Number(std::f64::consts::PI)),
        ("E", Value::Number(std::f64::consts::E)),
        ("LN10", Value::Number(std::f64::consts::LN_10)),
        ("LOG10E", Value::Number(std::f64::consts::LOG10_E)),
        ("SQRT1_2", Value::Number(std::f64::consts::FRAC_1_SQRT_2)),
        ("SQRT2", Value::Number(std::f64::consts::SQRT_2)),
    ]);
    module(NAME, members)
}

/// Results outside a function's domain come back as Void rather than NaN.
fn unary_fn(member: &'static str, f: fn(f64) -> f64) -> Value {
    native(NAME, member, move |args| {
        let n = f(number(member, args, 0)?);
        Ok(if n.is_nan() && domain_checked(member) {
            Value::Void
        } else {
            Value::Number(n)
        })
    })
}

fn domain_checked(member: &str) -> bool {
    matches!(member, "acos" | "acosh" | "asin" | "atanh")
}

fn binary(member: &'static str, f: fn(f64, f64) -> f64) -> Value {
    native(NAME, member, move |args| {
        Ok(Value::Number(f(number(member, args, 0)?, number(member, args, 1)?)))
    })
}

/// Zero keeps its sign; NaN stays NaN.
pub fn sign(n: f64) -> f64 {
    if n == 0.0 || n.is_nan() { n } else { n.signum() }
}

/// Halves round toward positive infinity.
pub fn round(n: f64) -> f64 {
    (n + 0.5).floor()
}

fn factorial_of(n: f64) -> f64 {
    let mut out = 1.0;
    let mut i = 2.0;
    while i <= n {
        out *= i;
        i += 1.0;
    }
    out
}

pub fn factorial(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Number(factorial_of(number("factorial", args, 0)?)))
}

/// Ordered selections of `k` out of `n`.
pub fn permutations(args: &[Value]) -> Result<Value, RuntimeError> {
    let n = number("permutations", args, 0)?;
    let k = number("permutations", args, 1)?;
    Ok(Value::Number(factorial_of(n) / factorial_of(n - k)))
}

/// Every ordering of a sequence's items, each as its own sequence.
pub fn permutations_array(args: &[Value]) -> Result<Value, RuntimeError> {
    let items = items(&sequence("permutations_array", args, 0)?);
    if items.len() > MAX_PERMUTED {
        return Err(RuntimeError::range(format!(
            "permutations_array [] supports at most {MAX_PERMUTED} items but got {}",
            items.len()
        )));
    }
    let mut out = Vec::new();
    permute(&items, &mut Vec::new(), &mut out);
    Ok(Value::from(out))
}

fn permute(rest: &[Value], prefix: &mut Vec<Value>, out: &mut Vec<Value>) {
    if rest.is_empty() {
        out.push(Value::from(prefix.clone()));
        return;
    }
    for i in 0..rest.len() {
        let mut remaining = rest.to_vec();
        prefix.push(remaining.remove(i));
        permute(&remaining, prefix, out);
        prefix.pop();
    }
}

pub fn lerp(args: &[Value]) -> Result<Value, RuntimeError> {
    let start = number("lerp", args, 0)?;
    let end = number("lerp", args, 1)?;
    let amount = number("lerp", args, 2)?;
    Ok(Value::Number((1.0 - amount) * start + amount * end))
}

/// Remainder that takes the sign of the divisor.
pub fn modulo(args: &[Value]) -> Result<Value, RuntimeError> {
    let left = number("mod", args, 0)?;
    let right = number("mod", args, 1)?;
    Ok(Value::Number(((left % right) + right) % right))
}

pub fn clamp(args: &[Value]) -> Result<Value, RuntimeError> {
    let n = number("clamp", args, 0)?;
    let low = number("clamp", args, 1)?;
    let high = number("clamp", args, 2)?;
    if n.is_nan() {
        return Ok(Value::Number(n));
    }
    Ok(Value::Number(n.max(low).min(high)))
}

pub fn inc(args: &[Value]) -> Result<Value, RuntimeError> {
    let n = number("inc", args, 0)?;
    Ok(Value::Number(n + number_or("inc", args, 1, 1.0)?))
}

fn extremum(
    member: &str,
    args: &[Value],
    start: f64,
    pick: fn(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    let mut out = start;
    for i in 0..args.len() {
        let n = number(member, args, i)?;
        if n.is_nan() {
            return Ok(Value::Number(f64::NAN));
        }
        out = pick(out, n);
    }
    Ok(Value::Number(out))
}

/// With no arguments the result is negative infinity.
pub fn max(args: &[Value]) -> Result<Value, RuntimeError> {
    extremum("max", args, f64::NEG_INFINITY, f64::max)
}

pub fn min(args: &[Value]) -> Result<Value, RuntimeError> {
    extremum("min", args, f64::INFINITY, f64::min)
}

pub fn sum(args: &[Value]) -> Result<Value, RuntimeError> {
    let mut total = 0.0;
    for item in items(&sequence("sum", args, 0)?) {
        total += item.as_number().ok_or_else(|| {
            RuntimeError::type_error(format!(
                "sum [] expects a .: [] of numbers but found {}",
                item.kind()
            ))
        })?;
    }
    Ok(Value::Number(total))
}

/// Leading integer of the value's text form in `base` (10 when left out). Stops at the
/// first character that is not a digit of the base; NaN when there are no digits.
pub fn parse_integer(input: &str, base: u32) -> f64 {
    let input = input.trim_start();
    let (negative, digits) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    let digits = if base == 16 {
        digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits)
    } else {
        digits
    };

    let mut out: Option<f64> = None;
    for c in digits.chars() {
        let Some(digit) = c.to_digit(base) else {
            break;
        };
        out = Some(out.unwrap_or(0.0) * base as f64 + digit as f64);
    }
    match out {
        Some(n) if negative => -n,
        Some(n) => n,
        None => f64::NAN,
    }
}

pub fn parse_int(args: &[Value]) -> Result<Value, RuntimeError> {
    let input = text(arg("parse_int", args, 0)?);
    let base = match optional(args, 1) {
        Some(_) => number("parse_int", args, 1)?,
        None => 10.0,
    };
    if !(2.0..=36.0).contains(&base) || base.fract() != 0.0 {
        return Err(RuntimeError::range(format!(
            "parse_int [] base must be an integer between 2 and 36 but got {base}"
        )));
    }
    Ok(Value::Number(parse_integer(&input, base as u32)))
}
