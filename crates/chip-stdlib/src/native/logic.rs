//! LOGIC: kind predicates returning 1 or 0

use super::helpers::{arg, module, native};
use chip_core::runtime::ops::arith;
use chip_core::runtime::{Kind, RuntimeError, Value};

const NAME: &str = "LOGIC";

pub fn module_value() -> Value {
    let mut members = Vec::new();
    let predicates: [(&str, &str, fn(&Value) -> bool); 4] = [
        ("is_string", "is_not_string", |v| v.kind() == Kind::String),
        ("is_number", "is_not_number", |v| v.kind() == Kind::Number),
        ("is_array", "is_not_array", |v| v.kind() == Kind::Sequence),
        ("is_map", "is_not_map", |v| v.kind() == Kind::Map),
    ];
    for (positive, negative, test) in predicates {
        members.push((positive, predicate(positive, move |v| test(v))));
        members.push((negative, predicate(negative, move |v| !test(v))));
    }
    members.push(("is_true", predicate("is_true", Value::is_truthy)));
    members.push(("is_false", predicate("is_false", |v| !v.is_truthy())));
    members.push(("is_equal", native(NAME, "is_equal", is_equal)));
    module(NAME, members)
}

fn predicate(member: &'static str, test: impl Fn(&Value) -> bool + 'static) -> Value {
    native(NAME, member, move |args| Ok(Value::bool(test(arg(member, args, 0)?))))
}

/// Structural equality, the same comparison `===` makes.
pub fn is_equal(args: &[Value]) -> Result<Value, RuntimeError> {
    let left = arg("is_equal", args, 0)?;
    let right = arg("is_equal", args, 1)?;
    arith::deep_equal(&[left.clone(), right.clone()])
}
