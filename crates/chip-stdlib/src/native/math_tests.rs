//! Tests for MATH natives

use super::math::*;
use chip_core::runtime::{ErrorKind, Value};

fn n(x: f64) -> Value {
    Value::Number(x)
}

fn call(member: &str, args: &[Value]) -> Value {
    let Value::Map(module) = module_value() else {
        panic!("expected a map");
    };
    let Some(Value::Function(f)) = module.borrow().get(member).cloned() else {
        panic!("MATH has no function {member}");
    };
    f.call(args).unwrap()
}

#[test]
fn test_factorial_and_permutations() {
    assert_eq!(factorial(&[n(5.0)]).unwrap(), n(120.0));
    assert_eq!(factorial(&[n(0.0)]).unwrap(), n(1.0));
    assert_eq!(permutations(&[n(5.0), n(2.0)]).unwrap(), n(20.0));
}

#[test]
fn test_permutations_array_lists_every_ordering() {
    let input = Value::from(vec![n(1.0), n(2.0), n(3.0)]);
    let Value::Sequence(all) = permutations_array(&[input]).unwrap() else {
        panic!("expected a sequence");
    };
    let all = all.borrow();
    assert_eq!(all.len(), 6);
    assert_eq!(all.first(), Some(&Value::from(vec![n(1.0), n(2.0), n(3.0)])));
    assert_eq!(all.last(), Some(&Value::from(vec![n(3.0), n(2.0), n(1.0)])));
}

#[test]
fn test_permutations_array_is_bounded() {
    let input = Value::from((0..=MAX_PERMUTED).map(|i| n(i as f64)).collect::<Vec<_>>());
    let err = permutations_array(&[input]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Range);
}

#[test]
fn test_mod_follows_divisor_sign() {
    assert_eq!(modulo(&[n(-7.0), n(3.0)]).unwrap(), n(2.0));
    assert_eq!(modulo(&[n(7.0), n(-3.0)]).unwrap(), n(-2.0));
}

#[test]
fn test_clamp_lerp_inc() {
    assert_eq!(clamp(&[n(15.0), n(0.0), n(10.0)]).unwrap(), n(10.0));
    assert_eq!(clamp(&[n(-1.0), n(0.0), n(10.0)]).unwrap(), n(0.0));
    assert_eq!(lerp(&[n(0.0), n(10.0), n(0.25)]).unwrap(), n(2.5));
    assert_eq!(inc(&[n(1.0)]).unwrap(), n(2.0));
    assert_eq!(inc(&[n(1.0), n(5.0)]).unwrap(), n(6.0));
}

#[test]
fn test_rounding_and_sign() {
    assert_eq!(round(2.5), 3.0);
    assert_eq!(round(-2.5), -2.0);
    assert_eq!(sign(-3.0), -1.0);
    assert_eq!(sign(0.0), 0.0);
    assert!(sign(f64::NAN).is_nan());
}

#[test]
fn test_extrema() {
    assert_eq!(max(&[n(1.0), n(9.0), n(3.0)]).unwrap(), n(9.0));
    assert_eq!(min(&[n(1.0), n(9.0), n(-3.0)]).unwrap(), n(-3.0));
    assert_eq!(max(&[]).unwrap(), n(f64::NEG_INFINITY));
    assert!(matches!(min(&[n(1.0), n(f64::NAN)]).unwrap(), Value::Number(x) if x.is_nan()));
}

#[test]
fn test_sum_rejects_non_numbers() {
    let numbers = Value::from(vec![n(1.0), n(2.0), n(3.5)]);
    assert_eq!(sum(&[numbers]).unwrap(), n(6.5));
    let mixed = Value::from(vec![n(1.0), Value::from("x")]);
    assert_eq!(sum(&[mixed]).unwrap_err().kind, ErrorKind::Type);
}

#[test]
fn test_parse_int() {
    assert_eq!(parse_integer("42px", 10), 42.0);
    assert_eq!(parse_integer("  -17", 10), -17.0);
    assert_eq!(parse_integer("ff", 16), 255.0);
    assert_eq!(parse_integer("0x1A", 16), 26.0);
    assert!(parse_integer("px", 10).is_nan());
    assert_eq!(parse_int(&[n(3.9)]).unwrap(), n(3.0));
    assert_eq!(parse_int(&[Value::from("101"), n(2.0)]).unwrap(), n(5.0));
    assert_eq!(parse_int(&[Value::from("1"), n(1.0)]).unwrap_err().kind, ErrorKind::Range);
}

#[test]
fn test_domain_errors_are_void() {
    assert_eq!(call("acos", &[n(2.0)]), Value::Void);
    assert_eq!(call("acos", &[n(1.0)]), n(0.0));
    assert!(matches!(call("sqrt", &[n(-1.0)]), Value::Number(x) if x.is_nan()));
}

#[test]
fn test_module_members() {
    assert_eq!(call("sqrt", &[n(16.0)]), n(4.0));
    assert_eq!(call("pow", &[n(2.0), n(10.0)]), n(1024.0));
    assert_eq!(call("pow2", &[n(3.0)]), n(9.0));
    assert_eq!(call("hypot", &[n(3.0), n(4.0)]), n(5.0));
    assert_eq!(call("negative", &[n(3.0)]), n(-3.0));
    assert_eq!(call("ceil", &[n(1.2)]), n(2.0));
    assert_eq!(call("number", &[Value::from("12")]), n(12.0));
    let Value::Map(module) = module_value() else {
        unreachable!()
    };
    let module = module.borrow();
    assert_eq!(module.get("NAME"), Some(&Value::from("MATH")));
    assert_eq!(module.get("MAXINT"), Some(&n(9_007_199_254_740_991.0)));
    assert_eq!(module.get("PI"), Some(&n(std::f64::consts::PI)));
}
