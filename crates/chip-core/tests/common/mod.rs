// Shared helpers for integration tests
#![allow(dead_code)]

use chip_core::runtime::{Builtins, ErrorKind, RuntimeError, Value};
use chip_core::{Expr, parse};

pub fn parse_ok(source: &str) -> Expr {
    parse(source, "test.chip")
        .unwrap_or_else(|errors| panic!("Parse failed for {source:?}: {errors:?}"))
}

/// Parse and interpret with no extra builtins.
pub fn run_program(source: &str) -> Result<Value, RuntimeError> {
    run_with(source, &Builtins::new())
}

pub fn run_with(source: &str, builtins: &Builtins) -> Result<Value, RuntimeError> {
    let ast = parse_ok(source);
    chip_core::interpreter::Interpreter::with_builtins(builtins).run(&ast)
}

/// Parse, compile and execute in the Lua host.
#[cfg(feature = "lua")]
pub fn run_compiled(source: &str) -> Result<Value, RuntimeError> {
    run_compiled_with(source, &Builtins::new())
}

#[cfg(feature = "lua")]
pub fn run_compiled_with(source: &str, builtins: &Builtins) -> Result<Value, RuntimeError> {
    let program = chip_core::compiler::compile(&parse_ok(source));
    chip_core::host::execute(&program, builtins)
}

/// Helper to assert a program evaluates to the expected value
pub fn assert_program_output(source: &str, expected: Value) {
    match run_program(source) {
        Ok(value) => assert_eq!(
            value, expected,
            "Program output mismatch.\nSource: {source}\nExpected: {expected}\nGot: {value}"
        ),
        Err(e) => panic!("Program execution failed.\nSource: {source}\nError: {e}"),
    }
}

/// Helper to assert a program fails with the expected error kind
pub fn assert_program_fails(source: &str, kind: ErrorKind) -> RuntimeError {
    match run_program(source) {
        Ok(value) => panic!("Program should have failed but returned: {value}\nSource: {source}"),
        Err(e) => {
            assert_eq!(e.kind, kind, "Wrong error kind.\nSource: {source}\nError: {e}");
            e
        }
    }
}

pub fn num(n: f64) -> Value {
    Value::Number(n)
}

pub fn seq(items: &[f64]) -> Value {
    Value::from(items.iter().copied().map(Value::Number).collect::<Vec<_>>())
}

pub fn strings(items: &[&str]) -> Value {
    Value::from(items.iter().copied().map(Value::from).collect::<Vec<_>>())
}
