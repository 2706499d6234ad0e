//! CONSOLE and `print`: output to stdout

use super::helpers::{module, native, text};
use chip_core::runtime::{RuntimeError, Value};
use std::io::Write;

const NAME: &str = "CONSOLE";

pub fn module_value() -> Value {
    module(NAME, vec![("console_log", native(NAME, "console_log", console_log))])
}

/// One line holding the text form of every value, space separated.
pub fn format_line(values: &[Value]) -> String {
    values.iter().map(text).collect::<Vec<_>>().join(" ")
}

fn write_line(line: &str) -> Result<(), RuntimeError> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{line}")
        .map_err(|err| RuntimeError::host(format!("cannot write to stdout: {err}")))
}

pub fn console_log(args: &[Value]) -> Result<Value, RuntimeError> {
    write_line(&format_line(args))?;
    Ok(Value::Void)
}

/// Prints its arguments and returns the last one.
pub fn print(args: &[Value]) -> Result<Value, RuntimeError> {
    write_line(&format_line(args))?;
    Ok(args.last().cloned().unwrap_or(Value::Void))
}
