//! Pieces of the special forms that both backends execute identically: name checks,
//! compound assignment arithmetic, imports, destructuring and trampolining.

use super::CompoundOp;
use crate::ast::Expr;
use crate::runtime::{Function, RuntimeError, Value};

const FORBIDDEN_MEMBERS: [&str; 3] = ["constructor", "prototype", "__proto__"];

/// Declared names may not contain `.` or `-`.
pub fn check_binding_name(op: &str, name: &str) -> Result<(), RuntimeError> {
    if name.contains('.') || name.contains('-') {
        return Err(RuntimeError::syntax(format!(
            "invalid use of operation {op} [] (variable name must not contain . or -) but got {name}"
        )));
    }
    Ok(())
}

/// A name position that must hold a plain word; anything else is a SyntaxError.
pub fn binding_name<'a>(op: &str, expr: &'a Expr) -> Result<&'a str, RuntimeError> {
    let Expr::Identifier { name, .. } = expr else {
        return Err(RuntimeError::syntax(format!(
            "arguments of {op} [] must be words but got {expr}"
        )));
    };
    check_binding_name(op, name)?;
    Ok(name)
}

/// Target of an assignment; a non-word is a TypeError.
pub fn target_name<'a>(op: &str, expr: &'a Expr) -> Result<&'a str, RuntimeError> {
    match expr {
        Expr::Identifier { name, .. } => Ok(name),
        _ => Err(RuntimeError::type_error(format!(
            "argument for {op} [] must be words but got {expr}"
        ))),
    }
}

pub fn param_names(op: &str, params: &[Expr]) -> Result<Vec<String>, RuntimeError> {
    params
        .iter()
        .map(|param| match param {
            Expr::Identifier { name, .. } => Ok(name.clone()),
            other => Err(RuntimeError::type_error(format!(
                "argument names of {op} [] must be words but got {other}"
            ))),
        })
        .collect()
}

pub fn compound_symbol(op: CompoundOp) -> &'static str {
    match op {
        CompoundOp::Add => "+=",
        CompoundOp::Subtract => "-=",
        CompoundOp::Multiply => "*=",
    }
}

pub fn compound_from_symbol(symbol: &str) -> Option<CompoundOp> {
    match symbol {
        "+=" => Some(CompoundOp::Add),
        "-=" => Some(CompoundOp::Subtract),
        "*=" => Some(CompoundOp::Multiply),
        _ => None,
    }
}

pub fn compound(op: CompoundOp, current: &Value, amount: &Value) -> Result<Value, RuntimeError> {
    let symbol = compound_symbol(op);
    let apply: fn(f64, f64) -> f64 = match op {
        CompoundOp::Add => |a, b| a + b,
        CompoundOp::Subtract => |a, b| a - b,
        CompoundOp::Multiply => |a, b| a * b,
    };
    match (current.as_number(), amount.as_number()) {
        (Some(a), Some(b)) => Ok(Value::Number(apply(a, b))),
        _ => Err(RuntimeError::type_error(format!(
            "invalid use of {symbol} [] (not all args are numbers)"
        ))),
    }
}

pub fn check_import_name(name: &str) -> Result<(), RuntimeError> {
    if FORBIDDEN_MEMBERS.iter().any(|marker| name.contains(marker)) {
        return Err(RuntimeError::type_error(format!(
            "forbidden property access {name}"
        )));
    }
    Ok(())
}

/// One member of an imported module.
pub fn import_member(module: &Value, name: &str) -> Result<Value, RuntimeError> {
    check_import_name(name)?;
    let Value::Map(map) = module else {
        return Err(RuntimeError::type_error(format!(
            "<- [] expects a :: [] module but got {}",
            module.kind()
        )));
    };
    let member = map.borrow().get(name).cloned();
    member.ok_or_else(|| {
        RuntimeError::range(format!("module :: [] doesn't have a . [{name}] to import"))
    })
}

/// Values for `<-::[names..; map]`, in name order.
pub fn destructure_map(source: &Value, names: &[String]) -> Result<Vec<Value>, RuntimeError> {
    let Value::Map(map) = source else {
        return Err(RuntimeError::type_error(format!(
            "{} is not a instance of :: at <-:: []",
            source.kind()
        )));
    };
    let map = map.borrow();
    names
        .iter()
        .map(|name| {
            map.get(name).cloned().ok_or_else(|| {
                let keys: Vec<&str> = map.keys().collect();
                RuntimeError::type_error(format!(
                    "key {name} must be one of {} at operation <-:: []",
                    keys.join(",")
                ))
            })
        })
        .collect()
}

/// Values for `<-.:[names..; seq]`: one item per name, the last name takes the rest.
pub fn destructure_sequence(source: &Value, count: usize) -> Result<Vec<Value>, RuntimeError> {
    let Value::Sequence(seq) = source else {
        return Err(RuntimeError::type_error(format!(
            "{} is not a instance of .: at <-.: []",
            source.kind()
        )));
    };
    let seq = seq.borrow();
    let mut values = Vec::with_capacity(count);
    for i in 0..count {
        if i + 1 == count {
            values.push(Value::sequence(seq.slice(i as isize, None)));
        } else {
            values.push(seq.get(i).cloned().unwrap_or(Value::Void));
        }
    }
    Ok(values)
}

/// Wraps `function` so that every callable it returns is forced with no arguments
/// until a non-callable result appears.
pub fn trampoline(function: Function) -> Function {
    Function::native("tco", move |args| {
        let mut result = function.call(args)?;
        while let Value::Function(thunk) = &result {
            let next = thunk.call(&[])?;
            result = next;
        }
        Ok(result)
    })
}
