//! Special forms: operators that decide how (and whether) their arguments evaluate.

use super::evaluate;
use crate::ast::Expr;
use crate::runtime::ops::forms::{self, binding_name, target_name};
use crate::runtime::ops::{CompoundOp, Special};
use crate::runtime::{Closure, Env, Function, RuntimeError, Value};
use std::rc::Rc;

pub(super) fn evaluate_form(
    form: Special,
    op: &str,
    args: &[Expr],
    env: &Env,
) -> Result<Value, RuntimeError> {
    match form {
        Special::Block => block(args, env),
        Special::Declare => declare(op, args, env),
        Special::Assign => assign(op, args, env),
        Special::Compound(kind) => compound(op, kind, args, env),
        Special::Lambda => lambda(op, args, env),
        Special::And => and(args, env),
        Special::Or => or(args, env),
        Special::Branch => branch(args, env),
        Special::Symbols => symbols(op, args, env),
        Special::Rebind => rebind(op, args, env),
        Special::Import => import(args, env),
        Special::Pipe => match args.first() {
            Some(threaded) => evaluate(threaded, env),
            None => Ok(Value::Void),
        },
        Special::DestructureMap => destructure(op, args, env, |source, names| {
            forms::destructure_map(source, names)
        }),
        Special::DestructureSequence => destructure(op, args, env, |source, names| {
            forms::destructure_sequence(source, names.len())
        }),
    }
}

fn block(args: &[Expr], env: &Env) -> Result<Value, RuntimeError> {
    let mut last = Value::Void;
    for arg in args {
        last = evaluate(arg, env)?;
    }
    Ok(last)
}

/// Pairs bind left to right, so a failing pair leaves earlier bindings in place.
fn declare(op: &str, args: &[Expr], env: &Env) -> Result<Value, RuntimeError> {
    let mut last = Value::Void;
    for pair in args.chunks(2) {
        let name = binding_name(op, &pair[0])?;
        let value = match pair.get(1) {
            Some(expr) => evaluate(expr, env)?,
            None => Value::Void,
        };
        env.declare(name, value.clone());
        last = value;
    }
    Ok(last)
}

fn assign(op: &str, args: &[Expr], env: &Env) -> Result<Value, RuntimeError> {
    let name = target_name(op, &args[0])?;
    let value = evaluate(&args[1], env)?;
    env.assign(name, value.clone())?;
    Ok(value)
}

fn compound(op: &str, kind: CompoundOp, args: &[Expr], env: &Env) -> Result<Value, RuntimeError> {
    let name = target_name(op, &args[0])?;
    let current = evaluate(&args[0], env)?;
    let amount = match args.get(1) {
        Some(expr) => evaluate(expr, env)?,
        None => Value::Number(1.0),
    };
    let value = forms::compound(kind, &current, &amount)?;
    env.assign(name, value.clone())?;
    Ok(value)
}

fn lambda(op: &str, args: &[Expr], env: &Env) -> Result<Value, RuntimeError> {
    let Some((body, params)) = args.split_last() else {
        return Ok(Value::Void);
    };
    let params = forms::param_names(op, params)?;
    Ok(Value::Function(Function::Closure(Rc::new(Closure {
        params,
        body: Rc::new(body.clone()),
        env: env.clone(),
    }))))
}

/// Value of the first falsy operand, or the last one.
fn and(args: &[Expr], env: &Env) -> Result<Value, RuntimeError> {
    let mut last = Value::Void;
    for arg in args {
        last = evaluate(arg, env)?;
        if !last.is_truthy() {
            break;
        }
    }
    Ok(last)
}

/// Value of the first truthy operand, or the last one.
fn or(args: &[Expr], env: &Env) -> Result<Value, RuntimeError> {
    let mut last = Value::Void;
    for arg in args {
        last = evaluate(arg, env)?;
        if last.is_truthy() {
            break;
        }
    }
    Ok(last)
}

/// `?[cond; result; cond; result; ...; default]`
fn branch(args: &[Expr], env: &Env) -> Result<Value, RuntimeError> {
    for pair in args.chunks(2) {
        match pair {
            [condition, result] => {
                if evaluate(condition, env)?.is_truthy() {
                    return evaluate(result, env);
                }
            }
            [default] => return evaluate(default, env),
            _ => {}
        }
    }
    Ok(Value::Void)
}

/// `'[a; b]` binds every name to its own spelling.
fn symbols(op: &str, args: &[Expr], env: &Env) -> Result<Value, RuntimeError> {
    let mut last = Value::Void;
    for arg in args {
        let name = binding_name(op, arg)?;
        last = Value::from(name);
        env.declare(name, last.clone());
    }
    Ok(last)
}

fn rebind(op: &str, args: &[Expr], env: &Env) -> Result<Value, RuntimeError> {
    let name = binding_name(op, &args[0])?;
    let value = match args.get(1) {
        Some(expr) => evaluate(expr, env)?,
        None => Value::Void,
    };
    env.declare(name, value.clone());
    Ok(value)
}

/// `<-[a; b]` evaluates to an importer: applied to a module map it copies the named
/// members into the frame where the import was written.
fn import(args: &[Expr], env: &Env) -> Result<Value, RuntimeError> {
    let names: Vec<Option<String>> = args
        .iter()
        .map(|arg| arg.identifier_name().map(str::to_string))
        .collect();
    let frame = env.clone();
    Ok(Value::Function(Function::native("<-", move |modules| {
        let module = modules.first().cloned().unwrap_or(Value::Void);
        for name in &names {
            let Some(name) = name else {
                return Err(RuntimeError::type_error("import has to be a word"));
            };
            let member = forms::import_member(&module, name)?;
            frame.declare(name.clone(), member);
        }
        Ok(Value::Void)
    })))
}

/// `<-::[a; b; source]` and `<-.:[a; b; source]`: the source is evaluated first.
fn destructure(
    op: &str,
    args: &[Expr],
    env: &Env,
    extract: impl Fn(&Value, &[String]) -> Result<Vec<Value>, RuntimeError>,
) -> Result<Value, RuntimeError> {
    let Some((source, targets)) = args.split_last() else {
        return Ok(Value::Void);
    };
    let source = evaluate(source, env)?;
    let names = targets
        .iter()
        .map(|target| binding_name(op, target).map(str::to_string))
        .collect::<Result<Vec<_>, _>>()?;
    let values = extract(&source, &names)?;
    for (name, value) in names.into_iter().zip(values) {
        env.declare(name, value);
    }
    Ok(Value::Void)
}

/// Binds the raw function under the marker name its rewritten self-call uses and
/// evaluates to the trampolined wrapper.
pub(super) fn trampoline(name: &str, function: &Expr, env: &Env) -> Result<Value, RuntimeError> {
    match evaluate(function, env)? {
        Value::Function(raw) => {
            env.declare(name, Value::Function(raw.clone()));
            Ok(Value::Function(forms::trampoline(raw)))
        }
        other => Err(RuntimeError::type_error(format!(
            "~= [] can only optimise an -> [] but got {}",
            other.kind()
        ))),
    }
}
