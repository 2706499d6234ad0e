//! Tree-walking evaluator.
//!
//! An application whose operator is the name of a builtin is dispatched through the
//! operator table with its raw argument nodes; any other application evaluates the
//! operator, then the arguments left to right, and finally checks that the operator
//! produced something callable.

use crate::ast::{Expr, Literal};
use crate::runtime::ops::{self, Form};
use crate::runtime::{Builtins, Closure, Env, Frame, RuntimeError, Value};
use std::cell::Cell;

mod special;

/// Deepest nesting of active language calls before a RangeError.
pub const MAX_CALL_DEPTH: usize = 400;

pub const CALL_DEPTH_MESSAGE: &str = "maximum call depth exceeded";

/// Remaining native stack below which evaluation moves to a new segment.
pub(crate) const STACK_RED_ZONE: usize = 128 * 1024;
pub(crate) const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

pub struct Interpreter {
    root: Env,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            root: Frame::root(),
        }
    }

    pub fn with_builtins(builtins: &Builtins) -> Self {
        let interpreter = Self::new();
        builtins.install(&interpreter.root);
        interpreter
    }

    /// The frame top-level declarations land in.
    pub fn root(&self) -> &Env {
        &self.root
    }

    pub fn run(&self, program: &Expr) -> Result<Value, RuntimeError> {
        tracing::debug!("interpreting program");
        evaluate(program, &self.root)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn evaluate(expr: &Expr, env: &Env) -> Result<Value, RuntimeError> {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || evaluate_expr(expr, env))
}

fn evaluate_expr(expr: &Expr, env: &Env) -> Result<Value, RuntimeError> {
    match expr {
        Expr::Literal { value, .. } => Ok(match value {
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::String(s.clone()),
        }),
        Expr::Identifier { name, span } => env.lookup(name).ok_or_else(|| {
            RuntimeError::reference(format!("undefined variable: {name}")).with_span(*span)
        }),
        Expr::ImportArgument { inner, .. } => evaluate(inner, env),
        Expr::Apply {
            operator,
            args,
            span,
        } => apply(operator, args, env).map_err(|e| e.with_span(*span)),
        Expr::Trampoline {
            name,
            function,
            span,
        } => special::trampoline(name, function, env).map_err(|e| e.with_span(*span)),
    }
}

fn evaluate_all(args: &[Expr], env: &Env) -> Result<Vec<Value>, RuntimeError> {
    args.iter().map(|arg| evaluate(arg, env)).collect()
}

fn apply(operator: &Expr, args: &[Expr], env: &Env) -> Result<Value, RuntimeError> {
    if let Expr::Identifier { name, .. } = operator
        && let Some(spec) = ops::lookup(name)
    {
        spec.arity.check(spec.name, args.len())?;
        return match spec.form {
            Form::Special(form) => special::evaluate_form(form, spec.name, args, env),
            Form::Eager(func) => func(&evaluate_all(args, env)?),
        };
    }

    let callee = evaluate(operator, env)?;
    let values = evaluate_all(args, env)?;
    match callee {
        Value::Function(function) => function.call(&values),
        _ => Err(RuntimeError::type_error(format!(
            "{operator} is not a -> []"
        ))),
    }
}

thread_local! {
    static CALL_DEPTH: Cell<usize> = const { Cell::new(0) };
}

struct DepthGuard;

impl DepthGuard {
    fn enter() -> Result<Self, RuntimeError> {
        CALL_DEPTH.with(|depth| {
            let next = depth.get() + 1;
            if next > MAX_CALL_DEPTH {
                return Err(RuntimeError::range(CALL_DEPTH_MESSAGE));
            }
            depth.set(next);
            Ok(DepthGuard)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        CALL_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Invoke a closure in a fresh child of its defining frame. Missing arguments are
/// Void; extra arguments are ignored.
pub fn call_closure(closure: &Closure, args: &[Value]) -> Result<Value, RuntimeError> {
    let _guard = DepthGuard::enter()?;
    let frame = Frame::child(&closure.env);
    for (i, param) in closure.params.iter().enumerate() {
        frame.declare(param.clone(), args.get(i).cloned().unwrap_or(Value::Void));
    }
    evaluate(&closure.body, &frame)
}
