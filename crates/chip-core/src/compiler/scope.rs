//! Which names a function body (or the top level) binds in its own frame.
//!
//! Every binding form writes into the frame it runs in, and only `->` opens a new
//! frame, so the names hoisted for a body are those bound anywhere inside it except
//! within nested function literals.

use super::helpers::mangle;
use crate::ast::Expr;
use crate::parser::desugar::LAMBDA;
use crate::runtime::ops::{self, Form, Special};
use std::collections::HashSet;

/// Most names (params included) a body keeps as Lua locals. Lua allows 200 active
/// locals and 255 upvalues per function; the remaining names live in a table local to
/// the body.
pub const MAX_LOCALS: usize = 120;

/// Name of the table holding the overflow names of a body nested `depth` functions deep.
pub fn spill_table(depth: usize) -> String {
    format!("__d{depth}")
}

/// Splits a body's declared names into those kept as locals and those spilled.
pub fn split_declared(declared: &[String], params: usize) -> (&[String], &[String]) {
    let keep = MAX_LOCALS.saturating_sub(params).min(declared.len());
    declared.split_at(keep)
}

/// `local` statements opening a body, each followed by `separator`.
pub fn hoisted(declared: &[String], params: usize, depth: usize, separator: &str) -> String {
    let (kept, spilled) = split_declared(declared, params);
    let mut out = String::new();
    if !kept.is_empty() {
        let names: Vec<String> = kept.iter().map(|name| mangle(name)).collect();
        out.push_str(&format!("local {}{separator}", names.join(", ")));
    }
    if !spilled.is_empty() {
        out.push_str(&format!("local {} = {{}}{separator}", spill_table(depth)));
    }
    out
}

/// Names one function body binds, and where each lives in the generated Lua.
#[derive(Debug)]
pub struct Scope {
    table: String,
    locals: HashSet<String>,
    spilled: HashSet<String>,
}

impl Scope {
    pub fn new(depth: usize, params: &[String], declared: &[String]) -> Self {
        let (kept, spilled) = split_declared(declared, params.len());
        Scope {
            table: spill_table(depth),
            locals: params.iter().chain(kept).cloned().collect(),
            spilled: spilled.iter().cloned().collect(),
        }
    }

    /// Lua place for `name` when this body binds it.
    pub fn place(&self, name: &str) -> Option<String> {
        if self.locals.contains(name) {
            Some(mangle(name))
        } else if self.spilled.contains(name) {
            Some(format!("{}.{}", self.table, mangle(name)))
        } else {
            None
        }
    }
}

/// Declared names in first-binding order, without duplicates or the given params.
pub fn declared_names(body: &Expr, params: &[String]) -> Vec<String> {
    let mut names = Vec::new();
    collect(body, &mut names);
    names.retain(|name| !params.contains(name));
    names
}

fn add(names: &mut Vec<String>, expr: &Expr) {
    if let Some(name) = expr.identifier_name()
        && !names.iter().any(|existing| existing == name)
    {
        names.push(name.to_string());
    }
}

fn collect(expr: &Expr, names: &mut Vec<String>) {
    match expr {
        Expr::Literal { .. } | Expr::Identifier { .. } => {}
        Expr::ImportArgument { inner, .. } => collect(inner, names),
        Expr::Trampoline { name, function, .. } => {
            if !names.contains(name) {
                names.push(name.clone());
            }
            collect(function, names);
        }
        Expr::Apply { operator, args, .. } => {
            let special = operator
                .identifier_name()
                .and_then(ops::lookup)
                .and_then(|spec| match spec.form {
                    Form::Special(form) => Some((spec.name, form)),
                    Form::Eager(_) => None,
                });
            match special {
                Some((LAMBDA, _)) => return,
                Some((_, Special::Declare)) => {
                    for pair in args.chunks(2) {
                        add(names, &pair[0]);
                    }
                }
                Some((_, Special::Symbols | Special::Import)) => {
                    for arg in args {
                        add(names, arg);
                    }
                }
                Some((_, Special::Rebind)) => {
                    if let Some(first) = args.first() {
                        add(names, first);
                    }
                }
                Some((_, Special::DestructureMap | Special::DestructureSequence)) => {
                    if let Some((_, targets)) = args.split_last() {
                        for target in targets {
                            add(names, target);
                        }
                    }
                }
                _ => collect(operator, names),
            }
            for arg in args {
                collect(arg, names);
            }
        }
    }
}
