use super::Compiler;
use super::helpers::{
    CALL, CALLABLE, COMPOUND, DESTRUCTURE_MAP, DESTRUCTURE_SEQUENCE, ENTER, HIDDEN_FUNCTION,
    HIDDEN_MODULE, HIDDEN_SOURCE, HIDDEN_VALUE, IMPORT, LEAVE, OPS_TABLE, TCO, TRUTHY,
    lua_number, lua_string, mangle, raise,
};
use super::modules::record_import;
use super::scope::{Scope, declared_names, hoisted};
use crate::ast::{Expr, Literal};
use crate::parser::desugar;
use crate::runtime::ops::forms::{self, binding_name, target_name};
use crate::runtime::ops::{self, CompoundOp, Form, Special};
use crate::runtime::{ErrorKind, RuntimeError};

fn iife(body: &str) -> String {
    format!("(function() {body}end)()")
}

fn raise_error(err: &RuntimeError) -> String {
    raise(err.kind, &err.message)
}

fn join_mangled(names: &[String]) -> String {
    names.iter().map(|name| mangle(name)).collect::<Vec<_>>().join(", ")
}

impl Compiler {
    /// Lua expression for `expr`. Applications carry a trailing `;` terminator.
    pub(super) fn emit(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Literal {
                value: Literal::Number(n),
                ..
            } => lua_number(*n),
            Expr::Literal {
                value: Literal::String(s),
                ..
            } => lua_string(s),
            Expr::Identifier { name, .. } => self.place(name),
            Expr::ImportArgument { inner, .. } => self.emit(inner),
            Expr::Apply { operator, args, .. } => {
                format!("{};", self.emit_apply(operator, args))
            }
            Expr::Trampoline { name, function, .. } => {
                format!("{};", self.emit_trampoline(name, function))
            }
        }
    }

    fn emit_list(&mut self, args: &[Expr]) -> String {
        args.iter()
            .map(|arg| self.emit(arg))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn emit_apply(&mut self, operator: &Expr, args: &[Expr]) -> String {
        if let Expr::Identifier { name, .. } = operator
            && let Some(spec) = ops::lookup(name)
        {
            if let Err(err) = spec.arity.check(spec.name, args.len()) {
                return raise_error(&err);
            }
            return match spec.form {
                Form::Special(form) => self.emit_special(form, spec.name, args),
                Form::Eager(_) => format!(
                    "{OPS_TABLE}[{}]({})",
                    lua_string(spec.name),
                    self.emit_list(args)
                ),
            };
        }

        if operator.operator_name() == Some(desugar::IMPORT)
            && let Expr::Apply { args: names, .. } = operator
            && let Some(module) = args.first()
            && !record_import(&mut self.modules, names, module)
        {
            tracing::trace!("import from a computed module is not tracked");
        }

        let callee = self.emit(operator);
        let label = lua_string(&operator.to_string());
        if args.is_empty() {
            format!("{CALL}({callee}, {label})")
        } else {
            format!("{CALL}({callee}, {label}, {})", self.emit_list(args))
        }
    }

    fn emit_special(&mut self, form: Special, op: &str, args: &[Expr]) -> String {
        match form {
            Special::Block => self.emit_block(args),
            Special::Declare => self.emit_declare(op, args),
            Special::Assign => self.emit_assign(op, args),
            Special::Compound(kind) => self.emit_compound(op, kind, args),
            Special::Lambda => self.emit_lambda(op, args),
            Special::And => self.emit_logical(args, true),
            Special::Or => self.emit_logical(args, false),
            Special::Branch => self.emit_branch(args),
            Special::Symbols => self.emit_symbols(op, args),
            Special::Rebind => self.emit_rebind(op, args),
            Special::Import => self.emit_import(args),
            Special::Pipe => match args.first() {
                Some(threaded) => self.emit(threaded),
                None => "nil".to_string(),
            },
            Special::DestructureMap | Special::DestructureSequence => {
                self.emit_destructure(form, op, args)
            }
        }
    }

    fn emit_block(&mut self, args: &[Expr]) -> String {
        let Some((last, init)) = args.split_last() else {
            return "nil".to_string();
        };
        if init.is_empty() {
            return iife(&format!("return {}; ", self.emit(last)));
        }
        let mut body = String::new();
        for arg in init {
            body.push_str(&format!("do local _ = {}; end ", self.emit(arg)));
        }
        body.push_str(&format!("return {}; ", self.emit(last)));
        iife(&body)
    }

    fn emit_declare(&mut self, op: &str, args: &[Expr]) -> String {
        let mut body = String::new();
        let mut last = "nil".to_string();
        for pair in args.chunks(2) {
            let name = match binding_name(op, &pair[0]) {
                Ok(name) => self.place(name),
                Err(err) => {
                    body.push_str(&format!("return {}; ", raise_error(&err)));
                    return iife(&body);
                }
            };
            let value = match pair.get(1) {
                Some(value) => self.emit(value),
                None => "nil".to_string(),
            };
            body.push_str(&format!("{name} = {value}; "));
            last = name;
        }
        body.push_str(&format!("return {last}; "));
        iife(&body)
    }

    fn emit_assign(&mut self, op: &str, args: &[Expr]) -> String {
        let name = match target_name(op, &args[0]) {
            Ok(name) => self.place(name),
            Err(err) => return raise_error(&err),
        };
        let value = self.emit(&args[1]);
        iife(&format!(
            "local {HIDDEN_VALUE} = {value}; {name} = {HIDDEN_VALUE}; return {HIDDEN_VALUE}; "
        ))
    }

    fn emit_compound(&mut self, op: &str, kind: CompoundOp, args: &[Expr]) -> String {
        let name = match target_name(op, &args[0]) {
            Ok(name) => self.place(name),
            Err(err) => return raise_error(&err),
        };
        let amount = match args.get(1) {
            Some(amount) => self.emit(amount),
            None => lua_number(1.0),
        };
        let symbol = lua_string(forms::compound_symbol(kind));
        iife(&format!(
            "local {HIDDEN_VALUE} = {COMPOUND}({symbol}, {name}, {amount}); \
             {name} = {HIDDEN_VALUE}; return {HIDDEN_VALUE}; "
        ))
    }

    /// Function bodies hoist their own locals and track call depth the same way the
    /// interpreter does.
    fn emit_lambda(&mut self, op: &str, args: &[Expr]) -> String {
        let Some((body, params)) = args.split_last() else {
            return "nil".to_string();
        };
        let params = match forms::param_names(op, params) {
            Ok(params) => params,
            Err(err) => return raise_error(&err),
        };
        self.functions += 1;
        let locals = declared_names(body, &params);
        let depth = self.scopes.len();
        let mut out = format!("function({}) ", join_mangled(&params));
        out.push_str(&hoisted(&locals, params.len(), depth, "; "));
        self.scopes.push(Scope::new(depth, &params, &locals));
        let body = self.emit(body);
        self.scopes.pop();
        out.push_str(&format!("{ENTER}(); return {LEAVE}({body}); end"));
        out
    }

    /// `&&` stops at the first falsy value, `||` at the first truthy one.
    fn emit_logical(&mut self, args: &[Expr], stop_on_falsy: bool) -> String {
        let Some((last, init)) = args.split_last() else {
            return "nil".to_string();
        };
        let test = if stop_on_falsy { "not " } else { "" };
        let mut body = String::new();
        for arg in init {
            body.push_str(&format!(
                "do local {HIDDEN_VALUE} = {}; if {test}{TRUTHY}({HIDDEN_VALUE}) then return {HIDDEN_VALUE} end end ",
                self.emit(arg)
            ));
        }
        body.push_str(&format!("return {}; ", self.emit(last)));
        iife(&body)
    }

    fn emit_branch(&mut self, args: &[Expr]) -> String {
        let mut body = String::new();
        let mut has_default = false;
        for pair in args.chunks(2) {
            match pair {
                [condition, result] => {
                    let condition = self.emit(condition);
                    let result = self.emit(result);
                    body.push_str(&format!(
                        "if {TRUTHY}({condition}) then return {result} end; "
                    ));
                }
                [default] => {
                    body.push_str(&format!("return {}; ", self.emit(default)));
                    has_default = true;
                }
                _ => {}
            }
        }
        if !has_default {
            body.push_str("return nil; ");
        }
        iife(&body)
    }

    fn emit_symbols(&mut self, op: &str, args: &[Expr]) -> String {
        let mut body = String::new();
        let mut last = "nil".to_string();
        for arg in args {
            match binding_name(op, arg) {
                Ok(name) => {
                    last = lua_string(name);
                    body.push_str(&format!("{} = {last}; ", self.place(name)));
                }
                Err(err) => {
                    body.push_str(&format!("return {}; ", raise_error(&err)));
                    return iife(&body);
                }
            }
        }
        body.push_str(&format!("return {last}; "));
        iife(&body)
    }

    fn emit_rebind(&mut self, op: &str, args: &[Expr]) -> String {
        let name = match binding_name(op, &args[0]) {
            Ok(name) => self.place(name),
            Err(err) => return raise_error(&err),
        };
        let value = match args.get(1) {
            Some(value) => self.emit(value),
            None => "nil".to_string(),
        };
        iife(&format!(
            "local {HIDDEN_VALUE} = {value}; {name} = {HIDDEN_VALUE}; return {HIDDEN_VALUE}; "
        ))
    }

    /// The importer is a plain function of the module; names are validated when it
    /// runs, in order.
    fn emit_import(&mut self, args: &[Expr]) -> String {
        let mut body = String::new();
        for arg in args {
            match arg.identifier_name() {
                Some(name) => body.push_str(&format!(
                    "{} = {IMPORT}({HIDDEN_MODULE}, {}); ",
                    self.place(name),
                    lua_string(name)
                )),
                None => {
                    let err = raise(ErrorKind::Type, "import has to be a word");
                    body.push_str(&format!("return {err}; "));
                    return format!("function({HIDDEN_MODULE}) {body}end");
                }
            }
        }
        body.push_str("return nil; ");
        format!("function({HIDDEN_MODULE}) {body}end")
    }

    /// The source is evaluated before any target name is checked.
    fn emit_destructure(&mut self, form: Special, op: &str, args: &[Expr]) -> String {
        let Some((source, targets)) = args.split_last() else {
            return "nil".to_string();
        };
        let mut body = format!("local {HIDDEN_SOURCE} = {}; ", self.emit(source));
        let mut names = Vec::with_capacity(targets.len());
        for target in targets {
            match binding_name(op, target) {
                Ok(name) => names.push(name.to_string()),
                Err(err) => {
                    body.push_str(&format!("return {}; ", raise_error(&err)));
                    return iife(&body);
                }
            }
        }
        let extract = if form == Special::DestructureMap {
            let keys: Vec<String> = names.iter().map(|name| lua_string(name)).collect();
            format!("{DESTRUCTURE_MAP}({HIDDEN_SOURCE}, {})", keys.join(", "))
        } else {
            format!(
                "{DESTRUCTURE_SEQUENCE}({HIDDEN_SOURCE}, {})",
                lua_number(names.len() as f64)
            )
        };
        let places: Vec<String> = names.iter().map(|name| self.place(name)).collect();
        body.push_str(&format!("{} = {extract}; return nil; ", places.join(", ")));
        iife(&body)
    }

    fn emit_trampoline(&mut self, name: &str, function: &Expr) -> String {
        let function = self.emit(function);
        let err = raise(ErrorKind::Type, "~= [] can only optimise an -> []");
        iife(&format!(
            "local {HIDDEN_FUNCTION} = {function}; \
             if not {CALLABLE}({HIDDEN_FUNCTION}) then return {err} end; \
             {} = {HIDDEN_FUNCTION}; return {TCO}({HIDDEN_FUNCTION}); ",
            self.place(name)
        ))
    }
}
