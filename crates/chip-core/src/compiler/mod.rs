//! Source-to-source compiler from Chip to Lua 5.4.
//!
//! The generated chunk expects the helpers named in [`helpers`] in its environment
//! (the `host` module installs them). Control forms become Lua closures and
//! statements; eager operators become calls into the shared operator table, so both
//! backends run the same implementation of every builtin.

use crate::ast::Expr;
use serde::{Deserialize, Serialize};

mod emit;
pub mod helpers;
pub mod modules;
mod scope;

pub use helpers::{demangle, mangle, strip_terminators};
pub use modules::{LIBRARY, ModuleUsage, narrow, record_import};
pub use scope::{MAX_LOCALS, declared_names};

/// Output of [`compile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledProgram {
    /// Names bound at the top level, unmangled, in first-binding order.
    pub declarations: Vec<String>,
    /// The program as a single Lua expression.
    pub program: String,
    pub modules: ModuleUsage,
}

impl CompiledProgram {
    /// Complete Lua chunk: hoisted locals, then the program as the returned value.
    pub fn source(&self) -> String {
        let mut out = scope::hoisted(&self.declarations, 0, 0, "\n");
        out.push_str(&format!("return {};\n", self.program));
        out
    }
}

#[derive(Default)]
pub(crate) struct Compiler {
    modules: ModuleUsage,
    functions: usize,
    /// Enclosing function bodies, the top level first.
    scopes: Vec<scope::Scope>,
}

impl Compiler {
    /// Lua place of an identifier: the innermost body binding it, else the chunk
    /// environment.
    fn place(&self, name: &str) -> String {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.place(name))
            .unwrap_or_else(|| mangle(name))
    }
}

pub fn compile(program: &Expr) -> CompiledProgram {
    let declarations = declared_names(program, &[]);
    let mut compiler = Compiler::default();
    compiler.scopes.push(scope::Scope::new(0, &[], &declarations));
    let raw = compiler.emit(program);
    let program_text = strip_terminators(&raw)
        .trim_end_matches(';')
        .to_string();
    tracing::debug!(
        functions = compiler.functions,
        declarations = declarations.len(),
        modules = compiler.modules.len(),
        bytes = program_text.len(),
        "compiled program"
    );
    CompiledProgram {
        declarations,
        program: program_text,
        modules: compiler.modules,
    }
}
