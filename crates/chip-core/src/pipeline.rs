//! Source-to-value stages shared by the interpreter and the Lua backend.
//!
//! A [`Pipeline`] owns the program text, the name errors are reported against and the
//! builtins bound for the run:
//!
//! ```no_run
//! # use chip_core::pipeline::Pipeline;
//! let pipeline = Pipeline::new(":=[x; 1]; +[x; 2]".to_string(), "example.chip".to_string());
//!
//! let ast = pipeline.parse()?;
//! println!("{}", pipeline.compile(&ast).source());
//! println!("{}", pipeline.interpret(&ast)?);
//! # Ok::<(), chip_core::pipeline::PipelineError>(())
//! ```

use crate::ast::Expr;
use crate::compiler::{self, CompiledProgram};
use crate::diagnostics::Diagnostic;
use crate::interpreter::Interpreter;
use crate::runtime::{Builtins, RuntimeError, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{}", format_diagnostics(.0))]
    Parse(Vec<Diagnostic>),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

impl PipelineError {
    /// Name of the error kind, as the language reports it.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Parse(_) => "SyntaxError",
            PipelineError::Runtime(err) => err.kind.as_str(),
        }
    }

    /// Every diagnostic (or the runtime error) rendered with a source excerpt.
    pub fn format_with_source(&self, source: &str, filename: &str) -> String {
        match self {
            PipelineError::Parse(diagnostics) => diagnostics
                .iter()
                .map(|d| d.format(source))
                .collect::<Vec<_>>()
                .join("\n"),
            PipelineError::Runtime(err) => err.format_with_source(source, filename),
        }
    }
}

impl From<Vec<Diagnostic>> for PipelineError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        PipelineError::Parse(diagnostics)
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

pub struct Pipeline {
    /// Source code to execute
    source: String,
    /// Filename for error reporting
    filename: String,
    builtins: Builtins,
}

impl Pipeline {
    pub fn new(source: String, filename: String) -> Self {
        Pipeline {
            source,
            filename,
            builtins: Builtins::new(),
        }
    }

    /// Extra bindings visible to the program under both backends.
    pub fn with_builtins(mut self, builtins: Builtins) -> Self {
        self.builtins = builtins;
        self
    }

    /// # Errors
    ///
    /// `PipelineError::Parse` with one diagnostic per syntax error.
    pub fn parse(&self) -> PipelineResult<Expr> {
        tracing::debug!(filename = %self.filename, "parsing");
        crate::parser::parse(&self.source, &self.filename).map_err(PipelineError::Parse)
    }

    /// Evaluates with the tree-walking interpreter.
    pub fn interpret(&self, ast: &Expr) -> PipelineResult<Value> {
        Interpreter::with_builtins(&self.builtins)
            .run(ast)
            .map_err(PipelineError::Runtime)
    }

    /// Never fails: shape errors become raises at the point they would occur.
    pub fn compile(&self, ast: &Expr) -> CompiledProgram {
        compiler::compile(ast)
    }

    /// Runs a compiled chunk in a fresh Lua state.
    #[cfg(feature = "lua")]
    pub fn execute(&self, program: &CompiledProgram) -> PipelineResult<Value> {
        crate::host::execute(program, &self.builtins).map_err(PipelineError::Runtime)
    }

    pub fn run_all(&self) -> PipelineResult<Value> {
        let ast = self.parse()?;
        self.interpret(&ast)
    }

    #[cfg(feature = "lua")]
    pub fn run_compiled(&self) -> PipelineResult<Value> {
        let ast = self.parse()?;
        let program = self.compile(&ast);
        self.execute(&program)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// Parse and interpret `text` with `builtins` bound in the root frame.
pub fn run(text: &str, builtins: &Builtins) -> PipelineResult<Value> {
    Pipeline::new(text.to_string(), "<input>".to_string())
        .with_builtins(builtins.clone())
        .run_all()
}

/// Parse and compile `text` to Lua.
pub fn compile(text: &str) -> PipelineResult<CompiledProgram> {
    let pipeline = Pipeline::new(text.to_string(), "<input>".to_string());
    let ast = pipeline.parse()?;
    Ok(pipeline.compile(&ast))
}
