pub mod ast;
pub mod compiler;
pub mod diagnostics;
#[cfg(feature = "lua")]
pub mod host;
pub mod interpreter;
pub mod parser;
pub mod pipeline;
pub mod runtime;
pub mod sequence;

// Re-export commonly used types for convenience
pub use ast::{Expr, Literal, Span};
pub use compiler::CompiledProgram;
pub use diagnostics::{Diagnostic, Severity};
#[cfg(feature = "lua")]
pub use host::execute;
pub use parser::parse;
pub use pipeline::{Pipeline, PipelineError, compile, run};
pub use runtime::{Builtins, ErrorKind, RuntimeError, Value};
pub use sequence::Sequence;
