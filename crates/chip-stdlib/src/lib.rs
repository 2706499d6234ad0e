//! Standard library for Chip programs.
//!
//! Programs reach the library through the `LIBRARY` builtin, importing modules and then
//! members:
//!
//! ```no_run
//! let value = chip_stdlib::run_program(
//!     "<-[MATH][LIBRARY]; <-[sqrt][MATH]; sqrt[16]".to_string(),
//!     "main.chip".to_string(),
//! )
//! .unwrap();
//! assert_eq!(value.to_string(), "4");
//! ```

pub mod native;

use chip_core::compiler::{self, LIBRARY};
use chip_core::pipeline::{Pipeline, PipelineResult};
use chip_core::runtime::{Builtins, Function, OrderedMap, Value};

pub use native::*;

/// The full `LIBRARY` map.
pub fn library() -> OrderedMap {
    let mut library = OrderedMap::new();
    library.insert("NAME", Value::from(LIBRARY));
    for (name, module) in native::modules() {
        library.insert(name, module);
    }
    library
}

/// Builtins exposing `library` as `LIBRARY`, plus `print`.
pub fn builtins_with(library: OrderedMap) -> Builtins {
    let mut builtins = Builtins::new();
    builtins.insert(LIBRARY, Value::map(library));
    builtins.insert(
        "print",
        Value::Function(Function::native("print", console::print)),
    );
    builtins
}

/// Builtins with the full library.
pub fn builtins() -> Builtins {
    builtins_with(library())
}

/// Interpret a program with the standard library installed.
pub fn run_program(source: String, filename: String) -> PipelineResult<Value> {
    Pipeline::new(source, filename)
        .with_builtins(builtins())
        .run_all()
}

/// Compile a program and execute it with the library narrowed to what it imports.
pub fn run_compiled(source: String, filename: String) -> PipelineResult<Value> {
    let pipeline = Pipeline::new(source, filename);
    let ast = pipeline.parse()?;
    let program = pipeline.compile(&ast);
    let narrowed = compiler::narrow(&library(), &program.modules);
    tracing::debug!(
        modules = ?narrowed.keys().collect::<Vec<_>>(),
        "narrowed library"
    );
    pipeline
        .with_builtins(builtins_with(narrowed))
        .execute(&program)
}
