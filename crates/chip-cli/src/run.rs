//! `run` subcommand handler

use crate::utils::{display_name, fail, read_source_or_exit};

/// Execute a Chip script, interpreted or through the Lua backend
pub fn handle_run(file: &str, compiled: bool) {
    let source = read_source_or_exit(file);
    let filename = display_name(file).to_string();

    let result = if compiled {
        chip_stdlib::run_compiled(source.clone(), filename)
    } else {
        chip_stdlib::run_program(source.clone(), filename)
    };
    match result {
        Ok(value) => tracing::debug!(result = %value, "program finished"),
        Err(e) => fail(&e, &source, file),
    }
}
