//! `check` subcommand handler

use crate::utils::{display_name, fail, read_source_or_exit};
use chip_core::pipeline::Pipeline;

/// Parse a Chip script without executing it
pub fn handle_check(file: &str) {
    let source = read_source_or_exit(file);
    let pipeline = Pipeline::new(source.clone(), display_name(file).to_string());

    match pipeline.parse() {
        Ok(_) => println!("Syntax: OK"),
        Err(e) => fail(&e, &source, file),
    }
}
