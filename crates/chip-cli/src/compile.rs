//! `compile` subcommand handler

use crate::utils::{display_name, fail, read_source_or_exit, sibling_path};
use chip_core::compiler::CompiledProgram;
use chip_core::pipeline::Pipeline;
use std::fs;
use std::process;

/// Compile a Chip script to a Lua chunk, optionally with a RON metadata file
pub fn handle_compile(file: &str, output: Option<&str>, metadata: bool) {
    let source = read_source_or_exit(file);
    let pipeline = Pipeline::new(source.clone(), display_name(file).to_string());

    let program = match pipeline.parse() {
        Ok(ast) => pipeline.compile(&ast),
        Err(e) => fail(&e, &source, file),
    };

    let output_file = match output {
        Some(o) => o.to_string(),
        None => match sibling_path(file, "lua") {
            Some(path) => path,
            None => {
                eprintln!("Error: Cannot compile from stdin without --output flag");
                process::exit(1);
            }
        },
    };

    write_or_exit(&output_file, &program.source());
    println!("Compiled '{}' to '{output_file}'", display_name(file));

    if metadata {
        let metadata_file = match sibling_path(&output_file, "ron") {
            Some(path) => path,
            None => {
                eprintln!("Error: Cannot write metadata next to stdout");
                process::exit(1);
            }
        };
        write_or_exit(&metadata_file, &serialize_metadata(&program));
        println!("Wrote metadata to '{metadata_file}'");
    }
}

/// Declarations, module usage and the program body as pretty RON.
pub fn serialize_metadata(program: &CompiledProgram) -> String {
    match ron::ser::to_string_pretty(program, ron::ser::PrettyConfig::default()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error serializing metadata: {e}");
            process::exit(1);
        }
    }
}

fn write_or_exit(path: &str, contents: &str) {
    if let Err(e) = fs::write(path, contents) {
        eprintln!("Error writing to '{path}': {e}");
        process::exit(1);
    }
}
