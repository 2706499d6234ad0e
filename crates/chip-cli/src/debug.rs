//! `ast` subcommand handler

use crate::utils::{display_name, fail, read_source_or_exit};
use chip_core::pipeline::Pipeline;
use std::process;

/// Print the parsed AST, as Rust debug output or JSON
pub fn handle_ast(file: &str, json: bool) {
    let source = read_source_or_exit(file);
    let pipeline = Pipeline::new(source.clone(), display_name(file).to_string());

    let ast = match pipeline.parse() {
        Ok(ast) => ast,
        Err(e) => fail(&e, &source, file),
    };

    if !json {
        println!("{ast:#?}");
        return;
    }
    match serde_json::to_string_pretty(&ast) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error serializing AST: {e}");
            process::exit(1);
        }
    }
}
