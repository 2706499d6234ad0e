//! Shared CLI utilities for reading input and reporting failures

use chip_core::pipeline::PipelineError;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process;

/// Read source code from a file or stdin.
/// If `file` is "-", reads from stdin. Otherwise reads from the specified file.
pub fn read_source(file: &str) -> io::Result<String> {
    if file == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        fs::read_to_string(file)
    }
}

/// Read `file` or exit with a message.
pub fn read_source_or_exit(file: &str) -> String {
    match read_source(file) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Error reading file '{file}': {err}");
            process::exit(1);
        }
    }
}

/// Display name used in diagnostics.
pub fn display_name(file: &str) -> &str {
    if file == "-" { "<stdin>" } else { file }
}

/// Print a formatted pipeline failure and exit.
pub fn fail(err: &PipelineError, source: &str, file: &str) -> ! {
    tracing::debug!(kind = err.kind(), "pipeline failed");
    eprintln!("{}", err.format_with_source(source, display_name(file)));
    process::exit(1);
}

/// `file` with its extension replaced, refusing stdin.
pub fn sibling_path(file: &str, extension: &str) -> Option<String> {
    if file == "-" {
        return None;
    }
    Some(
        Path::new(file)
            .with_extension(extension)
            .to_string_lossy()
            .to_string(),
    )
}
