//! Converts Chumsky parser errors into diagnostics

use crate::ast::Span;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use chumsky::error::{Rich, RichReason};

/// Longest excerpt of the offending remainder quoted in a message
const SNIPPET_LEN: usize = 24;

/// Convert Chumsky error reason to readable message
pub fn format_error_reason(reason: &RichReason<char>, source: &str, offset: usize) -> String {
    match reason {
        RichReason::ExpectedFound { found, .. } => match found {
            None => "unexpected end of input".to_string(),
            Some(c) if **c == ']' || **c == '[' => {
                format!("unexpected '{}', expected ';' or ']'", c.escape_debug())
            }
            Some(_) => format!("unexpected syntax: \"{}\"", snippet(source, offset)),
        },
        RichReason::Custom(msg) => msg.to_string(),
    }
}

/// The remainder of the source starting at `offset`, cut at the first closing bracket
/// and truncated.
fn snippet(source: &str, offset: usize) -> String {
    let rest = source.get(offset..).unwrap_or("");
    let rest = rest.split(']').next().unwrap_or(rest).trim();
    let mut out: String = rest.chars().take(SNIPPET_LEN).collect();
    if rest.chars().count() > SNIPPET_LEN {
        out.push_str("...");
    }
    out
}

/// Convert Chumsky parse errors to diagnostics
pub fn errors_to_diagnostics(
    errors: Vec<Rich<char>>,
    filename: &str,
    source: &str,
) -> Vec<Diagnostic> {
    errors
        .into_iter()
        .map(|e| {
            let span = Span::new(e.span().start, e.span().end);
            let message = format_error_reason(e.reason(), source, span.start);
            let mut diag = Diagnostic::error(DiagnosticKind::Parse, message, span, filename);

            let missing = unclosed_brackets(source);
            if missing > 0 {
                diag = diag
                    .note(format!("{missing} '[' left unclosed"))
                    .edit(source.len(), "]".repeat(missing as usize), "Insert missing ']'");
            } else if missing < 0 {
                diag = diag.help("remove the unmatched ']'");
            }
            diag
        })
        .collect()
}

/// Net count of `[` minus `]` outside string literals.
fn unclosed_brackets(source: &str) -> isize {
    let mut depth = 0isize;
    let mut in_string = false;
    for ch in source.chars() {
        match ch {
            '"' => in_string = !in_string,
            '[' if !in_string => depth += 1,
            ']' if !in_string => depth -= 1,
            _ => {}
        }
    }
    depth
}
