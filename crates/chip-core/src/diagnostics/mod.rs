//! Located messages about a program, rendered against its source text.

use crate::ast::Span;
use std::fmt;

mod render;

pub use render::LineIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// Which stage produced the diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    Parse,
    Runtime,
}

impl DiagnosticKind {
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticKind::Parse => "parse",
            DiagnosticKind::Runtime => "runtime",
        }
    }
}

/// Text to insert at a byte offset, such as the brackets a program forgot to close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub offset: usize,
    pub insert: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub filename: String,
    pub notes: Vec<String>,
    pub help: Option<String>,
    pub edits: Vec<Edit>,
}

impl Diagnostic {
    pub fn error(
        kind: DiagnosticKind,
        message: impl Into<String>,
        span: Span,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            message: message.into(),
            span,
            filename: filename.into(),
            notes: Vec::new(),
            help: None,
            edits: Vec::new(),
        }
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn edit(mut self, offset: usize, insert: impl Into<String>, label: impl Into<String>) -> Self {
        self.edits.push(Edit {
            offset,
            insert: insert.into(),
            label: label.into(),
        });
        self
    }

    /// 1-based line and column of the span start.
    pub fn location(&self, source: &str) -> (usize, usize) {
        LineIndex::new(source).position(source, self.span.start)
    }

    /// Message, location and an excerpt of `source` with the span underlined.
    pub fn format(&self, source: &str) -> String {
        render::render(self, source)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {} ({} bytes {}..{})",
            self.severity,
            self.kind.label(),
            self.message,
            self.filename,
            self.span.start,
            self.span.end
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostic(span: Span) -> Diagnostic {
        Diagnostic::error(DiagnosticKind::Parse, "unexpected syntax", span, "test.chip")
    }

    #[test]
    fn test_display_is_single_line() {
        let text = diagnostic(Span::new(3, 5)).to_string();
        assert_eq!(text, "error[parse]: unexpected syntax (test.chip bytes 3..5)");
    }

    #[test]
    fn test_location_counts_characters() {
        let source = "ü\n  +[1]";
        assert_eq!(diagnostic(Span::new(5, 9)).location(source), (2, 3));
        assert_eq!(diagnostic(Span::new(2, 2)).location("ün"), (1, 2));
    }

    #[test]
    fn test_builders_collect_context() {
        let diag = diagnostic(Span::new(0, 1))
            .note("first")
            .note("second")
            .help("try this")
            .edit(4, "]", "Insert ']'");
        assert_eq!(diag.notes, ["first", "second"]);
        assert_eq!(diag.help.as_deref(), Some("try this"));
        assert_eq!(diag.edits[0].insert, "]");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
