//! Source excerpts with carets under the reported span

use super::Diagnostic;
use std::fmt::Write;

/// Start offsets of every line, for turning byte offsets into positions.
#[derive(Debug)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        LineIndex { starts }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// 0-based line holding `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset).saturating_sub(1)
    }

    /// 1-based line and column, with columns counted in characters.
    pub fn position(&self, source: &str, offset: usize) -> (usize, usize) {
        let offset = offset.min(source.len());
        let line = self.line_of(offset);
        let column = source
            .get(self.starts[line]..offset)
            .map_or(0, |prefix| prefix.chars().count());
        (line + 1, column + 1)
    }

    /// Text of a 0-based line without its terminator.
    pub fn line_text<'a>(&self, source: &'a str, line: usize) -> &'a str {
        let Some(&start) = self.starts.get(line) else {
            return "";
        };
        let end = self.starts.get(line + 1).map_or(source.len(), |&next| next - 1);
        source
            .get(start..end)
            .unwrap_or("")
            .trim_end_matches('\r')
    }
}

pub(super) fn render(diag: &Diagnostic, source: &str) -> String {
    let index = LineIndex::new(source);
    let (first, start_col) = index.position(source, diag.span.start);
    let (last, end_col) = index.position(source, diag.span.end.max(diag.span.start));
    let width = last.to_string().len();
    let gutter = " ".repeat(width);

    let mut out = String::new();
    let _ = writeln!(out, "{}: {}", diag.severity, diag.message);
    let _ = writeln!(out, "{gutter}--> {}:{first}:{start_col}", diag.filename);
    let _ = writeln!(out, "{gutter} |");
    for line in first..=last {
        let text = index.line_text(source, line - 1);
        let from = if line == first { start_col - 1 } else { 0 };
        let to = if line == last {
            end_col - 1
        } else {
            text.chars().count()
        };
        let carets = "^".repeat(to.saturating_sub(from).max(1));
        let _ = writeln!(out, "{line:>width$} | {text}");
        let _ = writeln!(out, "{gutter} | {}{carets}", " ".repeat(from));
    }
    for note in &diag.notes {
        let _ = writeln!(out, "{gutter} = note: {note}");
    }
    if let Some(help) = &diag.help {
        let _ = writeln!(out, "{gutter} = help: {help}");
    }
    for edit in &diag.edits {
        let _ = writeln!(out, "{gutter} = fix: {}", edit.label);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;
    use crate::diagnostics::DiagnosticKind;

    #[test]
    fn test_line_index() {
        let source = "one\ntwo\r\n\nfour";
        let index = LineIndex::new(source);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_of(0), 0);
        assert_eq!(index.line_of(4), 1);
        assert_eq!(index.line_text(source, 1), "two");
        assert_eq!(index.line_text(source, 2), "");
        assert_eq!(index.line_text(source, 3), "four");
        assert_eq!(index.position(source, 11), (4, 2));
        assert_eq!(index.position(source, 999), (4, 5));
    }

    #[test]
    fn test_render_underlines_span() {
        let source = ":=[x; 1]\n+[x; \"a\"]";
        let diag = Diagnostic::error(
            DiagnosticKind::Runtime,
            "TypeError: cannot add",
            Span::new(14, 17),
            "test.chip",
        )
        .help("check the operands");
        let rendered = diag.format(source);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "error: TypeError: cannot add");
        assert_eq!(lines[1], " --> test.chip:2:6");
        assert_eq!(lines[3], "2 | +[x; \"a\"]");
        assert_eq!(lines[4], "  |      ^^^");
        assert_eq!(lines[5], "  = help: check the operands");
    }

    #[test]
    fn test_render_spans_several_lines() {
        let source = "f[1;\n  2]";
        let diag = Diagnostic::error(DiagnosticKind::Parse, "bad", Span::new(0, 9), "t.chip")
            .note("1 '[' left unclosed")
            .edit(9, "]", "Insert missing ']'");
        let rendered = diag.format(source);
        assert!(rendered.contains("1 | f[1;\n  | ^^^^\n"), "{rendered}");
        assert!(rendered.contains("2 |   2]\n  | ^^^^\n"), "{rendered}");
        assert!(rendered.contains("= note: 1 '[' left unclosed"));
        assert!(rendered.ends_with("= fix: Insert missing ']'\n"));
    }
}
