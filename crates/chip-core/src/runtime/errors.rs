//! Error types raised while evaluating or executing a program

use crate::ast::Span;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use std::fmt;
use thiserror::Error;

/// The error classes a program can observe. Both backends must agree on these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    Reference,
    Type,
    Range,
    Assertion,
    Host,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::Reference => "ReferenceError",
            ErrorKind::Type => "TypeError",
            ErrorKind::Range => "RangeError",
            ErrorKind::Assertion => "AssertionFailure",
            ErrorKind::Host => "HostError",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            ErrorKind::Syntax,
            ErrorKind::Reference,
            ErrorKind::Type,
            ErrorKind::Range,
            ErrorKind::Assertion,
            ErrorKind::Host,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Option<Span>,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        RuntimeError {
            kind,
            message: message.into(),
            span: None,
        }
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, message)
    }

    pub fn reference(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Reference, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Type, message)
    }

    pub fn range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Range, message)
    }

    pub fn assertion(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Assertion, message)
    }

    pub fn host(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Host, message)
    }

    /// Attach a location unless a more precise one was already recorded.
    pub fn with_span(mut self, span: Option<Span>) -> Self {
        if self.span.is_none() {
            self.span = span;
        }
        self
    }

    /// Render with a source excerpt when the error carries a location.
    pub fn format_with_source(&self, source: &str, filename: &str) -> String {
        match self.span {
            Some(span) => {
                Diagnostic::error(DiagnosticKind::Runtime, self.to_string(), span, filename)
                    .format(source)
            }
            None => format!("error: {self}\n"),
        }
    }
}
