//! Abstract Syntax Tree definitions for Chip
//!
//! Every construct in the language is a literal, an identifier or an application of an
//! operator node to a bracketed argument list. The parser's desugaring passes add two
//! marker shapes: import arguments and trampolines.

use serde::{Deserialize, Serialize};
use std::fmt;

mod span;

pub use span::Span;

use crate::runtime::format_number;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Literal {
    Number(f64),
    String(String),
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Expr {
    Literal {
        value: Literal,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        span: Option<Span>,
    },
    Identifier {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        span: Option<Span>,
    },
    /// `operator[arg; arg; ...]`. The operator is itself an expression so that
    /// `f[x][y]` nests the first application as the operator of the second.
    Apply {
        operator: Box<Expr>,
        args: Vec<Expr>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        span: Option<Span>,
    },
    /// A name listed in `<-[...]`, resolved against a module instead of local bindings.
    ImportArgument {
        inner: Box<Expr>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        span: Option<Span>,
    },
    /// Produced by the tail-rebind rewrite: binds `name` to `function` in the current
    /// scope and evaluates to a trampolined wrapper around it.
    Trampoline {
        name: String,
        function: Box<Expr>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        span: Option<Span>,
    },
}

impl Expr {
    pub fn number(value: f64) -> Self {
        Expr::Literal {
            value: Literal::Number(value),
            span: None,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal {
            value: Literal::String(value.into()),
            span: None,
        }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier {
            name: name.into(),
            span: None,
        }
    }

    pub fn apply(operator: Expr, args: Vec<Expr>) -> Self {
        Expr::Apply {
            operator: Box::new(operator),
            args,
            span: None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Expr::Literal { span, .. }
            | Expr::Identifier { span, .. }
            | Expr::Apply { span, .. }
            | Expr::ImportArgument { span, .. }
            | Expr::Trampoline { span, .. } => *span,
        }
    }

    /// Name of an identifier node, looking through import tags.
    pub fn identifier_name(&self) -> Option<&str> {
        match self {
            Expr::Identifier { name, .. } => Some(name),
            Expr::ImportArgument { inner, .. } => inner.identifier_name(),
            _ => None,
        }
    }

    /// Operator name when this is an application of a plain identifier.
    pub fn operator_name(&self) -> Option<&str> {
        match self {
            Expr::Apply { operator, .. } => match operator.as_ref() {
                Expr::Identifier { name, .. } => Some(name),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn is_application(&self) -> bool {
        matches!(self, Expr::Apply { .. })
    }

    /// Same tree with every span cleared, for structural comparisons.
    pub fn without_spans(&self) -> Expr {
        match self {
            Expr::Literal { value, .. } => Expr::Literal {
                value: value.clone(),
                span: None,
            },
            Expr::Identifier { name, .. } => Expr::Identifier {
                name: name.clone(),
                span: None,
            },
            Expr::Apply { operator, args, .. } => Expr::Apply {
                operator: Box::new(operator.without_spans()),
                args: args.iter().map(Expr::without_spans).collect(),
                span: None,
            },
            Expr::ImportArgument { inner, .. } => Expr::ImportArgument {
                inner: Box::new(inner.without_spans()),
                span: None,
            },
            Expr::Trampoline { name, function, .. } => Expr::Trampoline {
                name: name.clone(),
                function: Box::new(function.without_spans()),
                span: None,
            },
        }
    }
}

/// Renders the node back into Chip source form.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal {
                value: Literal::Number(n),
                ..
            } => write!(f, "{}", format_number(*n)),
            Expr::Literal {
                value: Literal::String(s),
                ..
            } => write!(f, "\"{s}\""),
            Expr::Identifier { name, .. } => write!(f, "{name}"),
            Expr::Apply { operator, args, .. } => {
                write!(f, "{operator}[")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, "]")
            }
            Expr::ImportArgument { inner, .. } => write!(f, "{inner}"),
            Expr::Trampoline { function, .. } => write!(f, "{function}"),
        }
    }
}
