//! Parse-time rewrites applied as each application is built.
//!
//! Only applications of the reserved operators `|>`, `<-` and `~=` are touched; every
//! other application passes through unchanged.

use crate::ast::{Expr, Span};

pub const PIPE: &str = "|>";
pub const IMPORT: &str = "<-";
pub const TAIL_REBIND: &str = "~=";
pub const LAMBDA: &str = "->";
pub const BLOCK: &str = ":";
pub const TAIL_PREFIX: &str = "__tail_";

/// Build `operator[args]`, applying the desugaring for reserved operator names.
pub fn application(operator: Expr, args: Vec<Expr>, span: Span) -> Result<Expr, String> {
    let name = match &operator {
        Expr::Identifier { name, .. } => name.as_str(),
        _ => "",
    };
    match name {
        PIPE => pipe(operator, args, span),
        IMPORT => Ok(import(operator, args, span)),
        TAIL_REBIND => Ok(tail_rebind(operator, args, span)),
        _ => Ok(Expr::Apply {
            operator: Box::new(operator),
            args,
            span: Some(span),
        }),
    }
}

/// `|>[seed; a[..]; ->[x; ..]]` threads the running value through each step.
/// Function-literal steps are called with it; any other step receives it as a new
/// leading argument.
fn pipe(operator: Expr, args: Vec<Expr>, span: Span) -> Result<Expr, String> {
    if args.len() < 2 {
        return Err(format!(
            "{PIPE} expects a seed and at least one step, got {} argument(s)",
            args.len()
        ));
    }

    let mut args = args.into_iter();
    let mut threaded = args.next().unwrap_or_else(|| Expr::number(0.0));
    for step in args {
        threaded = match step {
            Expr::Apply {
                operator: step_operator,
                args: mut step_args,
                span: step_span,
            } => {
                let is_lambda =
                    matches!(step_operator.as_ref(), Expr::Identifier { name, .. } if name == LAMBDA);
                if is_lambda {
                    Expr::Apply {
                        operator: Box::new(Expr::Apply {
                            operator: step_operator,
                            args: step_args,
                            span: step_span,
                        }),
                        args: vec![threaded],
                        span: step_span,
                    }
                } else {
                    step_args.insert(0, threaded);
                    Expr::Apply {
                        operator: step_operator,
                        args: step_args,
                        span: step_span,
                    }
                }
            }
            other => {
                return Err(format!(
                    "every {PIPE} step must be an application, found '{other}'"
                ));
            }
        };
    }

    Ok(Expr::Apply {
        operator: Box::new(operator),
        args: vec![threaded],
        span: Some(span),
    })
}

/// `<-[a; b]` marks each name as an import reference.
fn import(operator: Expr, args: Vec<Expr>, span: Span) -> Expr {
    let args = args
        .into_iter()
        .map(|arg| {
            let span = arg.span();
            Expr::ImportArgument {
                inner: Box::new(arg),
                span,
            }
        })
        .collect();
    Expr::Apply {
        operator: Box::new(operator),
        args,
        span: Some(span),
    }
}

/// `~=[name; body]` rewrites the first self-call inside `body` into a thunk calling
/// `__tail_<name>`, and wraps `body` in a trampoline binding that marker name.
fn tail_rebind(operator: Expr, mut args: Vec<Expr>, span: Span) -> Expr {
    if let [Expr::Identifier { name, .. }, body] = args.as_mut_slice() {
        let marker = format!("{TAIL_PREFIX}{name}");
        if rewrite_first_call(body, name, &marker) {
            let function = std::mem::replace(body, Expr::number(0.0));
            *body = Expr::Trampoline {
                name: marker,
                span: function.span(),
                function: Box::new(function),
            };
        }
    }
    Expr::Apply {
        operator: Box::new(operator),
        args,
        span: Some(span),
    }
}

/// Pre-order search for `name[...]`; the first hit becomes `->[marker[...]]`.
fn rewrite_first_call(node: &mut Expr, name: &str, marker: &str) -> bool {
    match node {
        Expr::Apply {
            operator,
            args,
            span,
        } => {
            let is_self_call =
                matches!(operator.as_ref(), Expr::Identifier { name: callee, .. } if callee == name);
            if !is_self_call {
                return rewrite_first_call(operator, name, marker)
                    || args
                        .iter_mut()
                        .any(|arg| rewrite_first_call(arg, name, marker));
            }

            let call_span = *span;
            let renamed = Expr::Apply {
                operator: Box::new(Expr::Identifier {
                    name: marker.to_string(),
                    span: operator.span(),
                }),
                args: std::mem::take(args),
                span: call_span,
            };
            *node = Expr::Apply {
                operator: Box::new(Expr::Identifier {
                    name: LAMBDA.to_string(),
                    span: None,
                }),
                args: vec![renamed],
                span: call_span,
            };
            true
        }
        Expr::ImportArgument { inner, .. } => rewrite_first_call(inner, name, marker),
        Expr::Trampoline { function, .. } => rewrite_first_call(function, name, marker),
        Expr::Literal { .. } | Expr::Identifier { .. } => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(name: &str, args: Vec<Expr>) -> Expr {
        Expr::apply(Expr::ident(name), args)
    }

    fn desugar(name: &str, args: Vec<Expr>) -> Result<Expr, String> {
        application(Expr::ident(name), args, Span::new(0, 0)).map(|e| e.without_spans())
    }

    #[test]
    fn test_pipe_inserts_leading_argument() {
        let expr = desugar(
            PIPE,
            vec![
                Expr::number(5.0),
                apply("+", vec![Expr::number(1.0)]),
                apply("*", vec![Expr::number(2.0)]),
            ],
        )
        .unwrap();
        let expected = apply(
            PIPE,
            vec![apply(
                "*",
                vec![
                    apply("+", vec![Expr::number(5.0), Expr::number(1.0)]),
                    Expr::number(2.0),
                ],
            )],
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_pipe_calls_function_literal_steps() {
        let step = apply(LAMBDA, vec![Expr::ident("x"), Expr::ident("x")]);
        let expr = desugar(PIPE, vec![Expr::number(1.0), step.clone()]).unwrap();
        assert_eq!(
            expr,
            apply(PIPE, vec![Expr::apply(step, vec![Expr::number(1.0)])])
        );
    }

    #[test]
    fn test_pipe_rejects_short_or_non_application_steps() {
        assert!(desugar(PIPE, vec![Expr::number(1.0)]).is_err());
        let err = desugar(PIPE, vec![Expr::number(1.0), Expr::ident("f")]).unwrap_err();
        assert!(err.contains("must be an application"));
    }

    #[test]
    fn test_import_tags_every_argument() {
        let expr = desugar(IMPORT, vec![Expr::ident("a"), Expr::ident("b")]).unwrap();
        let Expr::Apply { args, .. } = expr else {
            panic!("expected application");
        };
        assert!(
            args.iter()
                .all(|arg| matches!(arg, Expr::ImportArgument { .. }))
        );
    }

    #[test]
    fn test_tail_rebind_rewrites_only_first_self_call() {
        // ~=[f; ->[n; ?[n; f[-[n;1]]; f[0]]]]
        let body = apply(
            LAMBDA,
            vec![
                Expr::ident("n"),
                apply(
                    "?",
                    vec![
                        Expr::ident("n"),
                        apply("f", vec![apply("-", vec![Expr::ident("n"), Expr::number(1.0)])]),
                        apply("f", vec![Expr::number(0.0)]),
                    ],
                ),
            ],
        );
        let expr = desugar(TAIL_REBIND, vec![Expr::ident("f"), body]).unwrap();

        let rewritten = apply(
            LAMBDA,
            vec![
                Expr::ident("n"),
                apply(
                    "?",
                    vec![
                        Expr::ident("n"),
                        apply(
                            LAMBDA,
                            vec![apply(
                                "__tail_f",
                                vec![apply("-", vec![Expr::ident("n"), Expr::number(1.0)])],
                            )],
                        ),
                        apply("f", vec![Expr::number(0.0)]),
                    ],
                ),
            ],
        );
        let expected = apply(
            TAIL_REBIND,
            vec![
                Expr::ident("f"),
                Expr::Trampoline {
                    name: "__tail_f".into(),
                    function: Box::new(rewritten),
                    span: None,
                },
            ],
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_tail_rebind_without_self_call_is_unchanged() {
        let body = apply(LAMBDA, vec![Expr::ident("n"), Expr::ident("n")]);
        let expr = desugar(TAIL_REBIND, vec![Expr::ident("g"), body.clone()]).unwrap();
        assert_eq!(expr, apply(TAIL_REBIND, vec![Expr::ident("g"), body]));
    }
}
