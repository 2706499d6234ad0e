use crate::ast::{Expr, Span};
use crate::diagnostics::Diagnostic;
use chumsky::prelude::*;

pub mod desugar;
mod errors;
mod lexer;
mod literals;

pub use errors::errors_to_diagnostics;

pub fn parser<'a>() -> impl Parser<'a, &'a str, Expr, extra::Err<Rich<'a, char>>> {
    let ws = lexer::ws();

    let mut expr = Recursive::declare();

    let atom = choice((
        literals::number().boxed(),
        literals::string().boxed(),
        literals::identifier().boxed(),
    ))
    .padded_by(ws.clone())
    .boxed();

    let bracket_args = expr
        .clone()
        .separated_by(just(';').padded_by(ws.clone()))
        .allow_trailing()
        .collect::<Vec<Expr>>()
        .delimited_by(
            just('[').padded_by(ws.clone()),
            just(']').padded_by(ws.clone()),
        )
        .try_map(|args, span| Ok((args, Span::from(span))));

    // `f[x][y]`: every further bracket group applies the expression built so far
    let application = atom
        .then(bracket_args.repeated().collect::<Vec<_>>())
        .try_map(|(head, groups), span| {
            let mut expr = head;
            for (args, group_span) in groups {
                let start = expr.span().map(|s| s.start).unwrap_or(span.start);
                expr = desugar::application(expr, args, Span::new(start, group_span.end))
                    .map_err(|msg| Rich::custom(span, msg))?;
            }
            Ok(expr)
        })
        .boxed();

    expr.define(application);

    // Several top-level expressions form an implicit block
    ws.clone()
        .ignore_then(
            expr.separated_by(just(';').padded_by(ws.clone()))
                .allow_trailing()
                .collect::<Vec<Expr>>(),
        )
        .then_ignore(ws)
        .then_ignore(end())
        .try_map(|mut exprs, span| {
            if exprs.len() == 1 {
                if let Some(single) = exprs.pop() {
                    return Ok(single);
                }
            }
            Ok(Expr::Apply {
                operator: Box::new(Expr::Identifier {
                    name: desugar::BLOCK.to_string(),
                    span: None,
                }),
                args: exprs,
                span: Some(Span::from(span)),
            })
        })
}

pub fn parse(source: &str, filename: &str) -> Result<Expr, Vec<Diagnostic>> {
    let (output, errors) = parser().parse(source).into_output_errors();
    match output {
        Some(expr) if errors.is_empty() => {
            tracing::trace!(filename, "parsed program");
            Ok(expr)
        }
        _ => Err(errors_to_diagnostics(errors, filename, source)),
    }
}
