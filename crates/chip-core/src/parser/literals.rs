use super::lexer::DELIMITERS;
use crate::ast::{Expr, Literal, Span};
use chumsky::prelude::*;

/// Number literals: optional `-`, digits with at most one decimal point (`1`, `1.5`, `.5`).
/// The literal must end at a word boundary; `12ab` is an identifier.
pub fn number<'a>() -> impl Parser<'a, &'a str, Expr, extra::Err<Rich<'a, char>>> + Clone {
    let fraction = just('.').then(text::digits(10));
    let body = choice((
        text::digits(10).then(fraction.clone()).ignored(),
        fraction.ignored(),
        text::digits(10).ignored(),
    ));
    let word_char = any().filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_');

    just('-')
        .or_not()
        .then(body)
        .to_slice()
        .then_ignore(word_char.not().rewind())
        .try_map(|s: &str, span| {
            let value = s
                .parse::<f64>()
                .map_err(|_| Rich::custom(span, format!("invalid number literal '{s}'")))?;
            Ok(Expr::Literal {
                value: Literal::Number(value),
                span: Some(Span::from(span)),
            })
        })
}

/// Double-quoted strings. There are no escape sequences.
pub fn string<'a>() -> impl Parser<'a, &'a str, Expr, extra::Err<Rich<'a, char>>> + Clone {
    just('"')
        .ignore_then(none_of("\"").repeated().to_slice())
        .then_ignore(just('"'))
        .try_map(|s: &str, span| {
            Ok(Expr::Literal {
                value: Literal::String(s.to_string()),
                span: Some(Span::from(span)),
            })
        })
}

/// Any maximal run of characters other than whitespace, brackets, semicolons and quotes.
/// Symbolic operators such as `+`, `->` or `.:map>>` are ordinary identifiers.
pub fn identifier<'a>() -> impl Parser<'a, &'a str, Expr, extra::Err<Rich<'a, char>>> + Clone {
    none_of(DELIMITERS)
        .repeated()
        .at_least(1)
        .to_slice()
        .try_map(|s: &str, span| {
            Ok(Expr::Identifier {
                name: s.to_string(),
                span: Some(Span::from(span)),
            })
        })
}
