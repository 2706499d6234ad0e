use chumsky::prelude::*;

/// Parser for line comments (`;;` to end of line)
pub fn line_comment<'a>() -> impl Parser<'a, &'a str, (), extra::Err<Rich<'a, char>>> + Clone {
    just(";;").then(none_of("\n").repeated()).ignored()
}

/// Parser for all whitespace and comments
pub fn ws<'a>() -> impl Parser<'a, &'a str, (), extra::Err<Rich<'a, char>>> + Clone {
    let ws_item = line_comment().or(one_of(" \t\r\n").ignored());
    ws_item.repeated()
}

/// Characters that end an identifier run
pub const DELIMITERS: &str = "[];\" \t\r\n";
