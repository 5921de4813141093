//! Textual OIL front-end.
//!
//! The compiler proper consumes abstract tokens; this module lexes a
//! plain-text OIL stream (whitespace-separated commands and literals,
//! `#` comments) into [`OwnedToken`](struct.OwnedToken.html)s for the
//! CLI and tests.

use crate::token::OwnedToken;
use pest::Parser;

#[derive(pest_derive::Parser)]
#[grammar = "oil.pest"]
struct OilParser;

pub type TextError = pest::error::Error<Rule>;

pub fn tokenize(input: &str) -> Result<Vec<OwnedToken>, TextError> {
    let program = OilParser::parse(Rule::program, input)?.next().unwrap();
    let mut tokens = Vec::new();

    for pair in program.into_inner() {
        let text = pair.as_str();
        match pair.as_rule() {
            Rule::identifier => tokens.push(OwnedToken::ident(text)),
            Rule::int_lit => tokens.push(OwnedToken::new(text, "LITERAL_INT")),
            Rule::float_lit => tokens.push(OwnedToken::new(text, "LITERAL_FLOAT")),
            Rule::bool_lit => tokens.push(OwnedToken::new(text, "LITERAL_BOOL")),
            Rule::string_lit => {
                tokens.push(OwnedToken::new(&text[1..text.len() - 1], "LITERAL_STRING"))
            }
            Rule::char_lit => {
                tokens.push(OwnedToken::new(&text[1..text.len() - 1], "LITERAL_CHAR"))
            }
            Rule::EOI => {}
            _ => unreachable!(),
        }
    }

    Ok(tokens)
}
