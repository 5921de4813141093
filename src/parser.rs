use crate::commands::{Arity, OilCommand, PackedCommand};
use crate::error::ParseError;
use crate::token::Token;

/// Turns a flat token stream into packed OIL commands.
///
/// Non-identifier tokens in front of a command are skipped; running out
/// of tokens between commands is a normal end of input. A command whose
/// arity demands an argument must be directly followed by a literal
/// token, whose raw lexeme is carried along unparsed.
pub fn parse<T: Token>(tokens: &[T]) -> Result<Vec<PackedCommand>, ParseError> {
    let mut commands = Vec::new();
    let mut pos = 0;

    loop {
        while pos < tokens.len() && tokens[pos].type_tag() != "IDENT" {
            pos += 1;
        }
        if pos >= tokens.len() {
            break;
        }

        let name = tokens[pos].lexeme();
        let command: OilCommand = name
            .parse()
            .map_err(|_| ParseError::UnknownCommand(name.to_owned()))?;
        pos += 1;

        let mut packed = PackedCommand::new(command);
        if command.arity() != Arity::None {
            if pos >= tokens.len() {
                return Err(ParseError::UnexpectedEof);
            }
            if !tokens[pos].type_tag().contains("LITERAL") {
                return Err(ParseError::ArgumentMissing(command));
            }
            packed.arguments.push(tokens[pos].lexeme().to_owned());
            pos += 1;
        }
        commands.push(packed);
    }

    Ok(commands)
}
