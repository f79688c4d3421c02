use crate::{
    ast::Node,
    error::{LanguageError, ParseError},
    interpreter::{
        lexer::{Lexeme, Lexer, Token},
        parser::core::{ParseResult, parse_implicit_list},
    },
};

/// Returns `true` if `token` can begin an expression.
///
/// Used by the implicit list rule to decide whether to keep consuming.
pub(in crate::interpreter::parser) const fn starts_expression(token: &Token) -> bool {
    matches!(token,
             Token::Number(_)
             | Token::Bool(_)
             | Token::Identifier(_)
             | Token::Reference(_)
             | Token::ExplicitString(_)
             | Token::HexColor(_)
             | Token::LParen
             | Token::Minus
             | Token::Plus
             | Token::Bang)
}

/// Consumes the next token, requiring it to be `expected`.
pub(in crate::interpreter::parser) fn expect(lexer: &mut Lexer,
                                             expected: &Token)
                                             -> ParseResult<Lexeme> {
    match lexer.next_token()? {
        Some(lexeme) if lexeme.token == *expected => Ok(lexeme),
        Some(lexeme) => Err(expected_token(&format!("'{expected}'"), &lexeme)),
        None => Err(end_of_input(lexer, &format!("'{expected}'"))),
    }
}

/// Consumes the next token if it equals `token`.
pub(in crate::interpreter::parser) fn consume_if(lexer: &mut Lexer,
                                                 token: &Token)
                                                 -> ParseResult<bool> {
    if lexer.peek_token()?.is_some_and(|lexeme| lexeme.token == *token) {
        lexer.next_token()?;
        return Ok(true);
    }
    Ok(false)
}

/// Returns `true` if the next token equals `token`, without consuming it.
pub(in crate::interpreter::parser) fn peek_is(lexer: &mut Lexer,
                                              token: &Token)
                                              -> ParseResult<bool> {
    Ok(lexer.peek_token()?.is_some_and(|lexeme| lexeme.token == *token))
}

/// Parses a parenthesized, comma-separated argument list.
///
/// Each argument is an implicit list, so `f(1px solid, 2)` has two
/// arguments. An immediately encountered `)` produces an empty list.
///
/// Grammar: `arguments := "(" (implicitList ("," implicitList)*)? ")"`
pub(in crate::interpreter::parser) fn parse_arguments(lexer: &mut Lexer)
                                                      -> ParseResult<Vec<Node>> {
    expect(lexer, &Token::LParen)?;

    let mut arguments = Vec::new();
    if consume_if(lexer, &Token::RParen)? {
        return Ok(arguments);
    }

    loop {
        arguments.push(parse_implicit_list(lexer)?);
        match lexer.next_token()? {
            Some(Lexeme { token: Token::Comma, .. }) => {},
            Some(Lexeme { token: Token::RParen, .. }) => break,
            Some(lexeme) => return Err(expected_token("',' or ')'", &lexeme)),
            None => return Err(end_of_input(lexer, "')'")),
        }
    }
    Ok(arguments)
}

/// Parses the name after a `.`.
///
/// Unit keywords are accepted here so that channels such as `s` or `deg`
/// stay reachable as attributes.
pub(in crate::interpreter::parser) fn parse_attribute_name(lexer: &mut Lexer)
                                                           -> ParseResult<String> {
    match lexer.next_token()? {
        Some(Lexeme { token: Token::Identifier(name), .. }) => Ok(name),
        Some(Lexeme { token: Token::Unit(name), .. }) if name != "%" => Ok(name),
        Some(lexeme) => Err(expected_token("an attribute name", &lexeme)),
        None => Err(end_of_input(lexer, "an attribute name")),
    }
}

pub(in crate::interpreter::parser) fn unexpected(lexeme: &Lexeme) -> LanguageError {
    ParseError::UnexpectedToken { token:  lexeme.token.to_string(),
                                  line:   lexeme.line,
                                  column: lexeme.column, }.into()
}

pub(in crate::interpreter::parser) fn expected_token(expected: &str,
                                                     lexeme: &Lexeme)
                                                     -> LanguageError {
    ParseError::ExpectedToken { expected: expected.to_string(),
                                found:    lexeme.token.to_string(),
                                line:     lexeme.line,
                                column:   lexeme.column, }.into()
}

pub(in crate::interpreter::parser) fn end_of_input(lexer: &Lexer, expected: &str) -> LanguageError {
    ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                       line:     lexer.line(), }.into()
}
