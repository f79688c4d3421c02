use crate::{
    ast::{Literal, Node, UnaryOperator},
    interpreter::{
        lexer::{Lexeme, Lexer, Token},
        parser::{
            core::{ParseResult, parse_expression},
            utils::{
                consume_if, end_of_input, expect, parse_arguments, parse_attribute_name, peek_is,
                unexpected,
            },
        },
    },
};

/// Parses a factor, the highest-precedence grammar level.
///
/// A factor is one of:
/// - a unary `-`, `+` or `!` applied to another factor,
/// - a number, boolean, hex color or quoted string literal, optionally
///   followed by a unit,
/// - a parenthesized expression, optionally followed by a unit,
/// - a `{reference}`, optionally followed by a unit,
/// - an identifier or a function call.
///
/// Every factor except a unary operation may be followed by an attribute
/// chain (`.name` or `.name(args)`, repeated).
///
/// # Errors
/// Returns a `ParseError` for any token that cannot start an expression or
/// for a premature end of input.
pub fn parse_factor(lexer: &mut Lexer) -> ParseResult<Node> {
    let Some(lexeme) = lexer.next_token()? else {
        return Err(end_of_input(lexer, "an expression"));
    };
    let line = lexeme.line;

    match lexeme.token {
        Token::Minus => parse_unary_operand(lexer, UnaryOperator::Negate, line),
        Token::Plus => parse_unary_operand(lexer, UnaryOperator::Plus, line),
        Token::Bang => parse_unary_operand(lexer, UnaryOperator::Not, line),
        Token::Number(number) => {
            let value = Literal::Number { value:    number.value,
                                          is_float: number.is_float, };
            parse_literal(lexer, value, line)
        },
        Token::Bool(b) => parse_literal(lexer, Literal::Boolean(b), line),
        Token::HexColor(hex) => parse_literal(lexer, Literal::Hex(hex), line),
        Token::ExplicitString(s) => parse_literal(lexer, Literal::String(s), line),
        Token::LParen => {
            let expr = parse_expression(lexer)?;
            expect(lexer, &Token::RParen)?;
            let node = parse_unit_suffix(lexer, expr)?;
            parse_attribute_chain(lexer, node)
        },
        Token::Reference(name) => {
            let node = parse_unit_suffix(lexer, Node::Reference { name, line })?;
            parse_attribute_chain(lexer, node)
        },
        Token::Identifier(name) => {
            let node = if peek_is(lexer, &Token::LParen)? {
                let arguments = parse_arguments(lexer)?;
                Node::FunctionCall { name,
                                     arguments,
                                     line }
            } else {
                Node::Identifier { name, line }
            };
            parse_attribute_chain(lexer, node)
        },
        _ => Err(unexpected(&lexeme)),
    }
}

fn parse_literal(lexer: &mut Lexer, value: Literal, line: usize) -> ParseResult<Node> {
    let node = parse_unit_suffix(lexer, Node::Literal { value, line })?;
    parse_attribute_chain(lexer, node)
}

fn parse_unary_operand(lexer: &mut Lexer, op: UnaryOperator, line: usize) -> ParseResult<Node> {
    let expr = parse_factor(lexer)?;
    Ok(Node::UnaryOp { op,
                       expr: Box::new(expr),
                       line })
}

/// Wraps `node` in [`Node::WithUnit`] when a unit keyword follows.
fn parse_unit_suffix(lexer: &mut Lexer, node: Node) -> ParseResult<Node> {
    let unit = match lexer.peek_token()? {
        Some(Lexeme { token: Token::Unit(unit), .. }) => unit.clone(),
        _ => return Ok(node),
    };
    lexer.next_token()?;

    let line = node.line_number();
    Ok(Node::WithUnit { expr: Box::new(node),
                        unit,
                        line })
}

/// Parses `.name` and `.name(args)` suffixes, left to right.
///
/// Grammar: `chain := ("." NAME arguments?)*`
fn parse_attribute_chain(lexer: &mut Lexer, mut node: Node) -> ParseResult<Node> {
    while consume_if(lexer, &Token::Dot)? {
        let line = lexer.line();
        let name = parse_attribute_name(lexer)?;

        node = if peek_is(lexer, &Token::LParen)? {
            let arguments = parse_arguments(lexer)?;
            Node::MethodCall { object: Box::new(node),
                               name,
                               arguments,
                               line }
        } else {
            Node::Attribute { object: Box::new(node),
                              name,
                              line }
        };
    }
    Ok(node)
}
