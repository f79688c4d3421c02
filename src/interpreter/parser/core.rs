use crate::{
    ast::Node,
    error::LanguageError,
    interpreter::{
        lexer::{Lexer, Token},
        parser::{binary::parse_logic, utils::starts_expression},
    },
};

pub type ParseResult<T> = Result<T, LanguageError>;

/// Parses a full expression.
///
/// This is the entry point for expression parsing.
/// It begins at the lowest-precedence level, logical `&&`/`||`, and
/// recursively descends through the precedence hierarchy.
///
/// Grammar: `expression := logic`
pub fn parse_expression(lexer: &mut Lexer) -> ParseResult<Node> {
    parse_logic(lexer)
}

/// Parses a comma-separated list of implicit lists.
///
/// Grammar: `listExpr := implicitList ("," implicitList)*`
///
/// A single element collapses to that element; two or more produce an
/// explicit [`Node::List`].
pub fn parse_list_expression(lexer: &mut Lexer) -> ParseResult<Node> {
    let first = parse_implicit_list(lexer)?;
    let line = first.line_number();
    let mut elements = vec![first];

    while let Some(lexeme) = lexer.peek_token()?
          && lexeme.token == Token::Comma
    {
        lexer.next_token()?;
        elements.push(parse_implicit_list(lexer)?);
    }

    Ok(collapse_list(elements, false, line))
}

/// Parses whitespace-separated expressions.
///
/// Grammar: `implicitList := expression+`
///
/// Expressions are consumed greedily until a token that cannot start one,
/// such as `,`, `)`, `]`, `;`, or the end of input.
pub fn parse_implicit_list(lexer: &mut Lexer) -> ParseResult<Node> {
    let first = parse_expression(lexer)?;
    let line = first.line_number();
    let mut elements = vec![first];

    while let Some(lexeme) = lexer.peek_token()?
          && starts_expression(&lexeme.token)
    {
        elements.push(parse_expression(lexer)?);
    }

    Ok(collapse_list(elements, true, line))
}

fn collapse_list(mut elements: Vec<Node>, implicit: bool, line: usize) -> Node {
    if elements.len() == 1
       && let Some(element) = elements.pop()
    {
        return element;
    }
    Node::List { elements,
                 implicit,
                 line }
}
