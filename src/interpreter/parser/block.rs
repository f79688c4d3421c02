use crate::{
    ast::Node,
    interpreter::{
        lexer::{Lexer, Token},
        parser::{
            core::ParseResult,
            statement::parse_statement,
            utils::{end_of_input, expect, expected_token},
        },
    },
};

/// Parses a block delimited by square brackets.
///
/// Grammar: `block := "[" statement* "]"`
///
/// The resulting node is `Node::Block { body, line }`, where `body` is the
/// single statement or a sequence of them.
pub fn parse_block(lexer: &mut Lexer) -> ParseResult<Node> {
    let open = expect(lexer, &Token::LBracket)?;
    let statements = parse_statements(lexer, true)?;

    Ok(Node::Block { body: Box::new(collapse_statements(statements, open.line)),
                     line: open.line, })
}

/// Parses every statement of a program.
pub fn parse_program(lexer: &mut Lexer) -> ParseResult<Node> {
    let statements = parse_statements(lexer, false)?;
    Ok(collapse_statements(statements, 1))
}

/// Parses statements until `]` (inside a block) or the end of input.
///
/// Stray `;` are skipped. Declarations, reassignments and expression
/// statements must be followed by `;` unless they are the last statement
/// before `]` or the end of input; `return`, `while`, `if` and blocks need
/// no terminator.
///
/// # Errors
/// Returns a `ParseError` for a missing terminator, or for an unclosed block.
pub fn parse_statements(lexer: &mut Lexer, in_block: bool) -> ParseResult<Vec<Node>> {
    let mut statements = Vec::new();

    loop {
        while lexer.peek_token()?.is_some_and(|lexeme| lexeme.token == Token::Semicolon) {
            lexer.next_token()?;
        }

        match lexer.peek_token()? {
            None if in_block => return Err(end_of_input(lexer, "']'")),
            None => break,
            Some(lexeme) if in_block && lexeme.token == Token::RBracket => {
                lexer.next_token()?;
                break;
            },
            Some(_) => {},
        }

        let statement = parse_statement(lexer)?;
        let needs_terminator = !matches!(statement,
                                         Node::Return { .. }
                                         | Node::While { .. }
                                         | Node::If { .. }
                                         | Node::Block { .. });
        statements.push(statement);

        if needs_terminator {
            match lexer.peek_token()? {
                None => {},
                Some(lexeme) if lexeme.token == Token::Semicolon => {},
                Some(lexeme) if in_block && lexeme.token == Token::RBracket => {},
                Some(_) => {
                    if let Some(lexeme) = lexer.next_token()? {
                        return Err(expected_token("';'", &lexeme));
                    }
                },
            }
        }
    }

    Ok(statements)
}

/// A single statement stands for itself; anything else becomes a sequence.
fn collapse_statements(mut statements: Vec<Node>, line: usize) -> Node {
    if statements.len() == 1
       && let Some(statement) = statements.pop()
    {
        return statement;
    }
    Node::Sequence { statements, line }
}
