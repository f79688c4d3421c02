use crate::{
    ast::{Node, TypeDecl},
    error::{LanguageError, ParseError},
    interpreter::{
        lexer::{Lexeme, Lexer, Token},
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression, parse_list_expression},
            utils::{consume_if, end_of_input, expect, expected_token, peek_is},
        },
    },
};

/// Parses a single statement.
///
/// A statement may be one of:
/// - a variable declaration (`variable name: Type = value`),
/// - a `return`,
/// - a `while` loop,
/// - an `if` chain,
/// - a bare `[ ... ]` block,
/// - a reassignment (`name.path = value`),
/// - an expression used as a statement.
///
/// Terminators are not consumed here; see
/// [`parse_statements`](crate::interpreter::parser::block::parse_statements).
pub fn parse_statement(lexer: &mut Lexer) -> ParseResult<Node> {
    let Some(lexeme) = lexer.peek_token()? else {
        return Err(end_of_input(lexer, "a statement"));
    };
    let (token, line) = (lexeme.token.clone(), lexeme.line);

    match token {
        Token::Variable => {
            lexer.next_token()?;
            parse_declaration(lexer, line)
        },
        Token::Return => {
            lexer.next_token()?;
            parse_return(lexer, line)
        },
        Token::While => {
            lexer.next_token()?;
            parse_while(lexer, line)
        },
        Token::If => {
            lexer.next_token()?;
            parse_if(lexer, line)
        },
        Token::LBracket => parse_block(lexer),
        _ => parse_expression_or_reassignment(lexer),
    }
}

/// Parses `name: Type (= listExpr)?` after the `variable` keyword.
///
/// # Errors
/// - `ExpectedToken` if the name or `:` is missing.
/// - `InvalidTypeDeclaration` if the type is not `Name` or `Name.Sub`.
fn parse_declaration(lexer: &mut Lexer, line: usize) -> ParseResult<Node> {
    let name = match lexer.next_token()? {
        Some(Lexeme { token: Token::Identifier(name), .. }) => name,
        Some(lexeme) => return Err(expected_token("a variable name", &lexeme)),
        None => return Err(end_of_input(lexer, "a variable name")),
    };
    expect(lexer, &Token::Colon)?;
    let type_decl = parse_type_decl(lexer)?;

    let value = if consume_if(lexer, &Token::Equals)? {
        Some(Box::new(parse_list_expression(lexer)?))
    } else {
        None
    };

    Ok(Node::Declaration { name,
                           type_decl,
                           value,
                           line })
}

fn parse_type_decl(lexer: &mut Lexer) -> ParseResult<TypeDecl> {
    let base = match lexer.next_token()? {
        Some(Lexeme { token: Token::Identifier(base), .. }) => base,
        Some(lexeme) => return Err(invalid_type(&lexeme)),
        None => return Err(end_of_input(lexer, "a type")),
    };

    let subtype = if consume_if(lexer, &Token::Dot)? {
        match lexer.next_token()? {
            Some(Lexeme { token: Token::Identifier(subtype), .. }) => Some(subtype),
            Some(lexeme) => return Err(invalid_type(&lexeme)),
            None => return Err(end_of_input(lexer, "a type")),
        }
    } else {
        None
    };

    Ok(TypeDecl { base, subtype })
}

fn invalid_type(lexeme: &Lexeme) -> LanguageError {
    ParseError::InvalidTypeDeclaration { found:  lexeme.token.to_string(),
                                         line:   lexeme.line,
                                         column: lexeme.column, }.into()
}

/// Parses the optional value after `return`.
///
/// A bare `return` is followed by `;`, `]` or the end of input.
fn parse_return(lexer: &mut Lexer, line: usize) -> ParseResult<Node> {
    let ends_here = match lexer.peek_token()? {
        None => true,
        Some(lexeme) => matches!(lexeme.token, Token::Semicolon | Token::RBracket),
    };

    let value = if ends_here {
        None
    } else {
        Some(Box::new(parse_list_expression(lexer)?))
    };
    Ok(Node::Return { value, line })
}

/// Parses `( condition ) [ body ]` after the `while` keyword.
fn parse_while(lexer: &mut Lexer, line: usize) -> ParseResult<Node> {
    let condition = parse_condition(lexer)?;
    let body = parse_block(lexer)?;

    Ok(Node::While { condition: Box::new(condition),
                     body: Box::new(body),
                     line })
}

/// Parses an `if` chain after the `if` keyword.
///
/// Syntax:
/// ```text
///     if ( condition ) [ ... ]
///     elif ( condition ) [ ... ]
///     else if ( condition ) [ ... ]
///     else [ ... ]
/// ```
/// `else if` is treated exactly like `elif`.
fn parse_if(lexer: &mut Lexer, line: usize) -> ParseResult<Node> {
    let mut branches = vec![parse_branch(lexer)?];
    let mut else_branch = None;

    loop {
        if consume_if(lexer, &Token::Elif)? {
            branches.push(parse_branch(lexer)?);
            continue;
        }
        if consume_if(lexer, &Token::Else)? {
            if consume_if(lexer, &Token::If)? {
                branches.push(parse_branch(lexer)?);
                continue;
            }
            else_branch = Some(Box::new(parse_block(lexer)?));
        }
        break;
    }

    Ok(Node::If { branches,
                  else_branch,
                  line })
}

fn parse_branch(lexer: &mut Lexer) -> ParseResult<(Node, Node)> {
    let condition = parse_condition(lexer)?;
    let body = parse_block(lexer)?;
    Ok((condition, body))
}

fn parse_condition(lexer: &mut Lexer) -> ParseResult<Node> {
    expect(lexer, &Token::LParen)?;
    let condition = parse_expression(lexer)?;
    expect(lexer, &Token::RParen)?;
    Ok(condition)
}

/// Parses an expression statement, turning it into a reassignment when it
/// is a plain name or attribute path followed by `=`.
///
/// The assignment target is recognized after the fact, so a dotted path of
/// any length needs only one token of lookahead.
fn parse_expression_or_reassignment(lexer: &mut Lexer) -> ParseResult<Node> {
    let expr = parse_list_expression(lexer)?;

    if !peek_is(lexer, &Token::Equals)? {
        return Ok(expr);
    }

    let line = expr.line_number();
    let Some((name, path)) = assignment_target(&expr) else {
        let Some(lexeme) = lexer.next_token()? else {
            return Err(end_of_input(lexer, "a statement"));
        };
        return Err(expected_token("';'", &lexeme));
    };
    lexer.next_token()?;

    let value = parse_list_expression(lexer)?;
    Ok(Node::Reassignment { name,
                            path,
                            value: Box::new(value),
                            line })
}

/// Splits `a.b.c` into `("a", ["b", "c"])`.
fn assignment_target(node: &Node) -> Option<(String, Vec<String>)> {
    match node {
        Node::Identifier { name, .. } => Some((name.clone(), Vec::new())),
        Node::Attribute { object, name, .. } => {
            let (root, mut path) = assignment_target(object)?;
            path.push(name.clone());
            Some((root, path))
        },
        _ => None,
    }
}
