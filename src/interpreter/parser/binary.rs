use crate::{
    ast::{BinaryOperator, Node},
    interpreter::{
        lexer::{Lexer, Token},
        parser::{core::ParseResult, unary::parse_factor},
    },
};

/// Parses logical expressions.
///
/// Handles left-associative `&&` and `||`, which share the lowest
/// precedence.
///
/// The rule is: `logic := additive (("&&" | "||") additive)*`
pub fn parse_logic(lexer: &mut Lexer) -> ParseResult<Node> {
    parse_left_associative(lexer, parse_additive, |op| {
        matches!(op, BinaryOperator::And | BinaryOperator::Or)
    })
}

/// Parses addition and subtraction expressions.
///
/// Handles left-associative binary operators: `+` and `-`. These bind
/// looser than comparisons, so `a + b == c` groups as `a + (b == c)`.
///
/// The rule is: `additive := comparison (("+" | "-") comparison)*`
pub fn parse_additive(lexer: &mut Lexer) -> ParseResult<Node> {
    parse_left_associative(lexer, parse_comparison, |op| {
        matches!(op, BinaryOperator::Add | BinaryOperator::Sub)
    })
}

/// Parses relational and equality operators.
///
/// This parser handles all comparison operators:
/// `<`, `>`, `<=`, `>=`, `==`, `!=`.
///
/// The rule is: `comparison := multiplicative (op multiplicative)*`
pub fn parse_comparison(lexer: &mut Lexer) -> ParseResult<Node> {
    parse_left_associative(lexer, parse_multiplicative, |op| op.precedence() == 3)
}

/// Parses multiplication-level expressions.
///
/// The rule is: `multiplicative := power (("*" | "/") power)*`
pub fn parse_multiplicative(lexer: &mut Lexer) -> ParseResult<Node> {
    parse_left_associative(lexer, parse_power, |op| {
        matches!(op, BinaryOperator::Mul | BinaryOperator::Div)
    })
}

/// Parses exponentiation expressions.
///
/// Repeated exponentiation groups to the left: `a ^ b ^ c` parses as
/// `(a ^ b) ^ c`.
///
/// The rule is: `power := factor ("^" factor)*`
pub fn parse_power(lexer: &mut Lexer) -> ParseResult<Node> {
    parse_left_associative(lexer, parse_factor, |op| op == BinaryOperator::Pow)
}

/// Folds `next (op next)*` into a left-leaning tree for every operator
/// accepted by `accepts`.
fn parse_left_associative(lexer: &mut Lexer,
                          next: fn(&mut Lexer) -> ParseResult<Node>,
                          accepts: fn(BinaryOperator) -> bool)
                          -> ParseResult<Node> {
    let mut left = next(lexer)?;
    loop {
        let Some((op, line)) = lexer.peek_token()?.and_then(|lexeme| {
                                                      token_to_binary_operator(&lexeme.token).filter(|op| accepts(*op))
                                                                                             .map(|op| (op, lexeme.line))
                                                  })
        else {
            break;
        };

        lexer.next_token()?;
        let right = next(lexer)?;
        left = Node::BinaryOp { left: Box::new(left),
                                op,
                                right: Box::new(right),
                                line };
    }
    Ok(left)
}

/// Maps a token to its corresponding binary operator.
///
/// Returns `None` for all tokens that are not binary operators.
///
/// # Example
/// ```
/// use tokenscript::{
///     ast::BinaryOperator,
///     interpreter::{lexer::Token, parser::binary::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(&Token::AndAnd), Some(BinaryOperator::And));
/// assert_eq!(token_to_binary_operator(&Token::Comma), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    use BinaryOperator::{
        Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Or, Pow,
        Sub,
    };
    match token {
        Token::Plus => Some(Add),
        Token::Minus => Some(Sub),
        Token::Star => Some(Mul),
        Token::Slash => Some(Div),
        Token::Caret => Some(Pow),
        Token::Less => Some(Less),
        Token::Greater => Some(Greater),
        Token::LessEqual => Some(LessEqual),
        Token::GreaterEqual => Some(GreaterEqual),
        Token::EqualEqual => Some(Equal),
        Token::BangEqual => Some(NotEqual),
        Token::AndAnd => Some(And),
        Token::OrOr => Some(Or),
        _ => None,
    }
}
