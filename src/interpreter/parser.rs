use crate::{
    ast::Node,
    error::LanguageError,
    interpreter::{lexer::Lexer, parser::block::parse_program, units::UnitManager},
};

/// Entry points shared by every grammar level.
///
/// Contains the result alias and the list-level rules (`listExpr`,
/// `implicitList`) that sit above plain expressions.
pub mod core;

/// Binary operator parsing.
///
/// Implements the precedence ladder from logical operators down to `^`.
pub mod binary;

/// Factor parsing.
///
/// Handles unary operators, literals with unit suffixes, references,
/// function calls, and attribute chains.
pub mod unary;

/// Block and program parsing.
///
/// Parses `[ ... ]` blocks and the top-level statement list, handling
/// statement terminators.
pub mod block;

/// Utility functions for the parser.
///
/// Provides token expectations, argument lists, and error builders.
pub mod utils;

/// Statement parsing.
///
/// Implements declarations, reassignments, `return`, `while`, and
/// `if`/`elif`/`else`.
pub mod statement;

/// Parses a complete program into a single AST node.
///
/// A program with one statement yields that statement; several statements
/// are wrapped in a [`Node::Sequence`]; an empty program yields an empty
/// sequence. Parsing is all-or-nothing: the first error aborts it.
///
/// # Example
/// ```
/// use tokenscript::{
///     ast::Node,
///     interpreter::{parser::parse, units::UnitManager},
/// };
///
/// let units = UnitManager::default();
///
/// let ast = parse("variable a: Number = 1; return a", &units).unwrap();
/// assert!(matches!(ast, Node::Sequence { ref statements, .. } if statements.len() == 2));
///
/// assert!(parse("variable = ;", &units).is_err());
/// ```
pub fn parse(source: &str, units: &UnitManager) -> Result<Node, LanguageError> {
    let mut lexer = Lexer::new(source, units);
    parse_program(&mut lexer)
}
