/// The color module registers color formats and converts between them.
///
/// Color formats are declared by specification documents whose initializer,
/// conversion, and stringify logic are tokenscript scripts. Conversions are
/// resolved by a breadth-first search over the registered conversion graph.
///
/// # Responsibilities
/// - Parses and validates color specifications.
/// - Exposes format initializers as callable functions.
/// - Finds and runs multi-hop conversion paths without revisiting formats.
pub mod colors;
/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator walks the AST, evaluates expressions and statements,
/// performs unit-aware arithmetic, manages scoped variables, and produces
/// the program's result.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Handles variables, control flow, and early `return`.
/// - Reports runtime errors such as type mismatches or runaway loops.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces tokens lazily, one at a
/// time, with one token of lookahead.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with line and column.
/// - Handles numbers, strings, references, hex colors, units, and keywords.
/// - Reports lexical errors for malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// # Responsibilities
/// - Converts tokens into AST nodes using recursive descent.
/// - Distinguishes implicit (space-separated) and explicit (comma-separated)
///   lists.
/// - Validates grammar and reports errors with location info.
pub mod parser;
/// The symbol table holds variables in a chain of lexical scopes.
pub mod symbol_table;
/// The units module classifies unit keywords and combines quantities.
///
/// Units are grouped in categories; absolute units convert to their
/// category's canonical unit and relative units resolve against a
/// co-operand.
pub mod units;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the closed set of value variants and their method
/// tables, attribute access, display, and type compatibility rules.
///
/// # Responsibilities
/// - Defines the `Value` enum and the per-variant symbol types.
/// - Implements method dispatch with arity checking.
/// - Imports host data into values.
pub mod value;
