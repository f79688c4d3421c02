/// Binary operator evaluation logic.
///
/// Handles unit-aware arithmetic, string concatenation, comparisons, and
/// logical operators.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements arithmetic negation, unary plus, and logical NOT.
pub mod unary;

/// Core evaluation logic.
///
/// Contains the `Evaluator`, the expression dispatcher, and the signal type
/// that carries an early `return` up to the top of the program.
pub mod core;

/// Evaluation of statements.
///
/// Declarations, reassignments, blocks and statement sequences.
pub mod statement;

/// Evaluation of `while` and `if`.
///
/// Checks that conditions are booleans and guards loops against running
/// forever.
pub mod control;

/// Attribute reads and method calls.
///
/// Includes in-place method calls on variables and the `.to.<format>()`
/// color conversion.
pub mod attribute;

/// Function evaluation.
///
/// Resolves calls against the built-in functions, the registered color
/// initializers, and the uninterpreted CSS functions, in that order.
pub mod function;
