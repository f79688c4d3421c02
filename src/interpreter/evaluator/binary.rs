/// Routing of binary operators.
pub mod core;

/// Unit-aware arithmetic and string concatenation.
///
/// Numeric operands are handed to the unit manager as quantities; the result
/// comes back as a plain number or a number with a unit.
pub mod arithmetic;

/// Equality and ordering.
pub mod comparison;

/// Logical AND and OR.
pub mod logic;
