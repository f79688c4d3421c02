/// Built-in function implementations.
///
/// Contains the numeric helpers (`abs`, `floor`, `ceil`, `sqrt`, `pow`),
/// integer parsing and the `rgba` string builder.
pub mod builtin;
/// Rounding with round-half-to-even.
pub mod round;
/// Logarithm function implementation.
///
/// Supports the natural logarithm and custom bases.
pub mod log;
/// Aggregates: `min`, `max`, `sum` and `average`.
///
/// Each accepts several arguments or a single list.
pub mod min_max;
/// Trigonometric and inverse trigonometric functions.
///
/// Angles may carry an angle unit (`deg`, `rad`, `turn`, `grad`).
pub mod trig;

pub mod core;
