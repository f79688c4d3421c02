/// Numeric conversion and formatting helpers.
///
/// This module provides safe functions for converting between integer and
/// floating-point types without silent data loss, plus the canonical textual
/// form of numbers used by every value that displays one.
///
/// Conversions return a `Result`, which is `Ok` if the conversion is lossless
/// and valid, or a runtime error if the value is out of range or fractional.
pub mod num;
