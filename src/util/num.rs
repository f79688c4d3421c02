use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;

/// Safely converts an `i64` to `f64` if and only if it is exactly
/// representable.
///
/// ## Example
/// ```
/// use tokenscript::util::num::{MAX_SAFE_U64_INT, i64_to_f64_checked};
///
/// assert_eq!(i64_to_f64_checked(42, 1).unwrap(), 42.0);
///
/// let big = MAX_SAFE_U64_INT as i64 + 1;
/// assert!(i64_to_f64_checked(big, 1).is_err());
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn i64_to_f64_checked(value: i64, line: usize) -> EvalResult<f64> {
    if value.unsigned_abs() > MAX_SAFE_U64_INT {
        return Err(RuntimeError::InvalidArgument { details: format!("{value} is too large to be represented exactly"),
                                                   line });
    }
    Ok(value as f64)
}

/// Converts a collection length to `f64`.
///
/// Lengths beyond `2^53` are clamped; no realistic program gets there.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn usize_to_f64(value: usize) -> f64 {
    value as f64
}

/// Safely converts an `f64` to `i64` if the value is finite, within range,
/// and not fractional.
///
/// ## Example
/// ```
/// use tokenscript::util::num::f64_to_i64_checked;
///
/// assert_eq!(f64_to_i64_checked(-3.0, 1).unwrap(), -3);
/// assert!(f64_to_i64_checked(1.5, 1).is_err());
/// assert!(f64_to_i64_checked(f64::NAN, 1).is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_checked(value: f64, line: usize) -> EvalResult<i64> {
    if !value.is_finite() {
        return Err(RuntimeError::InvalidArgument { details: format!("cannot convert non-finite value {value} to an integer"),
                                                   line });
    }
    if value.abs() > MAX_SAFE_U64_INT as f64 {
        return Err(RuntimeError::InvalidArgument { details: format!("{value} is too large to be used as an integer"),
                                                   line });
    }
    if value.fract() != 0.0 {
        return Err(RuntimeError::InvalidArgument { details: format!("expected an integer, found {value}"),
                                                   line });
    }
    Ok(value as i64)
}

/// Resolves a possibly negative list index against `length`.
///
/// Negative indices count from the end, so `-1` is the last element.
///
/// ## Example
/// ```
/// use tokenscript::util::num::resolve_index;
///
/// assert_eq!(resolve_index(1.0, 3, 1).unwrap(), 1);
/// assert_eq!(resolve_index(-1.0, 3, 1).unwrap(), 2);
/// assert!(resolve_index(3.0, 3, 1).is_err());
/// ```
pub fn resolve_index(index: f64, length: usize, line: usize) -> EvalResult<usize> {
    let raw = f64_to_i64_checked(index, line)?;
    let length_i64 = i64::try_from(length).unwrap_or(i64::MAX);
    let resolved = if raw < 0 { length_i64 + raw } else { raw };

    if resolved < 0 || resolved >= length_i64 {
        return Err(RuntimeError::IndexOutOfBounds { index: raw,
                                                    length,
                                                    line });
    }
    usize::try_from(resolved).map_err(|_| RuntimeError::IndexOutOfBounds { index: raw,
                                                                          length,
                                                                          line })
}

/// Formats a number the way every tokenscript value displays it.
///
/// Integral values print without a decimal point unless `is_float` is set,
/// in which case at least one decimal digit is kept. Other values use the
/// shortest representation that round-trips.
///
/// ## Example
/// ```
/// use tokenscript::util::num::format_number;
///
/// assert_eq!(format_number(15.0, false), "15");
/// assert_eq!(format_number(1.0, true), "1.0");
/// assert_eq!(format_number(2.5, false), "2.5");
/// assert_eq!(format_number(-0.0, false), "0");
/// ```
#[must_use]
pub fn format_number(value: f64, is_float: bool) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        // Normalizes -0.
        let value = if value == 0.0 { 0.0 } else { value };
        if is_float {
            format!("{value:.1}")
        } else {
            format!("{value:.0}")
        }
    } else {
        value.to_string()
    }
}
