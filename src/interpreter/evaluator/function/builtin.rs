use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        units::Quantity,
        value::{core::Value, method::CallContext},
    },
    util::num::{format_number, i64_to_f64_checked},
};

/// Applies `f` to a number, keeping its unit.
///
/// Used for `abs`, `floor` and `ceil`.
///
/// # Example
/// ```
/// use tokenscript::{
///     config::Config,
///     interpreter::{
///         evaluator::function::builtin::keep_unit,
///         value::{core::Value, method::CallContext},
///     },
/// };
///
/// let config = Config::default();
/// let context = CallContext { line:   1,
///                             config: &config, };
///
/// let r = keep_unit("floor", f64::floor, &[Value::with_unit(2.7, "px")], &context).unwrap();
/// assert_eq!(r, Value::with_unit(2.0, "px"));
/// ```
pub fn keep_unit(name: &str, f: fn(f64) -> f64, args: &[Value], ctx: &CallContext) -> EvalResult<Value> {
    let quantity = quantity_arg(name, args, 0, ctx.line)?;
    Ok(Value::from(Quantity { value: f(quantity.value),
                              unit:  quantity.unit, }))
}

/// Computes the square root of a non-negative number.
///
/// # Errors
/// Returns `InvalidArgument` for a negative argument.
pub fn sqrt(args: &[Value], ctx: &CallContext) -> EvalResult<Value> {
    let value = number_arg("sqrt", args, 0, ctx.line)?;
    if value < 0.0 {
        return Err(RuntimeError::InvalidArgument { details: format!("sqrt of negative number {}",
                                                                    format_number(value, false)),
                                                   line:    ctx.line, });
    }
    Ok(Value::number(value.sqrt()))
}

/// Raises the first argument to the power of the second.
///
/// The base may carry a unit, which the result keeps; the exponent must be
/// a plain number.
pub fn pow(args: &[Value], ctx: &CallContext) -> EvalResult<Value> {
    let base = quantity_arg("pow", args, 0, ctx.line)?;
    let exponent = quantity_arg("pow", args, 1, ctx.line)?;
    let result = ctx.config.units.combine(BinaryOperator::Pow, &[base, exponent], ctx.line)?;
    Ok(Value::from(result))
}

/// Parses a string as an integer in the given radix, 10 by default.
///
/// Surrounding whitespace and a leading sign are accepted.
///
/// # Example
/// ```
/// use tokenscript::{
///     config::Config,
///     interpreter::{
///         evaluator::function::builtin::parse_int,
///         value::{core::Value, method::CallContext},
///     },
/// };
///
/// let config = Config::default();
/// let context = CallContext { line:   1,
///                             config: &config, };
///
/// let r = parse_int(&[Value::string("ff"), Value::number(16.0)], &context).unwrap();
/// assert_eq!(r, Value::number(255.0));
///
/// assert!(parse_int(&[Value::string("12px")], &context).is_err());
/// ```
pub fn parse_int(args: &[Value], ctx: &CallContext) -> EvalResult<Value> {
    let line = ctx.line;
    let text = string_arg("parse_int", args, 0, line)?;
    let radix = match args.get(1) {
        Some(radix) => radix.as_integer(line)?,
        None => 10,
    };
    let radix = u32::try_from(radix).ok()
                                    .filter(|r| (2..=36).contains(r))
                                    .ok_or_else(|| RuntimeError::InvalidArgument {
                                        details: format!("radix must be between 2 and 36, found {radix}"),
                                        line,
                                    })?;

    let parsed = i64::from_str_radix(text.trim(), radix).map_err(|_| RuntimeError::InvalidArgument {
        details: format!("cannot parse '{text}' as an integer in base {radix}"),
        line,
    })?;
    Ok(Value::number(i64_to_f64_checked(parsed, line)?))
}

/// Builds the string `rgba(r, g, b, a)`; the alpha defaults to `1`.
pub fn rgba(args: &[Value], ctx: &CallContext) -> EvalResult<Value> {
    let mut channels = (0..3).map(|index| number_arg("rgba", args, index, ctx.line))
                             .collect::<EvalResult<Vec<_>>>()?;
    channels.push(match args.get(3) {
                      Some(_) => number_arg("rgba", args, 3, ctx.line)?,
                      None => 1.0,
                  });

    let rendered = channels.iter()
                           .map(|value| format_number(*value, false))
                           .collect::<Vec<_>>();
    Ok(Value::string(format!("rgba({})", rendered.join(", "))))
}

/// Reads argument `index` as a plain number.
pub(crate) fn number_arg(name: &str, args: &[Value], index: usize, line: usize) -> EvalResult<f64> {
    argument(name, args, index, line)?.as_number(line)
}

/// Reads argument `index` as a number with or without a unit.
pub(crate) fn quantity_arg(name: &str, args: &[Value], index: usize, line: usize) -> EvalResult<Quantity> {
    argument(name, args, index, line)?.as_quantity(line)
}

fn string_arg<'a>(name: &str, args: &'a [Value], index: usize, line: usize) -> EvalResult<&'a str> {
    argument(name, args, index, line)?.as_str(line)
}

fn argument<'a>(name: &str, args: &'a [Value], index: usize, line: usize) -> EvalResult<&'a Value> {
    args.get(index)
        .ok_or_else(|| RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                                             expected: format!("at least {}",
                                                                               index + 1),
                                                             found: args.len(),
                                                             line })
}
