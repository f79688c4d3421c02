use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, function::builtin::quantity_arg},
        units::Quantity,
        value::{core::Value, method::CallContext},
    },
};

/// Rounds to `precision` decimal places, 0 by default.
///
/// Ties go to the even neighbour, so `round(2.5)` is `2` and `round(3.5)`
/// is `4`. The unit is kept.
///
/// # Errors
/// Returns `InvalidArgument` for a precision outside `0..=15`.
///
/// # Example
/// ```
/// use tokenscript::{
///     config::Config,
///     interpreter::{
///         evaluator::function::round::round,
///         value::{core::Value, method::CallContext},
///     },
/// };
///
/// let config = Config::default();
/// let context = CallContext { line:   1,
///                             config: &config, };
///
/// assert_eq!(round(&[Value::number(2.5)], &context).unwrap(), Value::number(2.0));
/// assert_eq!(round(&[Value::number(3.5)], &context).unwrap(), Value::number(4.0));
/// assert_eq!(round(&[Value::with_unit(1.125, "rem"), Value::number(2.0)], &context).unwrap(),
///            Value::with_unit(1.12, "rem"));
/// ```
pub fn round(args: &[Value], ctx: &CallContext) -> EvalResult<Value> {
    let line = ctx.line;
    let quantity = quantity_arg("round", args, 0, line)?;
    let precision = match args.get(1) {
        Some(precision) => precision.as_integer(line)?,
        None => 0,
    };
    let precision = i32::try_from(precision).ok()
                                            .filter(|p| (0..=15).contains(p))
                                            .ok_or_else(|| RuntimeError::InvalidArgument {
                                                details: format!("precision must be between 0 and 15, found {precision}"),
                                                line,
                                            })?;

    let factor = 10f64.powi(precision);
    let value = (quantity.value * factor).round_ties_even() / factor;
    Ok(Value::from(Quantity { value,
                              unit: quantity.unit }))
}
