use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, function::builtin::number_arg},
        value::{core::Value, method::CallContext},
    },
};

/// Computes the logarithm of a value, natural unless a base is given.
///
/// `log_base(value) = ln(value) / ln(base)`.
///
/// # Errors
/// Returns `InvalidArgument` if the value is not positive, or if the base is
/// not positive or equals `1`.
///
/// # Example
/// ```
/// use tokenscript::{
///     config::Config,
///     interpreter::{
///         evaluator::function::log::log,
///         value::{core::Value, method::CallContext},
///     },
/// };
///
/// let config = Config::default();
/// let context = CallContext { line:   1,
///                             config: &config, };
///
/// let result = log(&[Value::number(8.0), Value::number(2.0)], &context).unwrap();
/// assert_eq!(result, Value::number(3.0));
///
/// assert!(log(&[Value::number(0.0)], &context).is_err());
/// assert!(log(&[Value::number(8.0), Value::number(1.0)], &context).is_err());
/// ```
pub fn log(args: &[Value], ctx: &CallContext) -> EvalResult<Value> {
    let line = ctx.line;
    let value = number_arg("log", args, 0, line)?;
    if value <= 0.0 {
        return Err(RuntimeError::InvalidArgument { details: "log is only defined for positive numbers".to_string(),
                                                   line });
    }

    let Some(base) = args.get(1) else {
        return Ok(Value::number(value.ln()));
    };
    let base = base.as_number(line)?;
    if base <= 0.0 || base == 1.0 {
        return Err(RuntimeError::InvalidArgument { details: "log base must be positive and not 1".to_string(),
                                                   line });
    }

    Ok(Value::number(value.ln() / base.ln()))
}
