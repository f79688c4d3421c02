use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        units::Quantity,
        value::{core::Value, list::ListSymbol, method::CallContext},
    },
    util::num::usize_to_f64,
};

/// Spreads a single list argument into its elements.
fn flatten(args: &[Value]) -> &[Value] {
    match args {
        [Value::List(ListSymbol { elements: Some(elements), .. })] => elements,
        _ => args,
    }
}

fn quantities(args: &[Value], line: usize) -> EvalResult<Vec<Quantity>> {
    flatten(args).iter().map(|value| value.as_quantity(line)).collect()
}

/// Computes the minimum or maximum of its arguments.
///
/// Accepts any number of arguments or a single list. All arguments must
/// share the same unit, or all be plain numbers.
///
/// The operation is selected by the `name` parameter, which must be `"min"` or
/// `"max"`.
///
/// # Example
/// ```
/// use tokenscript::{
///     config::Config,
///     interpreter::{
///         evaluator::function::min_max::min_max,
///         value::{core::Value, method::CallContext},
///     },
/// };
///
/// let config = Config::default();
/// let context = CallContext { line:   1,
///                             config: &config, };
///
/// let r = min_max("min", &[Value::number(3.0), Value::number(7.0), Value::number(-1.0)], &context);
/// assert_eq!(r.unwrap(), Value::number(-1.0));
///
/// let r = min_max("max", &[Value::with_unit(2.0, "px"), Value::with_unit(5.0, "px")], &context);
/// assert_eq!(r.unwrap(), Value::with_unit(5.0, "px"));
///
/// let r = min_max("max", &[Value::with_unit(2.0, "px"), Value::with_unit(5.0, "rem")], &context);
/// assert!(r.is_err());
/// ```
pub fn min_max(name: &str, args: &[Value], ctx: &CallContext) -> EvalResult<Value> {
    let line = ctx.line;
    let values = quantities(args, line)?;
    let Some((first, rest)) = values.split_first() else {
        return Err(RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                                         expected: "at least 1".to_string(),
                                                         found: 0,
                                                         line });
    };

    let mut best = first.value;
    for quantity in rest {
        if quantity.unit != first.unit {
            return Err(RuntimeError::UnitMismatch { left: first.unit.clone().unwrap_or_else(|| "number".to_string()),
                                                    right: quantity.unit.clone().unwrap_or_else(|| "number".to_string()),
                                                    line });
        }
        best = if name == "min" {
            best.min(quantity.value)
        } else {
            best.max(quantity.value)
        };
    }

    Ok(Value::from(Quantity { value: best,
                              unit:  first.unit.clone(), }))
}

/// Adds its arguments with unit conversion, like a chain of `+`.
///
/// # Errors
/// Returns `ArgumentCountMismatch` for fewer than two values.
///
/// # Example
/// ```
/// use tokenscript::{
///     config::Config,
///     interpreter::{
///         evaluator::function::min_max::sum,
///         value::{core::Value, method::CallContext},
///     },
/// };
///
/// let config = Config::default();
/// let context = CallContext { line:   1,
///                             config: &config, };
///
/// let r = sum(&[Value::with_unit(1.0, "rem"), Value::with_unit(4.0, "px")], &context);
/// assert_eq!(r.unwrap(), Value::with_unit(20.0, "px"));
///
/// assert!(sum(&[Value::number(1.0)], &context).is_err());
/// ```
pub fn sum(args: &[Value], ctx: &CallContext) -> EvalResult<Value> {
    let values = quantities(args, ctx.line)?;
    if values.len() < 2 {
        return Err(RuntimeError::ArgumentCountMismatch { name: "sum".to_string(),
                                                         expected: "at least 2".to_string(),
                                                         found: values.len(),
                                                         line: ctx.line });
    }
    let total = ctx.config.units.combine(BinaryOperator::Add, &values, ctx.line)?;
    Ok(Value::from(total))
}

/// Computes the arithmetic mean of its arguments.
pub fn average(args: &[Value], ctx: &CallContext) -> EvalResult<Value> {
    let values = quantities(args, ctx.line)?;
    if values.is_empty() {
        return Err(RuntimeError::ArgumentCountMismatch { name: "average".to_string(),
                                                         expected: "at least 1".to_string(),
                                                         found: 0,
                                                         line: ctx.line });
    }
    let total = ctx.config.units.combine(BinaryOperator::Add, &values, ctx.line)?;
    let count = usize_to_f64(values.len());
    Ok(Value::from(Quantity { value: total.value / count,
                              unit:  total.unit, }))
}
