use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, function::builtin::{number_arg, quantity_arg}},
        units::UnitKind,
        value::{core::Value, method::CallContext},
    },
};

/// The category whose units an angle argument may carry.
const ANGLE_CATEGORY: &str = "angle";

/// Applies `f` to an angle.
///
/// Plain numbers are radians. Numbers with an angle unit are converted
/// through the unit's ratio to degrees, e.g. `sin(90deg)` is `1`.
///
/// # Example
/// ```
/// use tokenscript::{
///     config::Config,
///     interpreter::{
///         evaluator::function::trig::direct,
///         value::{core::Value, method::CallContext},
///     },
/// };
///
/// let config = Config::default();
/// let context = CallContext { line:   1,
///                             config: &config, };
///
/// assert_eq!(direct(f64::sin, &[Value::with_unit(90.0, "deg")], &context).unwrap(),
///            Value::number(1.0));
/// assert_eq!(direct(f64::cos, &[Value::number(0.0)], &context).unwrap(), Value::number(1.0));
/// assert!(direct(f64::sin, &[Value::with_unit(1.0, "px")], &context).is_err());
/// ```
pub fn direct(f: fn(f64) -> f64, args: &[Value], ctx: &CallContext) -> EvalResult<Value> {
    let line = ctx.line;
    let angle = quantity_arg("trig", args, 0, line)?;

    let radians = match angle.unit.as_deref() {
        None => angle.value,
        Some(unit) => {
            let ratio = ctx.config
                           .units
                           .get(unit)
                           .filter(|spec| spec.category == ANGLE_CATEGORY)
                           .and_then(|spec| match spec.kind {
                               UnitKind::Absolute { ratio } => ratio,
                               UnitKind::Relative { .. } => None,
                           })
                           .ok_or_else(|| RuntimeError::InvalidArgument {
                               details: format!("expected an angle, found unit '{unit}'"),
                               line,
                           })?;
            (angle.value * ratio).to_radians()
        },
    };

    Ok(Value::number(f(radians)))
}

/// Applies an inverse trigonometric function, returning radians.
///
/// # Errors
/// `asin` and `acos` return `InvalidArgument` outside `[-1, 1]`.
pub fn inverse(name: &str, f: fn(f64) -> f64, args: &[Value], ctx: &CallContext) -> EvalResult<Value> {
    let value = number_arg(name, args, 0, ctx.line)?;

    if name != "atan" && !(-1.0..=1.0).contains(&value) {
        return Err(RuntimeError::InvalidArgument { details: format!("{name} is only defined on [-1, 1]"),
                                                   line:    ctx.line, });
    }
    Ok(Value::number(f(value)))
}
