use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        value::{core::Value, number::NumberSymbol, unit::UnitSymbol},
    },
};

impl Evaluator {
    /// Evaluates a unary operation on a value.
    ///
    /// Supported operators:
    /// - `Negate`: numeric negation, keeping the unit.
    /// - `Plus`: numbers and numbers with units pass through unchanged.
    /// - `Not`: boolean negation.
    ///
    /// # Example
    /// ```
    /// use tokenscript::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Evaluator, value::core::Value},
    /// };
    ///
    /// let v = Evaluator::eval_unary(UnaryOperator::Negate, &Value::with_unit(4.0, "px"), 1).unwrap();
    /// assert_eq!(v, Value::with_unit(-4.0, "px"));
    ///
    /// let v = Evaluator::eval_unary(UnaryOperator::Not, &Value::from(false), 1).unwrap();
    /// assert_eq!(v, Value::from(true));
    ///
    /// assert!(Evaluator::eval_unary(UnaryOperator::Not, &Value::number(1.0), 1).is_err());
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
        match (op, value) {
            (UnaryOperator::Negate, Value::Number(NumberSymbol { value: Some(n), is_float })) => {
                Ok(Value::Number(NumberSymbol { value:    Some(-n),
                                                is_float: *is_float, }))
            },
            (UnaryOperator::Negate, Value::NumberWithUnit(UnitSymbol { value: Some(n), unit })) => {
                Ok(Value::with_unit(-n, unit))
            },
            (UnaryOperator::Plus, Value::Number(_) | Value::NumberWithUnit(_)) if !value.is_empty() => {
                Ok(value.clone())
            },
            (UnaryOperator::Not, _) => Ok(Value::from(!value.as_bool(line)?)),
            _ => Err(RuntimeError::TypeError { details: format!("cannot apply '{op}' to {}",
                                                                value.type_label()),
                                               line }),
        }
    }
}
