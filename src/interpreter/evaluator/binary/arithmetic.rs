use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        value::core::Value,
    },
};

impl Evaluator {
    /// Evaluates `+`, `-`, `*`, `/` and `^`.
    ///
    /// Two strings joined with `+` concatenate. Numbers, with or without a
    /// unit, are combined by the unit manager: same units stay, convertible
    /// units are converted to their category's canonical unit, and relative
    /// units such as `%` resolve against the other operand.
    ///
    /// # Errors
    /// - `InvalidOperation` for any other operand types.
    /// - `UnitMismatch`, `AmbiguousRelativeUnits` or `DivisionByZero` from the
    ///   unit manager.
    ///
    /// # Example
    /// ```
    /// use std::collections::HashMap;
    ///
    /// use tokenscript::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Evaluator, value::core::Value},
    /// };
    ///
    /// let evaluator = Evaluator::new("", HashMap::new(), None, None);
    ///
    /// let scaled = evaluator.eval_arithmetic(BinaryOperator::Mul,
    ///                                        &Value::number(100.0),
    ///                                        &Value::with_unit(25.0, "%"),
    ///                                        1);
    /// assert_eq!(scaled.unwrap(), Value::number(25.0));
    ///
    /// let joined = evaluator.eval_arithmetic(BinaryOperator::Add,
    ///                                        &Value::string("a"),
    ///                                        &Value::string("b"),
    ///                                        1);
    /// assert_eq!(joined.unwrap(), Value::string("ab"));
    /// ```
    pub fn eval_arithmetic(&self,
                           op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           line: usize)
                           -> EvalResult<Value> {
        match (left, right) {
            (Value::String(_), Value::String(_)) if op == BinaryOperator::Add => {
                Ok(Value::string(format!("{}{}", left.as_str(line)?, right.as_str(line)?)))
            },
            (Value::Number(_) | Value::NumberWithUnit(_), Value::Number(_) | Value::NumberWithUnit(_))
                if !left.is_empty() && !right.is_empty() =>
            {
                let operands = [left.as_quantity(line)?, right.as_quantity(line)?];
                let result = self.config.units.combine(op, &operands, line)?;
                Ok(Value::from(result))
            },
            _ => Err(RuntimeError::InvalidOperation { op: op.to_string(),
                                                      left: left.type_label(),
                                                      right: right.type_label(),
                                                      line }),
        }
    }
}
