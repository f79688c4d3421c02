use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        value::core::Value,
    },
};

impl Evaluator {
    /// Evaluates a logical operation between two boolean values.
    ///
    /// Both operands are evaluated before the call and must be booleans;
    /// there is no short-circuiting.
    ///
    /// # Example
    /// ```
    /// use tokenscript::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Evaluator, value::core::Value},
    /// };
    ///
    /// let a = Value::from(true);
    /// let b = Value::from(false);
    ///
    /// let result = Evaluator::eval_logic(BinaryOperator::Or, &a, &b, 1);
    /// assert_eq!(result.unwrap(), Value::from(true));
    ///
    /// assert!(Evaluator::eval_logic(BinaryOperator::And, &a, &Value::number(1.0), 1).is_err());
    /// ```
    pub fn eval_logic(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
        let (left, right) = (left.as_bool(line)?, right.as_bool(line)?);

        match op {
            BinaryOperator::And => Ok(Value::from(left && right)),
            _ => Ok(Value::from(left || right)),
        }
    }
}
