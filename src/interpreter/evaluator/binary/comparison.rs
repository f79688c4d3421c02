use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        value::core::Value,
    },
};

/// Maps an equality operator and an equality result to the final boolean.
fn equality_result(op: BinaryOperator, is_equal: bool) -> bool {
    match op {
        BinaryOperator::NotEqual => !is_equal,
        _ => is_equal,
    }
}

/// Maps a relational operator and an ordering to the final boolean.
fn ordering_result(op: BinaryOperator, ordering: Option<Ordering>) -> bool {
    match (op, ordering) {
        (BinaryOperator::Less, Some(o)) => o.is_lt(),
        (BinaryOperator::Greater, Some(o)) => o.is_gt(),
        (BinaryOperator::LessEqual, Some(o)) => o.is_le(),
        (BinaryOperator::GreaterEqual, Some(o)) => o.is_ge(),
        (BinaryOperator::Equal, Some(o)) => o.is_eq(),
        (BinaryOperator::NotEqual, Some(o)) => o.is_ne(),
        // NaN compares unequal to everything.
        (BinaryOperator::NotEqual, None) => true,
        _ => false,
    }
}

impl Evaluator {
    /// Evaluates a comparison of the form `Value <Operator> Value`.
    ///
    /// Both operands must belong to the same category: numbers (with or
    /// without unit), strings, or booleans. Two numbers with units must use
    /// the same unit. Colors, lists and dictionaries support `==` and `!=`
    /// against values of their own type.
    ///
    /// # Parameters
    /// - `op`: The comparison operator.
    /// - `left`: The left-hand value.
    /// - `right`: The right-hand value.
    /// - `line`: Current line number used for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing a boolean result.
    ///
    /// # Example
    /// ```
    /// use tokenscript::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Evaluator, value::core::Value},
    /// };
    ///
    /// let a = Value::with_unit(3.0, "px");
    /// let b = Value::with_unit(5.0, "px");
    ///
    /// let result = Evaluator::eval_comparison(BinaryOperator::Less, &a, &b, 1);
    /// assert_eq!(result.unwrap(), Value::from(true));
    ///
    /// let c = Value::with_unit(5.0, "rem");
    /// assert!(Evaluator::eval_comparison(BinaryOperator::Less, &a, &c, 1).is_err());
    /// ```
    pub fn eval_comparison(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           line: usize)
                           -> EvalResult<Value> {
        let invalid = || RuntimeError::InvalidOperation { op: op.to_string(),
                                                          left: left.type_label(),
                                                          right: right.type_label(),
                                                          line };
        let is_equality = matches!(op, BinaryOperator::Equal | BinaryOperator::NotEqual);

        let result = match (left, right) {
            (Value::Number(_) | Value::NumberWithUnit(_), Value::Number(_) | Value::NumberWithUnit(_)) => {
                let (l, r) = (left.as_quantity(line)?, right.as_quantity(line)?);
                if let (Some(a), Some(b)) = (&l.unit, &r.unit)
                   && a != b
                {
                    return Err(RuntimeError::UnitMismatch { left: a.clone(),
                                                            right: b.clone(),
                                                            line });
                }
                ordering_result(op, l.value.partial_cmp(&r.value))
            },
            (Value::String(_), Value::String(_)) => {
                ordering_result(op, Some(left.as_str(line)?.cmp(right.as_str(line)?)))
            },
            (Value::Boolean(_), Value::Boolean(_)) if is_equality => {
                equality_result(op, left.as_bool(line)? == right.as_bool(line)?)
            },
            (Value::Color(_), Value::Color(_))
            | (Value::List(_), Value::List(_))
            | (Value::Dictionary(_), Value::Dictionary(_))
            | (Value::Null, Value::Null)
                if is_equality =>
            {
                equality_result(op, left.equals(right))
            },
            _ => return Err(invalid()),
        };

        Ok(Value::from(result))
    }
}
