use tracing::debug;

use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator, Flow},
        value::core::Value,
    },
};

impl Evaluator {
    /// Evaluates a `while` loop.
    ///
    /// The body may run at most `max_iterations` times; needing one more
    /// iteration is an `IterationLimit` error.
    ///
    /// # Example
    /// ```
    /// use std::collections::HashMap;
    ///
    /// use tokenscript::{config::Config, interpret};
    ///
    /// let config = Config::default().with_max_iterations(3);
    /// let source = "variable i: Number = 0; while (i < 3) [ i = i + 1; ] return i;";
    /// assert_eq!(interpret(source, HashMap::new(), Some(config.clone())).unwrap().to_string(),
    ///            "3");
    ///
    /// assert!(interpret("while (true) [ ]", HashMap::new(), Some(config)).is_err());
    /// ```
    pub(crate) fn eval_while(&mut self, condition: &Node, body: &Node, line: usize) -> Flow<Value> {
        let limit = self.config.max_iterations;
        let mut iterations = 0usize;

        while self.eval_condition(condition)? {
            iterations += 1;
            if iterations > limit {
                debug!(limit, line, "loop iteration limit reached");
                return Err(RuntimeError::IterationLimit { limit, line }.into());
            }
            self.eval_statement(body)?;
        }
        Ok(Value::Null)
    }

    /// Evaluates an `if` chain: the first branch whose condition holds runs,
    /// otherwise the `else` block if there is one.
    pub(crate) fn eval_if(&mut self, branches: &[(Node, Node)], else_branch: Option<&Node>) -> Flow<Value> {
        for (condition, body) in branches {
            if self.eval_condition(condition)? {
                return self.eval_statement(body);
            }
        }
        match else_branch {
            Some(body) => self.eval_statement(body),
            None => Ok(Value::Null),
        }
    }

    /// Evaluates a condition, which must be a boolean.
    fn eval_condition(&mut self, condition: &Node) -> EvalResult<bool> {
        let line = condition.line_number();
        match self.eval_expression(condition)? {
            Value::Boolean(b) => b.value.ok_or_else(|| RuntimeError::TypeError {
                details: "the condition has no value".to_string(),
                line,
            }),
            other => Err(RuntimeError::TypeError { details: format!("expected a Boolean condition, found {}",
                                                                    other.type_label()),
                                                   line }),
        }
    }
}
