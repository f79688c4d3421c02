use crate::{
    ast::{Node, TypeDecl},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator, Flow, Signal},
        value::core::{Value, ValueType},
    },
};

/// Characters a declared variable name may not contain.
const FORBIDDEN_NAME_CHARS: [char; 3] = ['.', '[', '-'];

impl Evaluator {
    /// Evaluates a statement.
    ///
    /// Statements that are plain expressions yield their value;
    /// declarations and reassignments yield `Null`. A `return` stops
    /// evaluation with [`Signal::Return`].
    pub fn eval_statement(&mut self, node: &Node) -> Flow<Value> {
        match node {
            Node::Declaration { name,
                                type_decl,
                                value,
                                line, } => {
                self.eval_declaration(name, type_decl, value.as_deref(), *line)?;
                Ok(Value::Null)
            },
            Node::Reassignment { name,
                                 path,
                                 value,
                                 line, } => {
                self.eval_reassignment(name, path, value, *line)?;
                Ok(Value::Null)
            },
            Node::Return { value, line } => {
                self.result_line = *line;
                let value = match value {
                    Some(expr) => self.eval_expression(expr)?,
                    None => Value::Null,
                };
                Err(Signal::Return(value))
            },
            Node::While { condition,
                          body,
                          line, } => self.eval_while(condition, body, *line),
            Node::If { branches,
                       else_branch,
                       .. } => self.eval_if(branches, else_branch.as_deref()),
            Node::Block { body, .. } => self.eval_block(body),
            Node::Sequence { statements, .. } => {
                let mut last = Value::Null;
                for statement in statements {
                    last = self.eval_statement(statement)?;
                }
                Ok(last)
            },
            expr => {
                self.result_line = expr.line_number();
                Ok(self.eval_expression(expr)?)
            },
        }
    }

    /// Evaluates `body` in a child scope that is dropped afterwards, also
    /// when the body returns or fails.
    pub(crate) fn eval_block(&mut self, body: &Node) -> Flow<Value> {
        self.symbols.push_scope();
        let result = self.eval_statement(body);
        self.symbols.pop_scope();
        result
    }

    /// Declares a variable.
    ///
    /// # Errors
    /// - `InvalidVariableName` if the name contains `.`, `[` or `-`.
    /// - `VariableRedeclaration` if the root or current scope already
    ///   declares it.
    /// - `UnknownType` for an unknown type or color format.
    /// - `TypeError` if the initializer does not fit the type.
    fn eval_declaration(&mut self,
                        name: &str,
                        type_decl: &TypeDecl,
                        value: Option<&Node>,
                        line: usize)
                        -> EvalResult<()> {
        if name.contains(FORBIDDEN_NAME_CHARS) {
            return Err(RuntimeError::InvalidVariableName { name: name.to_string(),
                                                           line });
        }
        if self.symbols.is_declared_in_root(name) || self.symbols.is_declared_in_current(name) {
            return Err(RuntimeError::VariableRedeclaration { name: name.to_string(),
                                                             line });
        }

        let declared = ValueType::resolve(type_decl, &self.config.colors, line)?;
        let value = match value {
            Some(expr) => self.eval_expression(expr)?.coerce_to(&declared, line)?,
            None => declared.empty(),
        };

        self.symbols.define(name, value);
        Ok(())
    }

    /// Assigns to a variable or to an attribute below it.
    ///
    /// A plain assignment must keep the variable's type. For `a.b.c = v`,
    /// `a.b` must be a dictionary or a color and `c` is written with its
    /// attribute setter.
    fn eval_reassignment(&mut self,
                         name: &str,
                         path: &[String],
                         value: &Node,
                         line: usize)
                         -> EvalResult<()> {
        let value = self.eval_expression(value)?;
        let Some(slot) = self.symbols.get_mut(name) else {
            return Err(RuntimeError::UnknownVariable { name: name.to_string(),
                                                       line });
        };

        let Some((last, parents)) = path.split_last() else {
            if !slot.valid_value(&value) {
                return Err(RuntimeError::TypeError { details: format!("cannot assign {} to '{name}' of type {}",
                                                                      value.type_label(),
                                                                      slot.type_label()),
                                                     line });
            }
            *slot = if slot.kind().matches(&value) {
                value
            } else {
                value.coerce_to(&slot.kind(), line)?
            };
            return Ok(());
        };

        let mut target = slot;
        for segment in parents {
            let type_name = target.type_label();
            target = target.attribute_mut(segment)
                           .ok_or_else(|| RuntimeError::UnknownAttribute { type_name,
                                                                           name: segment.clone(),
                                                                           line })?;
        }
        target.set_attribute(last, value, line)
    }
}
