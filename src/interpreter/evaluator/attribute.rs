use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        value::{color::ColorSymbol, core::Value, method::CallContext},
    },
};

/// The attribute that starts a color conversion, as in `c.to.rgb()`.
const CONVERSION_ATTRIBUTE: &str = "to";

/// Splits `a.b.c` into the variable `a` and the path `["b", "c"]`.
///
/// Returns `None` unless the chain is rooted at a bare identifier.
fn place_path(node: &Node) -> Option<(&str, Vec<String>)> {
    match node {
        Node::Identifier { name, .. } => Some((name, Vec::new())),
        Node::Attribute { object, name, .. } => {
            let (root, mut path) = place_path(object)?;
            path.push(name.clone());
            Some((root, path))
        },
        _ => None,
    }
}

fn lookup<'a>(value: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, segment| match current {
                   Value::Dictionary(dictionary) => dictionary.entries.as_ref()?.get(segment),
                   Value::Color(color) => color.channels()?.get(segment),
                   _ => None,
               })
}

fn resolve_place<'a>(value: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    match path.split_first() {
        None => Some(value),
        Some((first, rest)) => resolve_place(value.attribute_mut(first)?, rest),
    }
}

/// Returns the color when `.to` on it means a conversion rather than a
/// channel called `to`.
fn conversion_source(value: &Value) -> Option<&ColorSymbol> {
    match value {
        Value::Color(color) if !color.channels()
                                     .is_some_and(|c| c.contains_key(CONVERSION_ATTRIBUTE)) => Some(color),
        _ => None,
    }
}

impl Evaluator {
    /// Reads `object.name`.
    ///
    /// # Errors
    /// Returns `UnknownAttribute` if the value has no such attribute.
    /// Missing dictionary keys read as `Null` instead.
    pub(crate) fn eval_attribute(&mut self, object: &Node, name: &str, line: usize) -> EvalResult<Value> {
        self.eval_expression(object)?.get_attribute(name, line)
    }

    /// Calls `object.name(arguments)`.
    ///
    /// When the receiver is a variable, or an attribute path below one, the
    /// method runs on the stored value so mutating methods such as `append`
    /// or `set` update the variable. Other receivers are temporaries.
    ///
    /// `color.to.<format>()` converts the color into another format.
    ///
    /// # Example
    /// ```
    /// use std::collections::HashMap;
    ///
    /// use tokenscript::interpret;
    ///
    /// let source = "variable d: Dictionary; d.set(\"a\", 1); d.set(\"b\", 2); return d.keys();";
    /// let value = interpret(source, HashMap::new(), None).unwrap();
    ///
    /// assert_eq!(value.to_string(), "a, b");
    /// ```
    pub(crate) fn eval_method_call(&mut self,
                                   object: &Node,
                                   name: &str,
                                   arguments: &[Node],
                                   line: usize)
                                   -> EvalResult<Value> {
        if let Some((root, path)) = place_path(object) {
            if let Some((CONVERSION_ATTRIBUTE, parents)) = path.split_last().map(|(l, p)| (l.as_str(), p))
               && let Some(color) = self.symbols
                                        .get(root)
                                        .and_then(|value| lookup(value, parents))
                                        .and_then(conversion_source)
            {
                let color = color.clone();
                return self.eval_conversion(&color, name, arguments, line);
            }

            let arguments = self.eval_arguments(arguments)?;
            if let Some(value) = self.symbols.get_mut(root)
               && let Some(target) = resolve_place(value, &path)
            {
                let context = CallContext { line,
                                            config: &self.config };
                return target.call_method(name, arguments, &context);
            }

            // Not stored anywhere: evaluate for the proper error or a
            // `Null` dictionary miss.
            let mut receiver = self.eval_expression(object)?;
            let context = CallContext { line,
                                        config: &self.config };
            return receiver.call_method(name, arguments, &context);
        }

        let mut receiver = match object {
            Node::Attribute { object: inner,
                              name: attribute,
                              line: attribute_line, } => {
                let inner = self.eval_expression(inner)?;
                if attribute == CONVERSION_ATTRIBUTE
                   && let Some(color) = conversion_source(&inner)
                {
                    return self.eval_conversion(color, name, arguments, line);
                }
                inner.get_attribute(attribute, *attribute_line)?
            },
            other => self.eval_expression(other)?,
        };

        let arguments = self.eval_arguments(arguments)?;
        let context = CallContext { line,
                                    config: &self.config };
        receiver.call_method(name, arguments, &context)
    }

    /// Runs `color.to.<target>()`.
    fn eval_conversion(&self,
                       color: &ColorSymbol,
                       target: &str,
                       arguments: &[Node],
                       line: usize)
                       -> EvalResult<Value> {
        if !arguments.is_empty() {
            return Err(RuntimeError::ArgumentCountMismatch { name: target.to_string(),
                                                             expected: "0".to_string(),
                                                             found: arguments.len(),
                                                             line });
        }
        let converted = self.config.colors.convert(color, target, &self.config, line)?;
        Ok(Value::Color(converted))
    }
}
