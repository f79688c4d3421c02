use std::collections::HashMap;

use crate::interpreter::value::core::Value;

/// Variables, held in a stack of lexical scopes.
///
/// The first scope is the root and lives as long as the table. Every block
/// pushes a scope on entry and pops it on exit, so names declared inside a
/// block are gone afterwards. Lookups walk from the innermost scope outward.
///
/// # Example
/// ```
/// use tokenscript::interpreter::{symbol_table::SymbolTable, value::core::Value};
///
/// let mut table = SymbolTable::new();
/// table.define("x", Value::number(1.0));
///
/// table.push_scope();
/// table.define("y", Value::number(2.0));
/// assert!(table.assign("x", Value::number(3.0)));
/// table.pop_scope();
///
/// assert_eq!(table.get("x"), Some(&Value::number(3.0)));
/// assert_eq!(table.get("y"), None);
/// ```
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scope_stack: Vec<HashMap<String, Value>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Creates a table with an empty root scope.
    #[must_use]
    pub fn new() -> Self {
        Self { scope_stack: vec![HashMap::new()] }
    }

    /// Enters a new innermost scope.
    pub fn push_scope(&mut self) {
        self.scope_stack.push(HashMap::new());
    }

    /// Leaves the innermost scope, dropping its variables.
    ///
    /// The root scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scope_stack.len() > 1 {
            self.scope_stack.pop();
        }
    }

    /// Number of scopes, the root included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scope_stack.len()
    }

    /// Binds `name` in the innermost scope, replacing any binding of the same
    /// name in that scope.
    pub fn define(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scope_stack.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    /// Looks a variable up, innermost scope first.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scope_stack.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Looks a variable up mutably, innermost scope first.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.scope_stack
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
    }

    /// Replaces the nearest binding of `name`.
    ///
    /// Returns `false` if no scope declares `name`.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        match self.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            },
            None => false,
        }
    }

    /// Returns `true` if the root scope declares `name`.
    #[must_use]
    pub fn is_declared_in_root(&self, name: &str) -> bool {
        self.scope_stack
            .first()
            .is_some_and(|scope| scope.contains_key(name))
    }

    /// Returns `true` if the innermost scope declares `name`.
    #[must_use]
    pub fn is_declared_in_current(&self, name: &str) -> bool {
        self.scope_stack
            .last()
            .is_some_and(|scope| scope.contains_key(name))
    }
}
