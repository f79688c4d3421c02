use std::{
    collections::HashMap,
    sync::{Arc, OnceLock},
};

use tracing::trace;

use crate::{
    ast::Node,
    config::Config,
    error::{LanguageError, RuntimeError},
    interpreter::{
        evaluator::core::{EvalResult, Evaluator, Program},
        parser::parse,
        units::UnitManager,
        value::core::Value,
    },
};

/// A color script: initializer, conversion, or stringify logic written in
/// tokenscript.
///
/// The source is parsed on first use and the tree is kept for later runs.
#[derive(Debug)]
pub struct Script {
    source: String,
    ast:    OnceLock<Arc<Node>>,
}

impl Script {
    /// Wraps script text; nothing is parsed yet.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self { source: source.to_string(),
               ast:    OnceLock::new(), }
    }

    /// Returns the script text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the parsed script, parsing it on the first call.
    ///
    /// Failed parses are not cached.
    pub fn ast(&self, units: &UnitManager) -> Result<Arc<Node>, LanguageError> {
        if let Some(ast) = self.ast.get() {
            return Ok(Arc::clone(ast));
        }
        let ast = Arc::new(parse(&self.source, units)?);
        Ok(Arc::clone(self.ast.get_or_init(|| ast)))
    }

    /// Runs the script in a fresh evaluator.
    ///
    /// `input` is available to the script as both `{input}` and `{value}`.
    /// Any failure, including a parse error in the script itself, is
    /// reported as a `ColorScript` error naming `format`.
    pub fn run(&self, format: &str, input: Value, config: &Config, line: usize) -> EvalResult<Value> {
        let failed = |error: &LanguageError| RuntimeError::ColorScript { format:  format.to_string(),
                                                                        details: error.to_string(),
                                                                        line };
        let ast = self.ast(&config.units).map_err(|e| failed(&e))?;

        trace!(format, "running color script");
        let references = HashMap::from([("input".to_string(), input.clone()),
                                        ("value".to_string(), input)]);
        Evaluator::new(Program::Ast(ast), references, None, Some(config.clone())).interpret()
                                                                                   .map_err(|e| failed(&e))
    }
}
