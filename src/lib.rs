//! # tokenscript
//!
//! tokenscript is an embeddable language for computing design-token values.
//! It lexes, parses, and evaluates small programs with typed variables,
//! control flow, unit-aware arithmetic, and an extensible color model whose
//! formats and conversions are themselves written in tokenscript.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc, clippy::multiple_crate_versions)]

use std::collections::HashMap;

use crate::{
    config::Config,
    error::LanguageError,
    interpreter::{evaluator::core::Evaluator, value::core::Value},
};

/// Defines the structure of parsed code.
///
/// This module declares the `Node` enum that represents a program as a tree.
/// The AST is built by the parser and walked by the evaluator. Nodes can be
/// rendered back into source text.
///
/// # Responsibilities
/// - Defines expression and statement nodes for all language constructs.
/// - Attaches source lines to every node for error reporting.
/// - Renders nodes back to canonical source.
pub mod ast;
/// Runtime configuration shared by every evaluation.
///
/// Bundles the loop iteration limit with the color and unit registries. A
/// `Config` is cheap to clone and is handed to nested evaluators that run
/// color scripts.
pub mod config;
/// Provides unified error types for lexing, parsing, and evaluation.
///
/// This module defines all errors that can be raised while interpreting a
/// program or registering a specification. Every error carries a message,
/// the source line, and where possible the offending token.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Renders parse errors with a caret-marked source excerpt.
/// - Integrates with `std::error::Error` through `thiserror`.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations, units, and colors to provide a complete runtime for
/// tokenscript programs.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Hosts the unit and color registries.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// Resolves whole design-token trees.
///
/// Walks a nested JSON token document, evaluates each token value with the
/// interpreter, and produces a flat map from dotted path to rendered value.
pub mod token_set;
/// General utilities for safe numeric conversion and number formatting.
pub mod util;

/// Interprets a program and returns its final value.
///
/// This is the main entry point for hosts. The source is parsed and evaluated
/// with the given references. When `config` is `None` the default
/// configuration is used, which knows the default units but no color formats.
///
/// # Errors
/// Returns the first lexical, syntax, or runtime error encountered.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
///
/// use tokenscript::interpret;
///
/// let value = interpret("variable x: Number = 10 + 5; return x.to_string().concat(\"px\");",
///                       HashMap::new(),
///                       None).unwrap();
/// assert_eq!(value.to_string(), "15px");
///
/// // Unknown variables are reported as runtime errors.
/// assert!(interpret("return y;", HashMap::new(), None).is_err());
/// ```
pub fn interpret(source: &str,
                 references: HashMap<String, Value>,
                 config: Option<Config>)
                 -> Result<Value, LanguageError> {
    Evaluator::new(source, references, None, config).interpret()
}

/// Interprets a program and renders its result as text.
///
/// Colors are rendered through their format's stringify script, lists are
/// joined according to their kind, and numbers use their display form.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
///
/// use tokenscript::{interpret_to_string, interpreter::value::core::Value};
///
/// let references = HashMap::from([("base".to_string(), Value::number(8.0))]);
/// let text = interpret_to_string("{base} * 2px", references, None).unwrap();
/// assert_eq!(text, "16px");
/// ```
pub fn interpret_to_string(source: &str,
                           references: HashMap<String, Value>,
                           config: Option<Config>)
                           -> Result<String, LanguageError> {
    let config = config.unwrap_or_default();
    let mut evaluator = Evaluator::new(source, references, None, Some(config.clone()));
    let value = evaluator.interpret()?;
    Ok(value.render(&config, evaluator.result_line())?)
}
