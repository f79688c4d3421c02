use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use tracing::debug;

use crate::{
    config::Config,
    error::{RuntimeError, SpecError},
    interpreter::{
        colors::{
            graph::{Conversion, ConversionGraph},
            script::Script,
            spec::{ColorFormat, ColorSpecDocument, endpoint_key},
        },
        evaluator::core::EvalResult,
        value::{
            color::{ColorSymbol, HEX_FORMAT, is_hex_color},
            core::Value,
        },
    },
};

/// The registry of color formats and the conversions between them.
///
/// Formats are registered from specification documents before evaluation
/// starts. Each format's initializers become callable functions, and its
/// conversions become edges of a graph that `x.to.<format>()` searches.
///
/// # Example
/// ```
/// use std::collections::HashMap;
///
/// use tokenscript::{config::Config, interpret, interpreter::colors::ColorManager};
///
/// let mut colors = ColorManager::new();
/// colors.register_json(r#"{
///     "$id": "https://example.com/gray/0/",
///     "name": "Gray",
///     "schema": { "properties": { "l": {} }, "required": ["l"], "order": ["l"] },
///     "initializers": [{
///         "keyword": "gray",
///         "script": "variable d: Dictionary; d.set(\"l\", {input}.get(0)); return d;"
///     }]
/// }"#)
///       .unwrap();
///
/// let config = Config::default().with_colors(colors);
/// let value = interpret("gray(50)", HashMap::new(), Some(config.clone())).unwrap();
/// assert_eq!(value.render(&config, 1).unwrap(), "gray(50)");
/// ```
#[derive(Debug, Clone)]
pub struct ColorManager {
    /// Formats by graph node.
    formats:      HashMap<String, Arc<ColorFormat>>,
    /// Graph nodes by lowercase format name.
    names:        HashMap<String, String>,
    /// Graph nodes by lowercase initializer keyword.
    initializers: HashMap<String, String>,
    graph:        ConversionGraph,
}

impl Default for ColorManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorManager {
    /// Creates a registry that only knows the built-in hex format.
    #[must_use]
    pub fn new() -> Self {
        let hex = ColorFormat::hex();
        Self { names:        HashMap::from([(hex.name.to_lowercase(), hex.node.clone())]),
               formats:      HashMap::from([(hex.node.clone(), Arc::new(hex))]),
               initializers: HashMap::new(),
               graph:        ConversionGraph::default(), }
    }

    /// Registers a format from a JSON specification document.
    ///
    /// # Errors
    /// Returns `SpecError::Json` for malformed JSON and the errors of
    /// [`register`](Self::register) for an invalid document.
    pub fn register_json(&mut self, json: &str) -> Result<(), SpecError> {
        let document = serde_json::from_str::<ColorSpecDocument>(json)?;
        self.register(&document)
    }

    /// Registers a format.
    ///
    /// A format registered again under the same name replaces the earlier
    /// registration; its conversions are added to the graph.
    ///
    /// # Errors
    /// Returns a `SpecError` if the document is missing its `$id` or name,
    /// declares another type than `color`, or has a malformed schema.
    pub fn register(&mut self, document: &ColorSpecDocument) -> Result<(), SpecError> {
        let format = ColorFormat::from_document(document)?;

        for conversion in &document.conversions {
            let edge = Conversion { from:   endpoint_key(&conversion.from, &format.node),
                                    to:     endpoint_key(&conversion.to, &format.node),
                                    owner:  format.name.clone(),
                                    script: Script::new(conversion.script.text()), };
            debug!(from = %edge.from, to = %edge.to, "registered color conversion");
            self.graph.add(edge);
        }
        for keyword in format.initializers.keys() {
            self.initializers.insert(keyword.clone(), format.node.clone());
        }

        debug!(name = %format.name, uri = %format.uri, node = %format.node, "registered color format");
        self.names.insert(format.name.to_lowercase(), format.node.clone());
        self.formats.insert(format.node.clone(), Arc::new(format));
        Ok(())
    }

    /// Looks a format up by name, case-insensitively.
    #[must_use]
    pub fn format_by_name(&self, name: &str) -> Option<&ColorFormat> {
        self.names
            .get(&name.to_lowercase())
            .and_then(|node| self.formats.get(node))
            .map(Arc::as_ref)
    }

    /// Number of registered formats, hex included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// Returns `true` if only the built-in hex format is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formats.len() <= 1
    }

    /// Returns `true` if `keyword` is an initializer of some format.
    #[must_use]
    pub fn has_initializer(&self, keyword: &str) -> bool {
        self.initializers.contains_key(&keyword.to_lowercase())
    }

    /// Maps a conversion endpoint to its graph node.
    fn resolve_endpoint(&self, endpoint: &str) -> String {
        if self.formats.contains_key(endpoint) {
            return endpoint.to_string();
        }
        self.names
            .get(endpoint)
            .cloned()
            .unwrap_or_else(|| endpoint.to_string())
    }

    /// Returns `true` if a chain of conversions leads from format `from` to
    /// format `to`.
    #[must_use]
    pub fn has_conversion(&self, from: &str, to: &str) -> bool {
        let (Some(from), Some(to)) = (self.format_by_name(from), self.format_by_name(to)) else {
            return false;
        };
        self.graph
            .find_path(&from.node, &to.node, &|endpoint: &str| self.resolve_endpoint(endpoint))
            .is_some()
    }

    /// Builds a color by running the initializer called `keyword`.
    ///
    /// The script receives the call arguments as the list `{input}` and
    /// returns the channels as a dictionary or a color.
    ///
    /// # Errors
    /// - `UnknownFunction` if no format has this initializer.
    /// - `ColorScript` if the script fails or omits a required channel.
    pub fn initialize(&self,
                      keyword: &str,
                      arguments: Vec<Value>,
                      config: &Config,
                      line: usize)
                      -> EvalResult<Value> {
        let keyword = keyword.to_lowercase();
        let Some(format) = self.initializers
                               .get(&keyword)
                               .and_then(|node| self.formats.get(node))
        else {
            return Err(RuntimeError::UnknownFunction { name: keyword,
                                                       line });
        };
        let Some(script) = format.initializers.get(&keyword) else {
            return Err(RuntimeError::UnknownFunction { name: keyword,
                                                       line });
        };

        let output = script.run(&format.name, Value::list(arguments, false), config, line)?;
        into_color(output, format, line).map(Value::Color)
    }

    /// Converts `color` into the format called `target`.
    ///
    /// The shortest chain of registered conversions is run edge by edge,
    /// each script receiving the previous result as `{input}`.
    ///
    /// # Errors
    /// - `UnknownColorFormat` if either format is not registered.
    /// - `NoConversionPath` if no chain of conversions connects them.
    /// - `ColorScript` if a script fails or returns an unusable value.
    pub fn convert(&self,
                   color: &ColorSymbol,
                   target: &str,
                   config: &Config,
                   line: usize)
                   -> EvalResult<ColorSymbol> {
        let unknown = |name: &str| RuntimeError::UnknownColorFormat { name: name.to_string(),
                                                                      line };
        let source = self.format_by_name(&color.subtype)
                         .ok_or_else(|| unknown(&color.subtype))?;
        let target = self.format_by_name(target).ok_or_else(|| unknown(target))?;

        if source.node == target.node {
            return Ok(color.clone());
        }

        let path = self.graph
                       .find_path(&source.node, &target.node, &|endpoint: &str| {
                           self.resolve_endpoint(endpoint)
                       })
                       .ok_or_else(|| RuntimeError::NoConversionPath { from: source.name.clone(),
                                                                       to: target.name.clone(),
                                                                       line })?;
        debug!(from = %source.name, to = %target.name, hops = path.len(), "converting color");

        let mut current = color.clone();
        for edge in path {
            let node = self.resolve_endpoint(&edge.to);
            let Some(step) = self.formats.get(&node) else {
                return Err(unknown(&edge.to));
            };
            let output = edge.script.run(&edge.owner, Value::Color(current), config, line)?;
            current = into_color(output, step, line)?;
        }
        Ok(current)
    }

    /// Renders a color as text.
    ///
    /// Hex colors render as written. Other colors run their format's
    /// stringify script; without one, a format with a channel order renders
    /// as `name(c1, c2, c3)`, and anything else renders as an empty string.
    ///
    /// # Errors
    /// Returns `ColorScript` if the stringify script fails or does not
    /// return a string.
    pub fn stringify(&self, color: &ColorSymbol, config: &Config, line: usize) -> EvalResult<String> {
        if let Some(hex) = color.hex_value() {
            return Ok(hex.to_string());
        }
        let (Some(format), Some(channels)) = (self.format_by_name(&color.subtype), color.channels())
        else {
            return Ok(String::new());
        };

        if let Some(script) = &format.stringify {
            return match script.run(&format.name, Value::Color(color.clone()), config, line)? {
                Value::String(text) => Ok(text.value.unwrap_or_default()),
                other => Err(RuntimeError::ColorScript { format: format.name.clone(),
                                                         details: format!("stringify returned {}",
                                                                          other.type_label()),
                                                         line }),
            };
        }
        if format.order.is_empty() {
            return Ok(String::new());
        }

        let values = format.order
                           .iter()
                           .map(|channel| channels.get(channel).map(ToString::to_string).unwrap_or_default())
                           .collect::<Vec<_>>();
        Ok(format!("{}({})", format.name.to_lowercase(), values.join(", ")))
    }
}

/// Turns a script result into a color of `format`, checking its required
/// channels.
fn into_color(output: Value, format: &ColorFormat, line: usize) -> EvalResult<ColorSymbol> {
    let failed = |details: String| RuntimeError::ColorScript { format: format.name.clone(),
                                                               details,
                                                               line };

    let channels: BTreeMap<String, Value> = match output {
        Value::Color(color) if color.is_hex() && format.name == HEX_FORMAT => return Ok(color),
        Value::String(text) if format.name == HEX_FORMAT => {
            return match text.value {
                Some(hex) if is_hex_color(&hex) => Ok(ColorSymbol::hex(&hex)),
                other => Err(failed(format!("'{}' is not a hex color", other.unwrap_or_default()))),
            };
        },
        Value::Dictionary(dictionary) => dictionary.entries.unwrap_or_default(),
        Value::Color(color) => match color.channels() {
            Some(channels) => channels.clone(),
            None => return Err(failed(format!("expected channels, found {}", color.subtype))),
        },
        other => return Err(failed(format!("expected a Dictionary or a Color, found {}",
                                           other.type_label()))),
    };

    if let Some(missing) = format.required.iter().find(|channel| !channels.contains_key(*channel)) {
        return Err(failed(format!("missing required channel '{missing}'")));
    }
    Ok(ColorSymbol::with_channels(&format.name, channels))
}
