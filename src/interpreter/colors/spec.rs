use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{error::SpecError, interpreter::colors::script::Script};

/// The placeholder a conversion uses for its own specification's URI.
pub const SELF_ENDPOINT: &str = "$self";

/// A color format specification as written by the host.
///
/// Unknown fields are ignored, so full JSON-schema documents can be
/// registered as they are.
#[derive(Debug, Clone, Deserialize)]
pub struct ColorSpecDocument {
    /// The specification URI.
    #[serde(rename = "$id", default)]
    pub id:           Option<String>,
    /// The format name, e.g. `RGB`.
    #[serde(default)]
    pub name:         Option<String>,
    /// Must be `color` when present.
    #[serde(rename = "type", default)]
    pub kind:         Option<String>,
    /// The channel schema.
    #[serde(default)]
    pub schema:       Option<SchemaDocument>,
    /// Functions that build a color of this format.
    #[serde(default)]
    pub initializers: Vec<InitializerDocument>,
    /// Conversions from or to this format.
    #[serde(default)]
    pub conversions:  Vec<ConversionDocument>,
    /// The script that renders a color of this format.
    #[serde(default)]
    pub stringify:    Option<ScriptSource>,
}

/// The channel part of a specification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaDocument {
    /// Channel declarations by name; only the names are used.
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
    /// Channels every color of the format must have.
    #[serde(default)]
    pub required:   Vec<String>,
    /// The channel order used for rendering.
    #[serde(default)]
    pub order:      Vec<String>,
}

/// An initializer: `keyword(args...)` runs `script`.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializerDocument {
    /// The function name.
    pub keyword: String,
    /// The script building the channels.
    pub script:  ScriptSource,
}

/// A conversion edge between two formats.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversionDocument {
    /// The source format: `$self`, a URI, or a format name.
    #[serde(alias = "source")]
    pub from:   String,
    /// The target format: `$self`, a URI, or a format name.
    #[serde(alias = "target")]
    pub to:     String,
    /// The script producing the target color.
    pub script: ScriptSource,
}

/// Script text, either bare or wrapped in `{ "type", "script" }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScriptSource {
    /// `"script": "return ..."`
    Text(String),
    /// `"script": { "type": "...", "script": "return ..." }`
    Wrapped {
        /// The script text.
        script: String,
    },
}

impl ScriptSource {
    /// Returns the script text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Wrapped { script: text } => text,
        }
    }
}

/// A validated, registered color format.
#[derive(Debug)]
pub struct ColorFormat {
    /// The graph node of this format, see [`normalize_uri`].
    pub node:         String,
    /// The specification URI as registered.
    pub uri:          String,
    /// The format name, used as the color subtype.
    pub name:         String,
    /// Channels every color of the format must have.
    pub required:     Vec<String>,
    /// The channel order used for rendering.
    pub order:        Vec<String>,
    /// Initializer scripts by lowercase keyword.
    pub initializers: BTreeMap<String, Script>,
    /// The stringify script, if any.
    pub stringify:    Option<Script>,
}

impl ColorFormat {
    /// The built-in hex format, which has no channels.
    #[must_use]
    pub fn hex() -> Self {
        Self { node:         "hex".to_string(),
               uri:          "hex".to_string(),
               name:         crate::interpreter::value::color::HEX_FORMAT.to_string(),
               required:     Vec::new(),
               order:        Vec::new(),
               initializers: BTreeMap::new(),
               stringify:    None, }
    }

    /// Validates a document and builds the format.
    ///
    /// Conversions are not part of the format; the manager turns them into
    /// graph edges.
    ///
    /// # Errors
    /// - `MissingField` if `$id`, `name` or an initializer keyword is empty.
    /// - `UnsupportedType` if `type` is present and not `color`.
    /// - `MalformedSchema` if `required` or `order` name a channel missing
    ///   from `properties`, or `order` repeats a channel.
    pub fn from_document(document: &ColorSpecDocument) -> Result<Self, SpecError> {
        let uri = non_empty(document.id.as_deref()).ok_or(SpecError::MissingField { field: "$id" })?;
        let name = non_empty(document.name.as_deref()).ok_or(SpecError::MissingField { field: "name" })?;

        if let Some(kind) = &document.kind
           && !kind.eq_ignore_ascii_case("color")
        {
            return Err(SpecError::UnsupportedType { name:  name.to_string(),
                                                    found: kind.clone(), });
        }

        let schema = document.schema.clone().unwrap_or_default();
        validate_schema(name, &schema)?;

        let mut initializers = BTreeMap::new();
        for initializer in &document.initializers {
            let keyword = non_empty(Some(initializer.keyword.as_str())).ok_or(SpecError::MissingField { field: "keyword" })?;
            initializers.insert(keyword.to_lowercase(), Script::new(initializer.script.text()));
        }

        Ok(Self { node: normalize_uri(uri),
                  uri: uri.to_string(),
                  name: name.to_string(),
                  required: schema.required,
                  order: schema.order,
                  initializers,
                  stringify: document.stringify.as_ref().map(|s| Script::new(s.text())) })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn validate_schema(name: &str, schema: &SchemaDocument) -> Result<(), SpecError> {
    let malformed = |details: String| SpecError::MalformedSchema { name: name.to_string(),
                                                                   details };
    if !schema.properties.is_empty() {
        for channel in schema.required.iter().chain(&schema.order) {
            if !schema.properties.contains_key(channel) {
                return Err(malformed(format!("channel '{channel}' has no property")));
            }
        }
    }
    for (index, channel) in schema.order.iter().enumerate() {
        if schema.order[..index].contains(channel) {
            return Err(malformed(format!("channel '{channel}' appears twice in the order")));
        }
    }
    Ok(())
}

/// Normalizes a specification URI into a graph node.
///
/// The URI is lowercased, trailing slashes are dropped, and so is a final
/// version segment such as `0`, `1.2` or `v3`, so two versions of one format
/// are the same node.
///
/// # Example
/// ```
/// use tokenscript::interpreter::colors::spec::normalize_uri;
///
/// assert_eq!(normalize_uri("https://example.com/rgb-color/0/"),
///            "https://example.com/rgb-color");
/// assert_eq!(normalize_uri("https://example.com/RGB-color/v1.2"),
///            "https://example.com/rgb-color");
/// assert_eq!(normalize_uri("https://example.com/rgb-color"),
///            "https://example.com/rgb-color");
/// ```
#[must_use]
pub fn normalize_uri(uri: &str) -> String {
    let trimmed = uri.trim().trim_end_matches('/').to_lowercase();
    match trimmed.rsplit_once('/') {
        Some((head, last)) if is_version(last) && !head.ends_with('/') => head.to_string(),
        _ => trimmed,
    }
}

fn is_version(segment: &str) -> bool {
    let digits = segment.strip_prefix('v').unwrap_or(segment);
    digits.starts_with(|c: char| c.is_ascii_digit())
    && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Resolves a conversion endpoint into a graph node or a format alias.
///
/// `$self` is the owning format's node. Anything that looks like a URI is
/// normalized; everything else is a format name, kept lowercase and
/// resolved when the graph is searched.
#[must_use]
pub fn endpoint_key(endpoint: &str, own_node: &str) -> String {
    let endpoint = endpoint.trim();
    if endpoint == SELF_ENDPOINT {
        own_node.to_string()
    } else if endpoint.contains('/') || endpoint.contains(':') {
        normalize_uri(endpoint)
    } else {
        endpoint.to_lowercase()
    }
}
