use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde_json::{Map, Value as Json};
use tracing::{debug, trace};

use crate::{
    config::Config,
    error::{LanguageError, RuntimeError, TokenSetError},
    interpreter::{evaluator::core::Evaluator, value::core::Value},
};

/// One token as found in the document, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenDefinition {
    /// The raw `$value`.
    pub raw:         Json,
    /// The `$type`, inherited from the enclosing groups when absent.
    pub token_type:  Option<String>,
    /// The `$description`.
    pub description: Option<String>,
    /// The `$extensions` object, passed through untouched.
    pub extensions:  Option<Json>,
}

/// A token after resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedToken {
    /// The computed value.
    pub value:       Value,
    /// The value rendered as text, colors through their stringify script.
    pub text:        String,
    /// The token's type.
    pub token_type:  Option<String>,
    /// The token's description.
    pub description: Option<String>,
    /// The token's extensions.
    pub extensions:  Option<Json>,
}

/// A flattened design-token document.
///
/// Tokens are objects carrying a `$value` (or `value`); every other object
/// is a group whose key becomes part of the dotted path of the tokens
/// below it. A token refers to another one with `{group.token}`.
///
/// # Example
/// ```
/// use tokenscript::{config::Config, token_set::TokenSet};
///
/// let tokens = TokenSet::from_json(r#"{
///     "space": {
///         "$type": "dimension",
///         "base": { "$value": "4px" },
///         "large": { "$value": "{space.base} * 4" }
///     },
///     "font": { "family": { "$value": "Inter, sans-serif" } }
/// }"#).unwrap();
///
/// let resolved = tokens.resolve(&Config::default()).unwrap();
/// assert_eq!(resolved["space.large"].text, "16px");
/// assert_eq!(resolved["space.large"].token_type.as_deref(), Some("dimension"));
/// assert_eq!(resolved["font.family"].text, "Inter, sans-serif");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokenSet {
    tokens: BTreeMap<String, TokenDefinition>,
}

impl TokenSet {
    /// Parses and flattens a token document.
    pub fn from_json(json: &str) -> Result<Self, TokenSetError> {
        let document = serde_json::from_str::<Json>(json)?;
        Self::from_document(&document)
    }

    /// Flattens a parsed token document.
    pub fn from_document(document: &Json) -> Result<Self, TokenSetError> {
        let Json::Object(root) = document else {
            return Err(TokenSetError::NotAnObject);
        };
        let mut tokens = BTreeMap::new();
        flatten(root, "", None, &mut tokens);
        debug!(tokens = tokens.len(), "flattened token document");
        Ok(Self { tokens })
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if the document has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Looks up a token by its dotted path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&TokenDefinition> {
        self.tokens.get(path)
    }

    /// Resolves every token.
    ///
    /// Tokens are evaluated after the tokens they refer to, each with the
    /// already resolved tokens as its references. A string value without
    /// references that does not evaluate is kept as written, so plain text
    /// such as font stacks passes through. A value whose only problem is
    /// bare words, like `1px solid {color.border}`, has its references
    /// replaced by their text.
    ///
    /// # Errors
    /// - `CircularReference` if tokens refer to each other in a loop.
    /// - `UnknownReference` for a reference to a missing token.
    /// - `Evaluation` if a value with references fails.
    pub fn resolve(&self, config: &Config) -> Result<BTreeMap<String, ResolvedToken>, TokenSetError> {
        let mut resolver = Resolver { set: self,
                                      config,
                                      resolved: BTreeMap::new(),
                                      visiting: Vec::new() };
        for path in self.tokens.keys() {
            resolver.resolve(path)?;
        }
        debug!(tokens = resolver.resolved.len(), "resolved token set");
        Ok(resolver.resolved)
    }
}

/// Collects the tokens below `group`.
fn flatten(group: &Map<String, Json>,
           prefix: &str,
           inherited_type: Option<&str>,
           tokens: &mut BTreeMap<String, TokenDefinition>) {
    let group_type = string_field(group, "$type").or(inherited_type);

    for (key, child) in group {
        if key.starts_with('$') {
            continue;
        }
        let Json::Object(child) = child else {
            continue;
        };
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match child.get("$value").or_else(|| child.get("value")) {
            Some(raw) => {
                let token_type = string_field(child, "$type").or_else(|| string_field(child, "type"))
                                                             .or(group_type);
                tokens.insert(path,
                              TokenDefinition { raw:         raw.clone(),
                                                token_type:  token_type.map(str::to_string),
                                                description: string_field(child, "$description").map(str::to_string),
                                                extensions:  child.get("$extensions").cloned(), });
            },
            None => flatten(child, &path, group_type, tokens),
        }
    }
}

fn string_field<'a>(object: &'a Map<String, Json>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Json::as_str)
}

/// Extracts the names of all `{reference}`s in `text`.
///
/// # Example
/// ```
/// use tokenscript::token_set::references_in;
///
/// let names = references_in("{space.base} * 2 + {space.base}");
/// assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["space.base"]);
/// ```
#[must_use]
pub fn references_in(text: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut rest = text;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            break;
        };
        let name = after[..end].trim();
        if !name.is_empty() {
            names.insert(name.to_string());
        }
        rest = &after[end + 1..];
    }
    names
}

struct Resolver<'a> {
    set:      &'a TokenSet,
    config:   &'a Config,
    resolved: BTreeMap<String, ResolvedToken>,
    visiting: Vec<String>,
}

impl Resolver<'_> {
    fn resolve(&mut self, path: &str) -> Result<(), TokenSetError> {
        if self.resolved.contains_key(path) {
            return Ok(());
        }
        if let Some(position) = self.visiting.iter().position(|p| p == path) {
            let mut chain = self.visiting[position..].to_vec();
            chain.push(path.to_string());
            return Err(TokenSetError::CircularReference { chain });
        }
        let set = self.set;
        let Some(definition) = set.tokens.get(path) else {
            return Ok(());
        };

        self.visiting.push(path.to_string());
        let (value, line) = self.evaluate(path, &definition.raw)?;
        self.visiting.pop();

        let text = value.render(self.config, line)
                        .map_err(|error| TokenSetError::Evaluation { path:   path.to_string(),
                                                                     source: error.into(), })?;
        trace!(path, %text, "resolved token");
        self.resolved.insert(path.to_string(),
                             ResolvedToken { value,
                                             text,
                                             token_type: definition.token_type.clone(),
                                             description: definition.description.clone(),
                                             extensions: definition.extensions.clone() });
        Ok(())
    }

    /// Computes a token's value and the script line that produced it.
    fn evaluate(&mut self, path: &str, raw: &Json) -> Result<(Value, usize), TokenSetError> {
        let Json::String(source) = raw else {
            return Ok((Value::from_json(raw), 1));
        };

        let names = references_in(source);
        let mut references = HashMap::new();
        for name in &names {
            if !self.set.tokens.contains_key(name) {
                return Err(TokenSetError::UnknownReference { path:      path.to_string(),
                                                             reference: name.clone(), });
            }
            self.resolve(name)?;
            if let Some(token) = self.resolved.get(name) {
                references.insert(name.clone(), token.value.clone());
            }
        }

        let mut evaluator = Evaluator::new(source.as_str(), references, None, Some(self.config.clone()));
        match evaluator.interpret() {
            Ok(value) => Ok((value, evaluator.result_line())),
            Err(error) if names.is_empty() => {
                trace!(path, %error, "keeping token value as written");
                Ok((Value::from_json(raw), 1))
            },
            // Bare words such as `solid` in `1px solid {color}`.
            Err(LanguageError::Runtime(RuntimeError::UnknownVariable { .. })) => {
                Ok((Value::string(self.substitute(source, &names)), 1))
            },
            Err(source) => Err(TokenSetError::Evaluation { path: path.to_string(),
                                                           source }),
        }
    }

    /// Replaces each `{reference}` in `text` with the resolved token's text.
    fn substitute(&self, text: &str, names: &BTreeSet<String>) -> String {
        let mut result = text.to_string();
        for name in names {
            if let Some(token) = self.resolved.get(name) {
                result = result.replace(&format!("{{{name}}}"), &token.text);
            }
        }
        result
    }
}
