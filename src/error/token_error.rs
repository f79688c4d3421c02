use thiserror::Error;

use crate::error::LanguageError;

/// Errors raised while resolving a token set.
#[derive(Debug, Error)]
pub enum TokenSetError {
    /// The document is not valid JSON.
    #[error("Invalid token document: {0}")]
    Json(#[from] serde_json::Error),
    /// The document root is not an object.
    #[error("Token document must be a JSON object.")]
    NotAnObject,
    /// A token refers to itself through a chain of references.
    #[error("Circular reference: {}.", chain.join(" -> "))]
    CircularReference {
        /// The tokens on the cycle, starting and ending with the same path.
        chain: Vec<String>,
    },
    /// A token refers to a token that does not exist.
    #[error("Token '{path}' refers to unknown token '{{{reference}}}'.")]
    UnknownReference {
        /// The referring token.
        path:      String,
        /// The missing reference.
        reference: String,
    },
    /// A token value failed to evaluate.
    #[error("Token '{path}' failed: {source}")]
    Evaluation {
        /// The failing token.
        path:   String,
        /// The underlying error.
        source: LanguageError,
    },
}
