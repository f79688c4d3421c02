use thiserror::Error;

/// Errors raised while registering a color or unit specification.
#[derive(Debug, Error)]
pub enum SpecError {
    /// The document is not valid JSON or does not have the expected shape.
    #[error("Invalid specification document: {0}")]
    Json(#[from] serde_json::Error),
    /// A required field is missing or empty.
    #[error("Specification is missing required field '{field}'.")]
    MissingField {
        /// The missing field.
        field: &'static str,
    },
    /// The specification declares a `type` other than `color`.
    #[error("Specification '{name}' has unsupported type '{found}'.")]
    UnsupportedType {
        /// The format name.
        name:  String,
        /// The declared type.
        found: String,
    },
    /// The schema is inconsistent, e.g. a required channel has no property.
    #[error("Specification '{name}' has a malformed schema: {details}.")]
    MalformedSchema {
        /// The format name.
        name:    String,
        /// What is wrong with the schema.
        details: String,
    },
    /// A unit declaration is invalid.
    #[error("Unit '{keyword}' is invalid: {details}.")]
    InvalidUnit {
        /// The unit keyword.
        keyword: String,
        /// What is wrong with the unit.
        details: String,
    },
}
