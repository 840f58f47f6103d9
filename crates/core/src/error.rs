//! Error types for the TYTX core
//!
//! Only structurally fatal conditions are errors. Unknown type codes and
//! unregistered structs are not: they degrade to pass-through values.

use thiserror::Error;

/// Core errors raised by the registry, schema normalization and the codec.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Data shape does not match the struct schema it was resolved against
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A struct schema could not be normalized at registration time
    #[error("invalid struct schema for '{code}': {reason}")]
    InvalidSchema {
        /// Struct code being registered
        code: String,
        /// Why the shape was rejected
        reason: String,
    },

    /// Bracketed field metadata could not be parsed
    #[error("invalid field metadata '{input}': {reason}")]
    InvalidMetadata {
        /// The metadata text
        input: String,
        /// Parse failure
        reason: String,
    },

    /// A type definition is unusable (empty code, reserved prefix)
    #[error("invalid type definition: {0}")]
    InvalidTypeDefinition(String),

    /// A value matched no registered type and is not a primitive
    #[error("value of kind {kind} is not serializable{}", tag.as_ref().map(|t| format!(" (tag '{}')", t)).unwrap_or_default())]
    NonSerializableValue {
        /// Kind of the offending value
        kind: &'static str,
        /// Custom-class tag, for tagged values
        tag: Option<String>,
    },

    /// A type's parser rejected its raw text
    #[error("cannot parse '{raw}' as {code}: {reason}")]
    InvalidValue {
        /// Type code
        code: String,
        /// Raw text
        raw: String,
        /// Parser message
        reason: String,
    },

    /// Embedded JSON text could not be parsed
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a parser failure
    pub fn invalid_value(code: &str, raw: &str, reason: impl ToString) -> Self {
        Error::InvalidValue {
            code: code.to_string(),
            raw: raw.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Check if this error came from a struct schema (shape or definition)
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Error::SchemaMismatch(_) | Error::InvalidSchema { .. } | Error::InvalidMetadata { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidJson(e.to_string())
    }
}
