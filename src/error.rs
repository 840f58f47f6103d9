//! Unified error types for TYTX.
//!
//! Wraps the per-crate errors of `tytx-core` and `tytx-wire` into one
//! type with a stable set of variants.

use thiserror::Error;

/// All TYTX errors.
///
/// Unknown type codes and unregistered structs are never errors; they pass
/// through as plain strings. Everything here aborts the failing call only.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Data does not fit the struct it was resolved against
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A struct shape or field metadata was rejected at registration
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// A type definition is unusable
    #[error("invalid type definition: {0}")]
    InvalidTypeDefinition(String),

    /// XTYTX envelope is malformed or misses a required key
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// XML document has several top-level elements and no root tag
    #[error("multiple XML roots: {count} top-level elements")]
    MultipleRoots {
        /// Number of top-level elements
        count: usize,
    },

    /// XML node content cannot be written
    #[error("invalid XML content: {0}")]
    InvalidXmlContent(String),

    /// A value matched no type and is not a primitive
    #[error("{0}")]
    NonSerializableValue(String),

    /// Payload text or bytes could not be parsed (JSON, XML, MessagePack)
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for TYTX operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error came from applying a struct schema.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Error::SchemaMismatch(_) | Error::InvalidSchema(_))
    }

    /// Check if the input payload itself was at fault.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Error::Malformed(_) | Error::InvalidEnvelope(_))
    }

    /// Check if this error was raised while encoding.
    pub fn is_encode_error(&self) -> bool {
        matches!(
            self,
            Error::NonSerializableValue(_) | Error::MultipleRoots { .. } | Error::InvalidXmlContent(_)
        )
    }
}

// Convert from core errors
impl From<tytx_core::Error> for Error {
    fn from(e: tytx_core::Error) -> Self {
        use tytx_core::Error as CoreError;
        match e {
            CoreError::SchemaMismatch(msg) => Error::SchemaMismatch(msg),
            e @ (CoreError::InvalidSchema { .. } | CoreError::InvalidMetadata { .. }) => {
                Error::InvalidSchema(e.to_string())
            }
            CoreError::InvalidTypeDefinition(msg) => Error::InvalidTypeDefinition(msg),
            e @ CoreError::NonSerializableValue { .. } => Error::NonSerializableValue(e.to_string()),
            e @ CoreError::InvalidValue { .. } => Error::NonSerializableValue(e.to_string()),
            CoreError::InvalidJson(msg) => Error::Malformed(msg),
        }
    }
}

// Convert from wire errors
impl From<tytx_wire::WireError> for Error {
    fn from(e: tytx_wire::WireError) -> Self {
        use tytx_wire::WireError;
        match e {
            WireError::Core(core) => core.into(),
            WireError::InvalidEnvelope(msg) => Error::InvalidEnvelope(msg),
            WireError::MultipleRoots { count } => Error::MultipleRoots { count },
            WireError::InvalidXmlContent(msg) => Error::InvalidXmlContent(msg),
            e @ (WireError::InvalidJson(_) | WireError::Xml(_) | WireError::MessagePack(_)) => {
                Error::Malformed(e.to_string())
            }
        }
    }
}

// Convert from serde_json errors (configuration documents)
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
