//! Wire error types
//!
//! Adapter and envelope failures. Core errors (schema mismatches,
//! non-serializable values) pass through unchanged in `WireError::Core`.

use thiserror::Error;

/// Errors raised by the format adapters and the envelope processor.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WireError {
    /// Error from the registry, codec or resolver
    #[error(transparent)]
    Core(#[from] tytx_core::Error),

    /// Payload is not valid JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// XTYTX envelope is malformed or misses a required key
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// XML document reduces to more than one top-level element
    #[error("XML document has {count} top-level elements; a root tag is required")]
    MultipleRoots {
        /// Number of top-level elements
        count: usize,
    },

    /// A node is not an `{attrs, value}` pair or holds unwritable content
    #[error("invalid XML content: {0}")]
    InvalidXmlContent(String),

    /// XML text could not be parsed
    #[error("malformed XML: {0}")]
    Xml(String),

    /// MessagePack bytes could not be read or written
    #[error("MessagePack error: {0}")]
    MessagePack(String),
}

/// Result type for wire operations
pub type Result<T> = std::result::Result<T, WireError>;

impl WireError {
    /// True for errors caused by the payload rather than by the registry
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            WireError::InvalidJson(_)
                | WireError::InvalidEnvelope(_)
                | WireError::Xml(_)
                | WireError::MessagePack(_)
        )
    }
}

impl From<serde_json::Error> for WireError {
    fn from(e: serde_json::Error) -> Self {
        WireError::InvalidJson(e.to_string())
    }
}

impl From<roxmltree::Error> for WireError {
    fn from(e: roxmltree::Error) -> Self {
        WireError::Xml(e.to_string())
    }
}

impl From<rmpv::encode::Error> for WireError {
    fn from(e: rmpv::encode::Error) -> Self {
        WireError::MessagePack(e.to_string())
    }
}

impl From<rmpv::decode::Error> for WireError {
    fn from(e: rmpv::decode::Error) -> Self {
        WireError::MessagePack(e.to_string())
    }
}
