//! Convenient imports for TYTX.
//!
//! This module re-exports the most commonly used types so you can get started
//! with a single import:
//!
//! ```
//! use tytx::prelude::*;
//!
//! let tytx = Tytx::new();
//! assert_eq!(tytx.decode("42::L").unwrap(), Value::Int(42));
//! ```

// Main entry point
pub use crate::tytx::{global, CodecOptions, Tytx, TytxBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Values
pub use crate::types::{TaggedValue, Value, ValueMap};

// Registry types
pub use crate::types::{StructSchema, TypeDefinition, TypeRegistry};

// Wire types
pub use crate::types::{Envelope, PayloadMarker, XmlDocument, XmlNode};

// Re-export serde_json for convenience
pub use serde_json::json;
