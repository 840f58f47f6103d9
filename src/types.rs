//! Public types for the TYTX API.
//!
//! This module re-exports types from the internal crates with a clean public interface.

// Values
pub use tytx_core::{TaggedValue, Value, ValueKind, ValueMap};

// Type definitions and references
pub use tytx_core::{codes, Align, NativeTag, TypeDefinition, TypeRef};
pub use tytx_core::{split_suffix, TypeRegistry};

// Struct schemas
pub use tytx_core::{FieldDef, FieldMetadata, MetaValue, OrderedField, SchemaItem, StructSchema};

// Codec
pub use tytx_codec::{Decoded, LookupContext, MAX_RESOLVE_DEPTH};

// Wire formats
pub use tytx_wire::{
    Envelope, EnvelopeOutcome, Payload, PayloadMarker, XmlChild, XmlContent, XmlDocument,
    XmlNode, TYTX_EXT_TYPE,
};

/// Field metadata syntax: `T[min:1, max:50, label:'Name']`
pub mod metadata {
    pub use tytx_core::metadata::{format_metadata, parse_metadata, parse_type_spec};
}
