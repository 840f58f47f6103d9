//! Core types for TYTX
//!
//! This crate holds the parts of the typed-text protocol that involve no
//! parsing of payloads:
//!
//! - [`Value`] - the native value model
//! - [`TypeDefinition`] and the built-in type set (`L`, `R`, `N`, `B`, `T`,
//!   `D`, `DHZ`, `H`, `JS`)
//! - [`TypeRegistry`] - types, custom classes, structs and schemas
//! - [`StructSchema`] - normalized struct shapes
//! - [`metadata`] - the bracketed validation/UI facet grammar
//!
//! ## Examples
//!
//! ```
//! use tytx_core::{TypeRegistry, Value};
//!
//! let registry = TypeRegistry::new();
//! assert_eq!(registry.get_for_value(&Value::Bool(true)).unwrap().code, "B");
//! assert!(registry.is_typed("123::L"));
//! assert!(!registry.is_typed("hello::BOGUS"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod metadata;
pub mod registry;
pub mod schema;
pub mod type_ref;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use metadata::{FieldMetadata, MetaValue};
pub use registry::{is_typed_with, StructLookup, TypeRegistry};
pub use schema::{FieldDef, OrderedField, SchemaItem, StructSchema};
pub use type_ref::{split_suffix, TypeRef};
pub use types::{codes, Align, NativeTag, TypeDefinition};
pub use value::{TaggedValue, Value, ValueKind, ValueMap};
