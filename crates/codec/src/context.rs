//! Struct lookup overlay
//!
//! An envelope may declare structs and schemas that are visible only while its
//! data is decoded. `LookupContext` puts those local declarations in front of
//! a registry; dropping the context discards them.

use indexmap::IndexMap;
use tytx_core::{Result, StructLookup, StructSchema, TypeRegistry};

/// Local structs and schemas layered over a registry.
///
/// Lookups try the local maps first, then the registry.
#[derive(Debug)]
pub struct LookupContext<'a> {
    base: &'a TypeRegistry,
    structs: IndexMap<String, StructSchema>,
    schemas: IndexMap<String, serde_json::Value>,
}

impl<'a> LookupContext<'a> {
    /// Empty overlay over `base`
    pub fn new(base: &'a TypeRegistry) -> Self {
        Self {
            base,
            structs: IndexMap::new(),
            schemas: IndexMap::new(),
        }
    }

    /// Registry the overlay sits on
    pub fn base(&self) -> &'a TypeRegistry {
        self.base
    }

    /// Add a local struct from its raw JSON shape
    pub fn insert_struct(&mut self, code: &str, raw: &serde_json::Value) -> Result<()> {
        let schema = StructSchema::from_json(code, raw)?;
        self.structs.insert(code.to_string(), schema);
        Ok(())
    }

    /// Add an already-normalized local struct
    pub fn insert_struct_schema(&mut self, code: &str, schema: StructSchema) {
        self.structs.insert(code.to_string(), schema);
    }

    /// Add a local JSON Schema document
    pub fn insert_schema(&mut self, name: &str, document: serde_json::Value) {
        self.schemas.insert(name.to_string(), document);
    }

    /// Local structs in declaration order
    pub fn local_structs(&self) -> &IndexMap<String, StructSchema> {
        &self.structs
    }

    /// Local JSON Schema documents in declaration order
    pub fn local_schemas(&self) -> &IndexMap<String, serde_json::Value> {
        &self.schemas
    }

    /// Consume the overlay, returning the local schema documents
    pub fn into_local_schemas(self) -> IndexMap<String, serde_json::Value> {
        self.schemas
    }

    /// True if nothing local has been declared
    pub fn is_empty(&self) -> bool {
        self.structs.is_empty() && self.schemas.is_empty()
    }
}

impl StructLookup for LookupContext<'_> {
    fn lookup_struct(&self, code: &str) -> Option<&StructSchema> {
        self.structs
            .get(code)
            .or_else(|| self.base.lookup_struct(code))
    }

    fn lookup_schema(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas
            .get(name)
            .or_else(|| self.base.lookup_schema(name))
    }
}
