//! Type registry
//!
//! Holds every definition the codec can resolve: built-in and registered types
//! (by code and alias), custom classes (`~`), struct schemas (`@`) and opaque
//! JSON Schema documents.
//!
//! ## Priority
//!
//! `get_for_value` walks definitions in registration order and returns the
//! first match. Re-registering a code replaces the definition but keeps its
//! original position, so first-registered wins deterministically.
//!
//! ## Thread Safety
//!
//! The registry is a plain value. Concurrent readers are fine; mutation needs
//! `&mut self`, so callers that share a registry wrap it in a lock (see the
//! `tytx` facade) or clone it for a copy-on-write snapshot.

use crate::error::{Error, Result};
use crate::schema::StructSchema;
use crate::type_ref::{split_suffix, TypeRef, CUSTOM_PREFIX, SUFFIX_SEPARATOR};
use crate::types::{builtin_types, NativeTag, TypeDefinition};
use crate::value::Value;
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::debug;

/// Read access to struct and schema maps.
///
/// Implemented by the registry itself and by overlays that put envelope-local
/// declarations in front of it.
pub trait StructLookup {
    /// Find a struct by code
    fn lookup_struct(&self, code: &str) -> Option<&StructSchema>;

    /// Find a JSON Schema document by name
    fn lookup_schema(&self, name: &str) -> Option<&serde_json::Value>;
}

/// Registry of types, custom classes, structs and schemas.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    /// Canonical code -> definition; iteration order is priority order
    types: IndexMap<String, TypeDefinition>,
    /// Alias -> canonical code
    aliases: HashMap<String, String>,
    /// Custom class code (without `~`) -> definition
    classes: IndexMap<String, TypeDefinition>,
    /// Struct code (without `@`) -> normalized schema
    structs: IndexMap<String, StructSchema>,
    /// Schema name -> opaque JSON Schema document
    schemas: IndexMap<String, serde_json::Value>,
}

impl TypeRegistry {
    /// Registry with the built-in types.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for def in builtin_types() {
            registry.insert_type(def);
        }
        registry
    }

    /// Registry with nothing registered.
    pub fn empty() -> Self {
        Self::default()
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// Register a type definition.
    ///
    /// Replaces any definition with the same code, keeping its priority slot.
    pub fn register(&mut self, def: TypeDefinition) -> Result<()> {
        validate_code(&def.code)?;
        for alias in &def.aliases {
            validate_code(alias)?;
        }
        self.insert_type(def);
        Ok(())
    }

    fn insert_type(&mut self, def: TypeDefinition) {
        if let Some(old) = self.types.get(&def.code) {
            for alias in &old.aliases {
                self.aliases.remove(alias);
            }
        }
        for alias in &def.aliases {
            self.aliases.insert(alias.clone(), def.code.clone());
        }
        self.types.insert(def.code.clone(), def);
    }

    /// Remove a type by canonical code
    pub fn unregister(&mut self, code: &str) -> Option<TypeDefinition> {
        let def = self.types.shift_remove(code)?;
        self.aliases.retain(|_, canonical| canonical != code);
        Some(def)
    }

    /// Find a type by code or alias. Unknown input returns `None`.
    pub fn get(&self, code_or_alias: &str) -> Option<&TypeDefinition> {
        self.types.get(code_or_alias).or_else(|| {
            self.aliases
                .get(code_or_alias)
                .and_then(|canonical| self.types.get(canonical))
        })
    }

    /// Find the definition that claims a native value.
    ///
    /// Tagged values are matched against custom classes first, then against
    /// types registered with a class tag. Everything else is matched by kind,
    /// first-registered wins.
    pub fn get_for_value(&self, value: &Value) -> Option<&TypeDefinition> {
        if let Value::Tagged(_) = value {
            if let Some(def) = self.classes.values().find(|d| d.matches(value)) {
                return Some(def);
            }
        }
        self.types.values().find(|d| d.matches(value))
    }

    /// Canonical type codes in priority order
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    // ========================================================================
    // Custom classes
    // ========================================================================

    /// Register a custom class under `~CODE`.
    ///
    /// `tag` is the native tag of the `Value::Tagged` instances it claims.
    pub fn register_class<S, P>(
        &mut self,
        code: &str,
        tag: &str,
        serialize: S,
        parse: P,
    ) -> Result<()>
    where
        S: Fn(&Value) -> Result<String> + Send + Sync + 'static,
        P: Fn(&str) -> Result<Value> + Send + Sync + 'static,
    {
        let code = code.strip_prefix(CUSTOM_PREFIX).unwrap_or(code);
        validate_code(code)?;
        let def = TypeDefinition::new(code, NativeTag::Class(tag.to_string()), parse, serialize)
            .with_name(tag)
            .into_custom();
        self.classes.insert(code.to_string(), def);
        Ok(())
    }

    /// Remove a custom class
    pub fn unregister_class(&mut self, code: &str) -> Option<TypeDefinition> {
        let code = code.strip_prefix(CUSTOM_PREFIX).unwrap_or(code);
        self.classes.shift_remove(code)
    }

    /// Find a custom class by code (with or without `~`)
    pub fn get_class(&self, code: &str) -> Option<&TypeDefinition> {
        let code = code.strip_prefix(CUSTOM_PREFIX).unwrap_or(code);
        self.classes.get(code)
    }

    // ========================================================================
    // Structs
    // ========================================================================

    /// Register a struct from its raw JSON shape (object, list or string).
    pub fn register_struct(&mut self, code: &str, raw: &serde_json::Value) -> Result<()> {
        let schema = StructSchema::from_json(code, raw)?;
        self.register_struct_schema(code, schema)
    }

    /// Register an already-normalized struct schema.
    pub fn register_struct_schema(&mut self, code: &str, schema: StructSchema) -> Result<()> {
        validate_code(code)?;
        debug!(code, shape = schema.shape_name(), "registering struct");
        self.structs.insert(code.to_string(), schema);
        Ok(())
    }

    /// Remove a struct
    pub fn unregister_struct(&mut self, code: &str) -> Option<StructSchema> {
        self.structs.shift_remove(code)
    }

    /// Find a struct by code
    pub fn get_struct(&self, code: &str) -> Option<&StructSchema> {
        self.structs.get(code)
    }

    /// All structs in registration order
    pub fn structs(&self) -> &IndexMap<String, StructSchema> {
        &self.structs
    }

    // ========================================================================
    // JSON Schema documents
    // ========================================================================

    /// Store an opaque JSON Schema document (overwrites on name collision)
    pub fn register_schema(&mut self, name: &str, document: serde_json::Value) {
        self.schemas.insert(name.to_string(), document);
    }

    /// Remove a JSON Schema document
    pub fn unregister_schema(&mut self, name: &str) -> Option<serde_json::Value> {
        self.schemas.shift_remove(name)
    }

    /// Find a JSON Schema document
    pub fn get_schema(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// All JSON Schema documents in registration order
    pub fn schemas(&self) -> &IndexMap<String, serde_json::Value> {
        &self.schemas
    }

    // ========================================================================
    // Suffix resolution
    // ========================================================================

    /// Check whether a reference resolves through `lookup` and this registry.
    pub fn resolves(&self, type_ref: &TypeRef, lookup: &dyn StructLookup) -> bool {
        match type_ref {
            TypeRef::Scalar(code) | TypeRef::TypedArray(code) => self.get(code).is_some(),
            TypeRef::Custom(code) => self.get_class(code).is_some(),
            TypeRef::Struct(code) | TypeRef::StructArray(code) => {
                lookup.lookup_struct(code).is_some()
            }
        }
    }

    /// True if `text` ends in `::SUFFIX` and the suffix resolves to a known entry.
    pub fn is_typed(&self, text: &str) -> bool {
        is_typed_with(self, self, text)
    }
}

impl StructLookup for TypeRegistry {
    fn lookup_struct(&self, code: &str) -> Option<&StructSchema> {
        self.structs.get(code)
    }

    fn lookup_schema(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }
}

/// `is_typed` against an arbitrary struct lookup (e.g. an envelope overlay).
pub fn is_typed_with(registry: &TypeRegistry, lookup: &dyn StructLookup, text: &str) -> bool {
    split_suffix(text)
        .and_then(|(_, suffix)| TypeRef::parse(suffix))
        .map(|type_ref| registry.resolves(&type_ref, lookup))
        .unwrap_or(false)
}

fn validate_code(code: &str) -> Result<()> {
    if code.is_empty() {
        return Err(Error::InvalidTypeDefinition("empty code".to_string()));
    }
    if code.starts_with(['~', '@', '#']) {
        return Err(Error::InvalidTypeDefinition(format!(
            "code '{}' starts with a reserved prefix",
            code
        )));
    }
    if code.contains(SUFFIX_SEPARATOR) || code.contains(char::is_whitespace) {
        return Err(Error::InvalidTypeDefinition(format!(
            "code '{}' contains '::' or whitespace",
            code
        )));
    }
    Ok(())
}
