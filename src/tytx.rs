//! Main entry point for TYTX.
//!
//! `Tytx` bundles a shared type registry with codec options and exposes the
//! codec, the format adapters and envelope processing over it.

use crate::error::Result;
use once_cell::sync::Lazy;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use tytx_codec::{Codec, Decoded};
use tytx_core::{StructSchema, TypeDefinition, TypeRegistry, Value};
use tytx_wire::{Envelope, EnvelopeOutcome, PayloadMarker, XmlDocument};

/// Codec options.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use tytx::CodecOptions;
///
/// let options = CodecOptions::from_json(r#"{"compact_arrays": true}"#).unwrap();
/// assert!(options.compact_arrays);
/// assert!(options.msgpack_hybrid);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Suffix JSON-native values (bool, int, float) in `encode`
    pub force_suffix: bool,
    /// Encode uniform arrays as `[..]::#CODE`
    pub compact_arrays: bool,
    /// Marker added to typed JSON payloads
    pub tytx_marker: PayloadMarker,
    /// Root element wrapping multi-entry XML documents
    pub xml_root_tag: Option<String>,
    /// Write MessagePack without the extension block when nothing is typed
    pub msgpack_hybrid: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            force_suffix: false,
            compact_arrays: false,
            tytx_marker: PayloadMarker::Tytx,
            xml_root_tag: None,
            msgpack_hybrid: true,
        }
    }
}

impl CodecOptions {
    /// Load options from a JSON document
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// A TYTX instance: registry plus options.
///
/// Cloning is cheap and shares the registry. Reads take a read lock;
/// registrations take the write lock. Envelope processing registers its
/// globals under the write lock and decodes under the same lock downgraded,
/// so no other registration can slip in between.
///
/// # Example
///
/// ```
/// use tytx::prelude::*;
///
/// let tytx = Tytx::new();
/// tytx.register_struct("POINT", &json!("x:R,y:R")).unwrap();
///
/// let value = tytx.decode(r#"["1.5", "2"]::@POINT"#).unwrap();
/// assert_eq!(value.get("x"), Some(&Value::Float(1.5)));
/// ```
#[derive(Clone)]
pub struct Tytx {
    registry: Arc<RwLock<TypeRegistry>>,
    options: CodecOptions,
}

static GLOBAL: Lazy<Tytx> = Lazy::new(Tytx::new);

/// Process-wide default instance with the built-in types.
pub fn global() -> &'static Tytx {
    &GLOBAL
}

impl Tytx {
    /// Instance with the built-in types and default options.
    pub fn new() -> Self {
        Self::from_parts(TypeRegistry::new(), CodecOptions::default())
    }

    /// Create a builder for instance configuration.
    pub fn builder() -> TytxBuilder {
        TytxBuilder::new()
    }

    fn from_parts(registry: TypeRegistry, options: CodecOptions) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            options,
        }
    }

    /// Current options
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Read access to the registry.
    ///
    /// Registrations block while the guard is held.
    pub fn registry(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.registry.read()
    }

    /// Copy of the registry, detached from this instance
    pub fn snapshot(&self) -> TypeRegistry {
        self.registry.read().clone()
    }

    fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.registry.write()
    }

    fn with_codec<T>(&self, f: impl FnOnce(&Codec<'_>) -> Result<T>) -> Result<T> {
        let registry = self.registry.read();
        let codec = Codec::new(&registry).compact_arrays(self.options.compact_arrays);
        f(&codec)
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Register a type definition (replaces an existing code in place)
    pub fn register(&self, def: TypeDefinition) -> Result<()> {
        debug!(code = %def.code, "registering type");
        Ok(self.write().register(def)?)
    }

    /// Remove a type; returns true if it was registered
    pub fn unregister(&self, code: &str) -> bool {
        self.write().unregister(code).is_some()
    }

    /// Register a custom class under `~CODE` for tagged values with `tag`
    pub fn register_class<S, P>(&self, code: &str, tag: &str, serialize: S, parse: P) -> Result<()>
    where
        S: Fn(&Value) -> tytx_core::Result<String> + Send + Sync + 'static,
        P: Fn(&str) -> tytx_core::Result<Value> + Send + Sync + 'static,
    {
        Ok(self.write().register_class(code, tag, serialize, parse)?)
    }

    /// Remove a custom class; returns true if it was registered
    pub fn unregister_class(&self, code: &str) -> bool {
        self.write().unregister_class(code).is_some()
    }

    /// Register a struct from its JSON shape (object, list or string)
    pub fn register_struct(&self, code: &str, shape: &serde_json::Value) -> Result<()> {
        Ok(self.write().register_struct(code, shape)?)
    }

    /// Remove a struct; returns true if it was registered
    pub fn unregister_struct(&self, code: &str) -> bool {
        self.write().unregister_struct(code).is_some()
    }

    /// Normalized schema of a struct
    pub fn get_struct(&self, code: &str) -> Option<StructSchema> {
        self.registry.read().get_struct(code).cloned()
    }

    /// Registered struct codes in registration order
    pub fn list_structs(&self) -> Vec<String> {
        self.registry.read().structs().keys().cloned().collect()
    }

    /// Store a JSON Schema document
    pub fn register_schema(&self, name: &str, document: serde_json::Value) {
        self.write().register_schema(name, document);
    }

    /// Remove a JSON Schema document; returns true if it was stored
    pub fn unregister_schema(&self, name: &str) -> bool {
        self.write().unregister_schema(name).is_some()
    }

    /// A stored JSON Schema document
    pub fn get_schema(&self, name: &str) -> Option<serde_json::Value> {
        self.registry.read().get_schema(name).cloned()
    }

    /// True if `text` carries a suffix that resolves right now
    pub fn is_typed(&self, text: &str) -> bool {
        self.registry.read().is_typed(text)
    }

    // ========================================================================
    // Codec
    // ========================================================================

    /// Decode a typed string; anything unresolved comes back as a string
    pub fn decode(&self, text: &str) -> Result<Value> {
        self.with_codec(|codec| Ok(codec.decode(text)?))
    }

    /// Decode a typed string, reporting whether the suffix resolved
    pub fn decode_detailed(&self, text: &str) -> Result<Decoded> {
        self.with_codec(|codec| Ok(codec.decode_detailed(text)?))
    }

    /// Encode a value as text, honoring `force_suffix`
    pub fn encode(&self, value: &Value) -> Result<String> {
        self.with_codec(|codec| Ok(codec.encode(value, self.options.force_suffix)?))
    }

    /// Encode a value as text, always suffixed (strings excepted)
    pub fn encode_typed(&self, value: &Value) -> Result<String> {
        self.with_codec(|codec| Ok(codec.encode_typed(value)?))
    }

    /// Encode an array as `[..]::#CODE`, detecting the code when `None`
    pub fn encode_array(&self, values: &[Value], code: Option<&str>) -> Result<Option<String>> {
        self.with_codec(|codec| Ok(codec.encode_array(values, code)?))
    }

    /// Hydrate decoded data against a registered struct
    pub fn resolve(&self, data: Value, code: &str) -> Result<Value> {
        self.with_codec(|codec| Ok(codec.resolve_struct(data, code)?))
    }

    // ========================================================================
    // JSON
    // ========================================================================

    /// Encode as TYTX JSON, marked when any leaf is typed
    pub fn to_typed_json(&self, value: &Value) -> Result<String> {
        self.with_codec(|codec| {
            Ok(tytx_wire::to_typed_json(codec, value, self.options.tytx_marker)?)
        })
    }

    /// Encode as standard JSON (decimals become floats, dates become strings)
    pub fn to_json(&self, value: &Value) -> Result<String> {
        Ok(tytx_wire::to_json(value)?)
    }

    /// Decode JSON: plain, `TYTX`-marked, or an `XTYTX://` envelope.
    ///
    /// A struct-only envelope decodes to `Value::Null`.
    pub fn from_json(&self, text: &str) -> Result<Value> {
        match tytx_wire::detect(text) {
            tytx_wire::Payload::Envelope(_) => {
                Ok(self.process_envelope(text)?.data.unwrap_or(Value::Null))
            }
            tytx_wire::Payload::Typed(body) | tytx_wire::Payload::Plain(body) => {
                self.with_codec(|codec| Ok(tytx_wire::parse_typed_json(codec, body)?))
            }
        }
    }

    // ========================================================================
    // Envelopes
    // ========================================================================

    /// Process an `XTYTX://` envelope.
    ///
    /// Global declarations persist; local ones are visible only while the
    /// data is decoded.
    pub fn process_envelope(&self, text: &str) -> Result<EnvelopeOutcome> {
        let envelope = Envelope::parse(text)?;

        let mut registry = self.write();
        let registered = envelope.register_globals(&mut registry)?;
        let registry = RwLockWriteGuard::downgrade(registry);

        let data = envelope.decode_data(&registry)?;
        Ok(EnvelopeOutcome {
            data,
            registered_structs: registered.structs,
            registered_schemas: registered.schemas,
            local_schemas: envelope.lschema,
        })
    }

    /// `XTYTX://` text for an envelope
    pub fn encode_envelope(&self, envelope: &Envelope) -> Result<String> {
        Ok(tytx_wire::encode_envelope(envelope)?)
    }

    // ========================================================================
    // XML
    // ========================================================================

    /// Write an XML document, wrapping it in `xml_root_tag` when configured
    pub fn to_xml(&self, doc: &XmlDocument) -> Result<String> {
        let root = self.options.xml_root_tag.as_deref();
        self.with_codec(|codec| Ok(tytx_wire::to_xml(codec, doc, root)?))
    }

    /// Write an XML document given in generic `{attrs, value}` form
    pub fn to_xml_value(&self, doc: &Value) -> Result<String> {
        let root = self.options.xml_root_tag.as_deref();
        self.with_codec(|codec| Ok(tytx_wire::to_xml_value(codec, doc, root)?))
    }

    /// Parse XML into hydrated `{attrs, value}` nodes
    pub fn from_xml(&self, text: &str) -> Result<XmlDocument> {
        self.with_codec(|codec| Ok(tytx_wire::from_xml(codec, text)?))
    }

    // ========================================================================
    // MessagePack
    // ========================================================================

    /// Encode as MessagePack, using the extension block for typed values
    pub fn to_msgpack(&self, value: &Value) -> Result<Vec<u8>> {
        let hybrid = self.options.msgpack_hybrid;
        self.with_codec(|codec| Ok(tytx_wire::to_msgpack(codec, value, hybrid)?))
    }

    /// Decode MessagePack, unwrapping extension blocks
    pub fn from_msgpack(&self, bytes: &[u8]) -> Result<Value> {
        self.with_codec(|codec| Ok(tytx_wire::from_msgpack(codec, bytes)?))
    }
}

impl Default for Tytx {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Tytx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tytx")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Builder for instance configuration.
///
/// # Example
///
/// ```
/// use tytx::prelude::*;
///
/// let tytx = Tytx::builder()
///     .compact_arrays(true)
///     .marker(PayloadMarker::Protocol)
///     .with_struct("ROW", json!(["T", "N"]))
///     .build()
///     .unwrap();
///
/// assert_eq!(tytx.list_structs(), vec!["ROW".to_string()]);
/// ```
pub struct TytxBuilder {
    registry: TypeRegistry,
    options: CodecOptions,
    types: Vec<TypeDefinition>,
    structs: Vec<(String, serde_json::Value)>,
    schemas: Vec<(String, serde_json::Value)>,
}

impl TytxBuilder {
    /// Create a new builder with the built-in types and default options.
    pub fn new() -> Self {
        Self {
            registry: TypeRegistry::new(),
            options: CodecOptions::default(),
            types: Vec::new(),
            structs: Vec::new(),
            schemas: Vec::new(),
        }
    }

    /// Start from an existing registry instead of the built-ins
    pub fn registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Start from a registry with nothing registered
    pub fn empty_registry(mut self) -> Self {
        self.registry = TypeRegistry::empty();
        self
    }

    /// Replace all options
    pub fn options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    /// Suffix JSON-native values in `encode`
    pub fn force_suffix(mut self, enabled: bool) -> Self {
        self.options.force_suffix = enabled;
        self
    }

    /// Encode uniform arrays in compact `#CODE` form
    pub fn compact_arrays(mut self, enabled: bool) -> Self {
        self.options.compact_arrays = enabled;
        self
    }

    /// Marker for typed JSON payloads
    pub fn marker(mut self, marker: PayloadMarker) -> Self {
        self.options.tytx_marker = marker;
        self
    }

    /// Root element for multi-entry XML documents
    pub fn xml_root_tag(mut self, tag: impl Into<String>) -> Self {
        self.options.xml_root_tag = Some(tag.into());
        self
    }

    /// Plain MessagePack when nothing is typed
    pub fn msgpack_hybrid(mut self, enabled: bool) -> Self {
        self.options.msgpack_hybrid = enabled;
        self
    }

    /// Register a type at build time
    pub fn with_type(mut self, def: TypeDefinition) -> Self {
        self.types.push(def);
        self
    }

    /// Register a struct at build time
    pub fn with_struct(mut self, code: &str, shape: serde_json::Value) -> Self {
        self.structs.push((code.to_string(), shape));
        self
    }

    /// Store a JSON Schema document at build time
    pub fn with_schema(mut self, name: &str, document: serde_json::Value) -> Self {
        self.schemas.push((name.to_string(), document));
        self
    }

    /// Build the instance.
    ///
    /// Fails if any queued type or struct is rejected by the registry.
    pub fn build(self) -> Result<Tytx> {
        let mut registry = self.registry;
        for def in self.types {
            registry.register(def)?;
        }
        for (name, document) in self.schemas {
            registry.register_schema(&name, document);
        }
        for (code, shape) in &self.structs {
            registry.register_struct(code, shape)?;
        }
        debug!(
            types = registry.codes().count(),
            structs = registry.structs().len(),
            "tytx instance built"
        );
        Ok(Tytx::from_parts(registry, self.options))
    }
}

impl Default for TytxBuilder {
    fn default() -> Self {
        Self::new()
    }
}
