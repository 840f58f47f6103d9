//! Typed-string codec
//!
//! Decodes `raw::SUFFIX` strings into native values and encodes native values
//! back into typed strings. The suffix is found at the last `::`; anything
//! that does not resolve to a known entry is returned unchanged.
//!
//! | Suffix | Resolves through |
//! |--------|------------------|
//! | `CODE` | registered type (code or alias) |
//! | `~CODE` | custom class |
//! | `@CODE` | struct schema |
//! | `#CODE` | registered type, applied to every leaf of a JSON array |
//! | `#@CODE` | struct schema, applied to every element of a JSON array |

use tracing::debug;
use tytx_core::{
    codes, is_typed_with, split_suffix, Error, Result, StructLookup, TypeDefinition, TypeRef,
    TypeRegistry, Value,
};

/// Outcome of decoding a single string.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// The suffix resolved and the raw text was hydrated
    Resolved {
        /// Hydrated value
        value: Value,
        /// The suffix that resolved
        type_ref: TypeRef,
    },
    /// No suffix, unknown suffix, or unparsable raw text
    PassThrough(String),
}

impl Decoded {
    /// The hydrated value, or the original string
    pub fn into_value(self) -> Value {
        match self {
            Decoded::Resolved { value, .. } => value,
            Decoded::PassThrough(text) => Value::String(text),
        }
    }

    /// True if the suffix resolved
    pub fn is_resolved(&self) -> bool {
        matches!(self, Decoded::Resolved { .. })
    }
}

/// Decoder/encoder bound to a registry and a struct lookup.
///
/// The lookup is usually the registry itself; envelope decoding passes a
/// `LookupContext` so local structs shadow persisted ones.
#[derive(Clone, Copy)]
pub struct Codec<'a> {
    pub(crate) registry: &'a TypeRegistry,
    pub(crate) lookup: &'a dyn StructLookup,
    compact_arrays: bool,
}

impl<'a> Codec<'a> {
    /// Codec that resolves structs through the registry itself
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            lookup: registry,
            compact_arrays: false,
        }
    }

    /// Codec that resolves structs through `lookup`
    pub fn with_lookup(registry: &'a TypeRegistry, lookup: &'a dyn StructLookup) -> Self {
        Self {
            registry,
            lookup,
            compact_arrays: false,
        }
    }

    /// Encode uniform arrays as `[..]::#CODE` instead of `[..]::JS`
    pub fn compact_arrays(mut self, enabled: bool) -> Self {
        self.compact_arrays = enabled;
        self
    }

    /// Registry this codec reads
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// Struct lookup this codec reads
    pub fn lookup(&self) -> &'a dyn StructLookup {
        self.lookup
    }

    /// True if `text` carries a suffix that resolves here
    pub fn is_typed(&self, text: &str) -> bool {
        is_typed_with(self.registry, self.lookup, text)
    }

    // ========================================================================
    // Decode
    // ========================================================================

    /// Decode a string, returning the original string when nothing resolves.
    ///
    /// Errors only on structural mismatches while resolving a struct.
    pub fn decode(&self, text: &str) -> Result<Value> {
        self.decode_detailed(text).map(Decoded::into_value)
    }

    /// Decode a string, reporting which suffix (if any) resolved.
    pub fn decode_detailed(&self, text: &str) -> Result<Decoded> {
        let pass = || Ok(Decoded::PassThrough(text.to_string()));

        let Some((raw, suffix)) = split_suffix(text) else {
            return pass();
        };
        let Some(type_ref) = TypeRef::parse(suffix) else {
            return pass();
        };

        let value = match &type_ref {
            TypeRef::Scalar(code) => match self.registry.get(code) {
                Some(def) => self.decode_scalar(raw, def),
                None => None,
            },
            TypeRef::Custom(code) => match self.registry.get_class(code) {
                Some(def) => self.parse_raw(raw, def),
                None => None,
            },
            TypeRef::TypedArray(code) => match self.registry.get(code) {
                Some(def) => self.decode_typed_array(raw, def)?,
                None => None,
            },
            TypeRef::Struct(code) => match self.lookup.lookup_struct(code) {
                Some(schema) => match parse_json(raw) {
                    Some(data) => Some(self.resolve(data, schema)?),
                    None => None,
                },
                None => None,
            },
            TypeRef::StructArray(code) => match self.lookup.lookup_struct(code) {
                Some(schema) => match parse_json(raw) {
                    Some(Value::Array(items)) => Some(Value::Array(
                        items
                            .into_iter()
                            .map(|item| self.resolve(item, schema))
                            .collect::<Result<_>>()?,
                    )),
                    _ => None,
                },
                None => None,
            },
        };

        match value {
            Some(value) => Ok(Decoded::Resolved { value, type_ref }),
            None => {
                debug!(suffix, "suffix did not hydrate, passing through");
                pass()
            }
        }
    }

    fn decode_scalar(&self, raw: &str, def: &TypeDefinition) -> Option<Value> {
        // `[1,2]::L` is the legacy spelling of `[1,2]::#L`
        if def.code != codes::JSON && looks_like_array(raw) {
            if let Ok(Some(value)) = self.decode_typed_array(raw, def) {
                return Some(value);
            }
        }
        self.parse_raw(raw, def)
    }

    fn decode_typed_array(&self, raw: &str, def: &TypeDefinition) -> Result<Option<Value>> {
        match parse_json(raw) {
            Some(array @ Value::Array(_)) => self.hydrate_scalar(array, def).map(Some),
            _ => Ok(None),
        }
    }

    fn parse_raw(&self, raw: &str, def: &TypeDefinition) -> Option<Value> {
        match def.parse(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(code = %def.code, raw, error = %e, "raw text rejected by parser");
                None
            }
        }
    }

    // ========================================================================
    // Encode
    // ========================================================================

    /// Encode a value as text.
    ///
    /// Strings are returned verbatim. JSON-native types (bool, int, float)
    /// carry a suffix only when `force_suffix` is set. Values no definition
    /// claims fall back to their plain text; tagged values with no registered
    /// class are an error.
    pub fn encode(&self, value: &Value, force_suffix: bool) -> Result<String> {
        match value {
            Value::String(s) => return Ok(s.clone()),
            Value::Null => return Ok("null".to_string()),
            Value::Array(items) if self.compact_arrays => {
                if let Some(text) = self.encode_array(items, None)? {
                    return Ok(text);
                }
            }
            _ => {}
        }

        let Some(def) = self.registry.get_for_value(value) else {
            return plain_text(value);
        };
        let raw = def.serialize(value)?;
        if def.json_native && !force_suffix {
            return Ok(raw);
        }
        Ok(format!("{}::{}", raw, def.type_ref()))
    }

    /// Encode a value, always appending its suffix (strings excepted)
    pub fn encode_typed(&self, value: &Value) -> Result<String> {
        self.encode(value, true)
    }
}

impl std::fmt::Debug for Codec<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("compact_arrays", &self.compact_arrays)
            .finish_non_exhaustive()
    }
}

/// Plain text for values no definition claims.
pub(crate) fn plain_text(value: &Value) -> Result<String> {
    match value {
        Value::Null => Ok("null".to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(tytx_core::types::format_float(*f)),
        Value::Decimal(d) => Ok(d.to_string()),
        Value::Date(d) => Ok(tytx_core::types::format_date(d)),
        Value::DateTime(dt) => Ok(tytx_core::types::format_datetime(dt)),
        Value::Time(t) => Ok(tytx_core::types::format_time(t)),
        Value::String(s) => Ok(s.clone()),
        Value::Array(_) | Value::Object(_) => Ok(serde_json::to_string(&value.to_plain_json())?),
        Value::Tagged(t) => Err(Error::NonSerializableValue {
            kind: value.type_name(),
            tag: Some(t.tag.clone()),
        }),
    }
}

pub(crate) fn parse_json(raw: &str) -> Option<Value> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => Some(Value::from_json(json)),
        Err(e) => {
            debug!(error = %e, "raw text is not JSON");
            None
        }
    }
}

fn looks_like_array(raw: &str) -> bool {
    let raw = raw.trim();
    raw.starts_with('[') && raw.ends_with(']')
}
