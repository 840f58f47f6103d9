//! XTYTX envelope
//!
//! An extended payload carries struct and schema declarations next to its
//! data:
//!
//! ```text
//! XTYTX://{"gstruct": {...}, "lstruct": {...}, "gschema": {...}, "lschema": {...}, "data": "..."}
//! ```
//!
//! Processing order:
//! 1. `gschema` entries are stored in the registry (overwrite on collision)
//! 2. `gstruct` entries are normalized and registered (overwrite on collision)
//! 3. `lstruct`/`lschema` form a lookup overlay over the updated registry
//! 4. `data` is decoded through the overlay, which is then dropped
//!
//! Global registration is all-or-nothing. An empty `data` registers the
//! globals and returns no value.

use crate::error::{Result, WireError};
use crate::json::{hydrate_json, parse_typed_json};
use crate::markers::{detect, Payload, XTYTX_PROTOCOL};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};
use tytx_codec::{Codec, LookupContext};
use tytx_core::{StructSchema, TypeRegistry, Value};

/// Map of code (or schema name) to raw JSON declaration
pub type Declarations = IndexMap<String, serde_json::Value>;

/// Parsed XTYTX envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Structs registered persistently
    #[serde(deserialize_with = "nullable_map")]
    pub gstruct: Declarations,
    /// Structs visible only while `data` is decoded
    #[serde(deserialize_with = "nullable_map")]
    pub lstruct: Declarations,
    /// JSON Schema documents registered persistently
    #[serde(default, deserialize_with = "nullable_map", skip_serializing_if = "IndexMap::is_empty")]
    pub gschema: Declarations,
    /// JSON Schema documents for this payload only
    #[serde(default, deserialize_with = "nullable_map", skip_serializing_if = "IndexMap::is_empty")]
    pub lschema: Declarations,
    /// Payload: TYTX JSON text, or an inline JSON value
    pub data: serde_json::Value,
}

/// Result of processing an envelope.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnvelopeOutcome {
    /// Decoded data, `None` for struct-only envelopes
    pub data: Option<Value>,
    /// Struct codes written to the registry
    pub registered_structs: Vec<String>,
    /// Schema names written to the registry
    pub registered_schemas: Vec<String>,
    /// `lschema` documents, for an external validator
    pub local_schemas: Declarations,
}

/// Names written to the registry by `register_globals`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Registered {
    /// Struct codes
    pub structs: Vec<String>,
    /// Schema names
    pub schemas: Vec<String>,
}

fn nullable_map<'de, D>(deserializer: D) -> std::result::Result<Declarations, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Declarations>::deserialize(deserializer)?.unwrap_or_default())
}

impl Envelope {
    /// Envelope carrying `data` and no declarations
    pub fn new(data: impl Into<serde_json::Value>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    /// Add a persistent struct declaration
    pub fn with_global_struct(mut self, code: &str, shape: serde_json::Value) -> Self {
        self.gstruct.insert(code.to_string(), shape);
        self
    }

    /// Add a payload-local struct declaration
    pub fn with_local_struct(mut self, code: &str, shape: serde_json::Value) -> Self {
        self.lstruct.insert(code.to_string(), shape);
        self
    }

    /// Add a persistent JSON Schema document
    pub fn with_global_schema(mut self, name: &str, document: serde_json::Value) -> Self {
        self.gschema.insert(name.to_string(), document);
        self
    }

    /// Add a payload-local JSON Schema document
    pub fn with_local_schema(mut self, name: &str, document: serde_json::Value) -> Self {
        self.lschema.insert(name.to_string(), document);
        self
    }

    /// Parse envelope JSON, with or without the `XTYTX://` prefix.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let body = text.strip_prefix(XTYTX_PROTOCOL).unwrap_or(text);
        serde_json::from_str(body).map_err(|e| WireError::InvalidEnvelope(e.to_string()))
    }

    /// `XTYTX://` text for this envelope
    pub fn encode(&self) -> Result<String> {
        Ok(format!("{}{}", XTYTX_PROTOCOL, serde_json::to_string(self)?))
    }

    /// True if `data` is null or an empty string
    pub fn is_struct_only(&self) -> bool {
        match &self.data {
            serde_json::Value::Null => true,
            serde_json::Value::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Write `gschema` then `gstruct` into the registry.
    ///
    /// Every declaration is checked before anything is written; on error the
    /// registry is unchanged.
    pub fn register_globals(&self, registry: &mut TypeRegistry) -> Result<Registered> {
        let mut staged = registry.clone();
        let mut registered = Registered::default();

        for (name, document) in &self.gschema {
            staged.register_schema(name, document.clone());
            registered.schemas.push(name.clone());
        }

        for (code, shape) in &self.gstruct {
            let schema = StructSchema::from_json(code, shape)
                .map_err(|e| WireError::InvalidEnvelope(format!("gstruct '{}': {}", code, e)))?;
            if matches!(staged.get_struct(code), Some(existing) if *existing != schema) {
                warn!(code = %code, "envelope replaces registered struct");
            }
            staged
                .register_struct_schema(code, schema)
                .map_err(|e| WireError::InvalidEnvelope(format!("gstruct '{}': {}", code, e)))?;
            registered.structs.push(code.clone());
        }

        *registry = staged;
        debug!(
            structs = registered.structs.len(),
            schemas = registered.schemas.len(),
            "envelope globals registered"
        );
        Ok(registered)
    }

    /// Decode `data` with `lstruct`/`lschema` layered over `registry`.
    ///
    /// The registry is only read; call `register_globals` first.
    pub fn decode_data(&self, registry: &TypeRegistry) -> Result<Option<Value>> {
        if self.is_struct_only() {
            return Ok(None);
        }

        let mut ctx = LookupContext::new(registry);
        for (code, shape) in &self.lstruct {
            ctx.insert_struct(code, shape)
                .map_err(|e| WireError::InvalidEnvelope(format!("lstruct '{}': {}", code, e)))?;
        }
        for (name, document) in &self.lschema {
            ctx.insert_schema(name, document.clone());
        }

        let codec = Codec::with_lookup(registry, &ctx);
        let value = match &self.data {
            serde_json::Value::String(text) => match detect(text) {
                Payload::Envelope(_) => {
                    return Err(WireError::InvalidEnvelope(
                        "envelopes cannot be nested".to_string(),
                    ))
                }
                Payload::Typed(body) | Payload::Plain(body) => parse_typed_json(&codec, body)
                    .map_err(|e| match e {
                        WireError::InvalidJson(msg) => {
                            WireError::InvalidEnvelope(format!("data is not JSON: {}", msg))
                        }
                        other => other,
                    })?,
            },
            inline => hydrate_json(&codec, inline.clone())?,
        };
        Ok(Some(value))
    }
}

/// `XTYTX://` text for an envelope
pub fn encode_envelope(envelope: &Envelope) -> Result<String> {
    envelope.encode()
}

/// Parse an envelope, register its globals, then decode its data.
pub fn process_envelope(registry: &mut TypeRegistry, text: &str) -> Result<EnvelopeOutcome> {
    let envelope = Envelope::parse(text)?;
    let registered = envelope.register_globals(registry)?;
    let data = envelope.decode_data(registry)?;
    Ok(EnvelopeOutcome {
        data,
        registered_structs: registered.structs,
        registered_schemas: registered.schemas,
        local_schemas: envelope.lschema,
    })
}

/// Decode any JSON payload: plain, `TYTX`-marked, or `XTYTX://` envelope.
///
/// Returns `None` only for struct-only envelopes.
pub fn decode_message(registry: &mut TypeRegistry, text: &str) -> Result<Option<Value>> {
    match detect(text) {
        Payload::Envelope(_) => process_envelope(registry, text).map(|outcome| outcome.data),
        Payload::Typed(body) | Payload::Plain(body) => {
            parse_typed_json(&Codec::new(registry), body).map(Some)
        }
    }
}
