//! JSON decoding
//!
//! Parses with `serde_json` (key order preserved) and hydrates every string
//! leaf through the codec. Envelopes need a writable registry and are routed
//! by `decode_message` instead.

use crate::error::{Result, WireError};
use crate::markers::{detect, Payload};
use tytx_codec::Codec;
use tytx_core::{Value, ValueMap};

/// Decode a JSON payload, with or without a `TYTX` marker.
///
/// `XTYTX://` envelopes are rejected here; they register structs and must go
/// through `decode_message` or `process_envelope`.
pub fn from_json(codec: &Codec<'_>, text: &str) -> Result<Value> {
    match detect(text) {
        Payload::Envelope(_) => Err(WireError::InvalidEnvelope(
            "XTYTX payload needs a writable registry".to_string(),
        )),
        Payload::Typed(body) | Payload::Plain(body) => parse_typed_json(codec, body),
    }
}

/// Parse an unmarked JSON body and hydrate it.
///
/// A body that is not JSON but carries a resolvable suffix, such as
/// `["1.5","2"]::@POINT` or `[1,2,3]::#L`, is decoded as one typed value.
pub fn parse_typed_json(codec: &Codec<'_>, body: &str) -> Result<Value> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => hydrate_json(codec, json),
        Err(_) if codec.is_typed(body.trim()) => Ok(codec.decode(body.trim())?),
        Err(e) => Err(e.into()),
    }
}

/// Convert a parsed JSON tree, decoding every string leaf.
pub fn hydrate_json(codec: &Codec<'_>, json: serde_json::Value) -> Result<Value> {
    match json {
        serde_json::Value::String(s) => Ok(codec.decode(&s)?),
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| hydrate_json(codec, item))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        serde_json::Value::Object(map) => {
            let mut out = ValueMap::with_capacity(map.len());
            for (key, item) in map {
                out.insert(key, hydrate_json(codec, item)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(Value::from_json(other)),
    }
}
