//! MessagePack adapter
//!
//! Typed payloads travel inside an extension block of type 42 whose bytes are
//! the UTF-8 TYTX JSON text. In hybrid mode a value with no typed leaves is
//! written as plain MessagePack instead; readers tell the two apart by the
//! presence of the extension block.

use crate::error::{Result, WireError};
use crate::json::{from_json, write_typed_json};
use rust_decimal::Decimal;
use tytx_codec::Codec;
use tytx_core::{Value, ValueMap};

/// Extension type carrying TYTX JSON text
pub const TYTX_EXT_TYPE: i8 = 42;

/// Encode a value as MessagePack.
pub fn to_msgpack(codec: &Codec<'_>, value: &Value, hybrid: bool) -> Result<Vec<u8>> {
    let mut text = String::new();
    let special = write_typed_json(codec, value, &mut text)?;

    let packed = if hybrid && !special {
        plain(value)?
    } else {
        rmpv::Value::Ext(TYTX_EXT_TYPE, text.into_bytes())
    };

    let mut out = Vec::new();
    rmpv::encode::write_value(&mut out, &packed)?;
    Ok(out)
}

/// Decode MessagePack bytes, unwrapping TYTX extension blocks anywhere in the tree.
pub fn from_msgpack(codec: &Codec<'_>, bytes: &[u8]) -> Result<Value> {
    let mut reader = bytes;
    let packed = rmpv::decode::read_value(&mut reader)?;
    unpack(codec, packed)
}

fn plain(value: &Value) -> Result<rmpv::Value> {
    Ok(match value {
        Value::Null => rmpv::Value::Nil,
        Value::Bool(b) => rmpv::Value::Boolean(*b),
        Value::Int(i) => rmpv::Value::from(*i),
        Value::Float(f) => rmpv::Value::F64(*f),
        Value::String(s) => rmpv::Value::from(s.as_str()),
        Value::Array(items) => {
            rmpv::Value::Array(items.iter().map(plain).collect::<Result<Vec<_>>>()?)
        }
        Value::Object(map) => rmpv::Value::Map(
            map.iter()
                .map(|(k, v)| Ok((rmpv::Value::from(k.as_str()), plain(v)?)))
                .collect::<Result<Vec<_>>>()?,
        ),
        other => {
            return Err(WireError::MessagePack(format!(
                "{} has no plain MessagePack form",
                other.type_name()
            )))
        }
    })
}

fn unpack(codec: &Codec<'_>, packed: rmpv::Value) -> Result<Value> {
    match packed {
        rmpv::Value::Nil => Ok(Value::Null),
        rmpv::Value::Boolean(b) => Ok(Value::Bool(b)),
        rmpv::Value::Integer(i) => match i.as_i64() {
            Some(i) => Ok(Value::Int(i)),
            None => match i.as_u64() {
                Some(u) => Ok(Value::Decimal(Decimal::from(u))),
                None => Err(WireError::MessagePack(format!("integer {} out of range", i))),
            },
        },
        rmpv::Value::F32(f) => Ok(Value::Float(f64::from(f))),
        rmpv::Value::F64(f) => Ok(Value::Float(f)),
        rmpv::Value::String(s) => match s.into_str() {
            Some(s) => Ok(codec.decode(&s)?),
            None => Err(WireError::MessagePack("string is not valid UTF-8".to_string())),
        },
        rmpv::Value::Binary(_) => Err(WireError::MessagePack(
            "binary values are not supported".to_string(),
        )),
        rmpv::Value::Array(items) => items
            .into_iter()
            .map(|item| unpack(codec, item))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        rmpv::Value::Map(entries) => {
            let mut out = ValueMap::with_capacity(entries.len());
            for (key, value) in entries {
                let key = match key {
                    rmpv::Value::String(s) => s.into_str().ok_or_else(|| {
                        WireError::MessagePack("map key is not valid UTF-8".to_string())
                    })?,
                    other => {
                        return Err(WireError::MessagePack(format!(
                            "map keys must be strings, got {}",
                            other
                        )))
                    }
                };
                out.insert(key, unpack(codec, value)?);
            }
            Ok(Value::Object(out))
        }
        rmpv::Value::Ext(TYTX_EXT_TYPE, data) => {
            let text = String::from_utf8(data).map_err(|e| {
                WireError::MessagePack(format!("extension payload is not UTF-8: {}", e))
            })?;
            from_json(codec, &text)
        }
        rmpv::Value::Ext(other, _) => Err(WireError::MessagePack(format!(
            "unsupported extension type {}",
            other
        ))),
    }
}
