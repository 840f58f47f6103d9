//! JSON encoding
//!
//! Writes the value tree directly, keeping map order. Typed leaves are
//! produced by the codec; the return flag of `write_typed_json` reports
//! whether any were written.

use crate::error::Result;
use crate::markers::PayloadMarker;
use tytx_codec::Codec;
use tytx_core::Value;

/// Encode a value as TYTX JSON, adding `marker` if any leaf is typed.
pub fn to_typed_json(codec: &Codec<'_>, value: &Value, marker: PayloadMarker) -> Result<String> {
    let mut out = String::new();
    let special = write_typed_json(codec, value, &mut out)?;
    Ok(if special { marker.apply(out) } else { out })
}

/// Standard JSON, lossy for decimals, dates and tagged values.
pub fn to_json(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(&value.to_plain_json())?)
}

/// Append the JSON body of `value` to `out`.
///
/// Returns true if at least one leaf was written as a typed string.
pub fn write_typed_json(codec: &Codec<'_>, value: &Value, out: &mut String) -> Result<bool> {
    match value {
        Value::Null => {
            out.push_str("null");
            Ok(false)
        }
        Value::String(s) => {
            out.push_str(&encode_string(s));
            Ok(false)
        }
        Value::Array(items) => {
            let mut special = false;
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                special |= write_typed_json(codec, item, out)?;
            }
            out.push(']');
            Ok(special)
        }
        Value::Object(map) => {
            let mut special = false;
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&encode_string(key));
                out.push(':');
                special |= write_typed_json(codec, item, out)?;
            }
            out.push('}');
            Ok(special)
        }
        leaf => {
            if is_json_native(codec, leaf) {
                out.push_str(&leaf.to_plain_json().to_string());
                Ok(false)
            } else {
                out.push_str(&encode_string(&codec.encode(leaf, true)?));
                Ok(true)
            }
        }
    }
}

fn is_json_native(codec: &Codec<'_>, leaf: &Value) -> bool {
    if let Value::Float(f) = leaf {
        if !f.is_finite() {
            return false;
        }
    }
    match codec.registry().get_for_value(leaf) {
        Some(def) => def.json_native,
        None => !matches!(leaf, Value::Tagged(_)),
    }
}

/// Encode a string with JSON escaping
pub fn encode_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result.push('"');
    result
}
