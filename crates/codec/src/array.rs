//! Compact typed arrays
//!
//! A uniform (possibly nested) array is written once with a `#CODE` suffix
//! instead of suffixing every element: `[1,2,3]::#L`, `["1.5","2"]::#N`.
//! JSON-native leaves stay JSON values; other leaves become their raw text.

use crate::codec::Codec;
use tracing::debug;
use tytx_core::{codes, Result, TypeDefinition, TypeRef, Value};

impl Codec<'_> {
    /// Encode an array as `[..]::#CODE`.
    ///
    /// With `code` set, that type is used for every leaf. Without it the type
    /// is detected: all non-null leaves must resolve to the same definition.
    /// Returns `None` when the array is empty, mixed, made of plain text, or
    /// `code` is not registered.
    pub fn encode_array(&self, values: &[Value], code: Option<&str>) -> Result<Option<String>> {
        let def = match code {
            Some(code) => self.registry.get(code),
            None => self.uniform_type(values),
        };
        let Some(def) = def else {
            return Ok(None);
        };
        if def.code == codes::TEXT && code.is_none() {
            return Ok(None);
        }

        let json = self.array_to_json(values, def)?;
        let text = serde_json::to_string(&json)?;
        Ok(Some(format!("{}::{}", text, TypeRef::TypedArray(def.code.clone()))))
    }

    /// The single definition claiming every non-null leaf, if any.
    fn uniform_type(&self, values: &[Value]) -> Option<&TypeDefinition> {
        let mut found: Option<&TypeDefinition> = None;
        let mut stack: Vec<&Value> = values.iter().collect();
        while let Some(value) = stack.pop() {
            match value {
                Value::Null => continue,
                Value::Array(items) => stack.extend(items.iter()),
                leaf => {
                    let def = self.registry.get_for_value(leaf)?;
                    if def.is_custom() || def.code == codes::JSON {
                        return None;
                    }
                    match found {
                        Some(prev) if prev.code != def.code => {
                            debug!(first = %prev.code, other = %def.code, "array is not uniform");
                            return None;
                        }
                        _ => found = Some(def),
                    }
                }
            }
        }
        found
    }

    fn array_to_json(&self, values: &[Value], def: &TypeDefinition) -> Result<serde_json::Value> {
        values
            .iter()
            .map(|value| match value {
                Value::Null => Ok(serde_json::Value::Null),
                Value::Array(items) => self.array_to_json(items, def),
                Value::Float(f) if !f.is_finite() => def.serialize(value).map(serde_json::Value::String),
                leaf if def.json_native && def.matches(leaf) => Ok(leaf.to_plain_json()),
                leaf => def.serialize(leaf).map(serde_json::Value::String),
            })
            .collect::<Result<Vec<_>>>()
            .map(serde_json::Value::Array)
    }
}
