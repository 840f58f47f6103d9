//! Struct resolution
//!
//! Applies a normalized `StructSchema` to decoded JSON data, hydrating leaves
//! through their declared types.
//!
//! ## Shapes
//!
//! - `FieldMap`: each key present in the schema is hydrated; other keys pass
//!   through. Applied to an array, it maps every element.
//! - `Positional`: index-wise; the data length must equal the schema length.
//! - `Homogeneous`: one type for every element, nested arrays included.
//! - `OrderedFields`: a row of values becomes a map (named) or a sequence
//!   (anonymous). An array whose elements are all arrays is a batch of rows,
//!   unless it reads as one row whose fields all take arrays. `[]` is an
//!   empty batch.
//!
//! Strings that carry their own resolvable suffix are decoded before any
//! declared type is applied.

use crate::codec::Codec;
use tracing::debug;
use tytx_core::{
    types::format_float, Error, FieldDef, OrderedField, Result, SchemaItem, StructSchema,
    TypeDefinition, TypeRef, Value,
};

/// Nesting limit for recursive struct references
pub const MAX_RESOLVE_DEPTH: usize = 64;

impl Codec<'_> {
    /// Hydrate `data` against a schema.
    pub fn resolve(&self, data: Value, schema: &StructSchema) -> Result<Value> {
        self.resolve_at(data, schema, 0)
    }

    /// Hydrate `data` against a struct by code; unknown codes return `data`.
    pub fn resolve_struct(&self, data: Value, code: &str) -> Result<Value> {
        match self.lookup.lookup_struct(code) {
            Some(schema) => self.resolve_at(data, schema, 0),
            None => {
                debug!(code, "struct not registered, data left as is");
                Ok(data)
            }
        }
    }

    /// Hydrate a single value against a field definition.
    pub fn hydrate_field(&self, value: Value, def: &FieldDef) -> Result<Value> {
        self.hydrate_ref(value, &def.field_type, 0)
    }

    fn resolve_at(&self, data: Value, schema: &StructSchema, depth: usize) -> Result<Value> {
        if depth > MAX_RESOLVE_DEPTH {
            return Err(Error::SchemaMismatch(format!(
                "struct nesting exceeds {} levels",
                MAX_RESOLVE_DEPTH
            )));
        }

        match schema {
            StructSchema::FieldMap(fields) => match data {
                Value::Object(map) => {
                    let mut out = tytx_core::ValueMap::with_capacity(map.len());
                    for (key, value) in map {
                        let value = match fields.get(&key) {
                            Some(item) => self.hydrate_item(value, item, depth)?,
                            None => value,
                        };
                        out.insert(key, value);
                    }
                    Ok(Value::Object(out))
                }
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| self.resolve_at(item, schema, depth + 1))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array),
                other => Ok(other),
            },
            StructSchema::Positional(items) => match data {
                Value::Array(values) => {
                    if values.len() != items.len() {
                        return Err(Error::SchemaMismatch(format!(
                            "positional struct expects {} elements, got {}",
                            items.len(),
                            values.len()
                        )));
                    }
                    values
                        .into_iter()
                        .zip(items)
                        .map(|(value, item)| self.hydrate_item(value, item, depth))
                        .collect::<Result<Vec<_>>>()
                        .map(Value::Array)
                }
                other => Ok(other),
            },
            StructSchema::Homogeneous(item) => match data {
                Value::Array(values) => values
                    .into_iter()
                    .map(|value| self.hydrate_item(value, item, depth))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array),
                other => Ok(other),
            },
            StructSchema::OrderedFields(fields) => self.resolve_ordered(data, fields, depth),
        }
    }

    fn resolve_ordered(&self, data: Value, fields: &[OrderedField], depth: usize) -> Result<Value> {
        match data {
            Value::Array(rows) if rows.is_empty() => Ok(Value::Array(rows)),
            Value::Array(rows) if is_batch(&rows, fields) => {
                rows.into_iter()
                    .map(|row| match row {
                        Value::Array(values) => self.resolve_row(values, fields, depth),
                        other => Ok(other),
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array)
            }
            Value::Array(values) => self.resolve_row(values, fields, depth),
            Value::Object(map) => {
                let mut out = tytx_core::ValueMap::with_capacity(map.len());
                for (key, value) in map {
                    let field = fields.iter().find(|f| f.name.as_deref() == Some(key.as_str()));
                    let value = match field {
                        Some(f) => self.hydrate_ref(value, &f.def.field_type, depth)?,
                        None => value,
                    };
                    out.insert(key, value);
                }
                Ok(Value::Object(out))
            }
            other => Ok(other),
        }
    }

    fn resolve_row(&self, values: Vec<Value>, fields: &[OrderedField], depth: usize) -> Result<Value> {
        if values.len() != fields.len() {
            return Err(Error::SchemaMismatch(format!(
                "ordered struct expects {} values, got {}",
                fields.len(),
                values.len()
            )));
        }

        let named = fields.first().is_some_and(|f| f.name.is_some());
        if named {
            let mut out = tytx_core::ValueMap::with_capacity(fields.len());
            for (value, field) in values.into_iter().zip(fields) {
                let value = self.hydrate_ref(value, &field.def.field_type, depth)?;
                out.insert(field.name.clone().unwrap_or_default(), value);
            }
            Ok(Value::Object(out))
        } else {
            values
                .into_iter()
                .zip(fields)
                .map(|(value, field)| self.hydrate_ref(value, &field.def.field_type, depth))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array)
        }
    }

    fn hydrate_item(&self, value: Value, item: &SchemaItem, depth: usize) -> Result<Value> {
        match item {
            SchemaItem::Field(def) => self.hydrate_ref(value, &def.field_type, depth),
            SchemaItem::Nested(schema) => self.resolve_at(value, schema, depth + 1),
        }
    }

    fn hydrate_ref(&self, value: Value, type_ref: &TypeRef, depth: usize) -> Result<Value> {
        if let Value::String(s) = &value {
            if self.is_typed(s) {
                return self.decode(s);
            }
        }

        match type_ref {
            TypeRef::Scalar(code) => match self.registry.get(code) {
                Some(def) => self.hydrate_scalar(value, def),
                None => Ok(value),
            },
            TypeRef::Custom(code) => match self.registry.get_class(code) {
                Some(def) => self.hydrate_scalar(value, def),
                None => Ok(value),
            },
            TypeRef::TypedArray(code) => match (value, self.registry.get(code)) {
                (array @ Value::Array(_), Some(def)) => self.hydrate_scalar(array, def),
                (other, _) => Ok(other),
            },
            TypeRef::Struct(code) => match self.lookup.lookup_struct(code) {
                Some(schema) => self.resolve_at(value, schema, depth + 1),
                None => Ok(value),
            },
            TypeRef::StructArray(code) => match (value, self.lookup.lookup_struct(code)) {
                (Value::Array(items), Some(schema)) => items
                    .into_iter()
                    .map(|item| self.resolve_at(item, schema, depth + 1))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array),
                (other, _) => Ok(other),
            },
        }
    }

    /// Apply a scalar type to a leaf, mapping over arrays.
    ///
    /// Strings are parsed as the type's raw text; other scalars are converted
    /// through their plain text. Values the parser rejects are kept as is.
    pub(crate) fn hydrate_scalar(&self, value: Value, def: &TypeDefinition) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.hydrate_scalar(item, def))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Value::String(s) => {
                if self.is_typed(&s) {
                    return self.decode(&s);
                }
                match def.parse(&s) {
                    Ok(v) => Ok(v),
                    Err(e) => {
                        debug!(code = %def.code, raw = %s, error = %e, "leaf kept as text");
                        Ok(Value::String(s))
                    }
                }
            }
            v @ (Value::Object(_) | Value::Tagged(_)) => Ok(v),
            v if def.matches(&v) => Ok(v),
            v => {
                let text = match &v {
                    Value::Bool(b) => b.to_string(),
                    Value::Int(i) => i.to_string(),
                    Value::Float(f) => format_float(*f),
                    _ => return Ok(v),
                };
                Ok(def.parse(&text).unwrap_or(v))
            }
        }
    }
}

/// Every element is an array and the data cannot be read as a single row.
///
/// A single row of arrays needs one array per field, and every field must
/// accept an array.
fn is_batch(rows: &[Value], fields: &[OrderedField]) -> bool {
    if !rows.iter().all(|row| matches!(row, Value::Array(_))) {
        return false;
    }
    let row_fits = rows.len() == fields.len()
        && fields.iter().all(|field| {
            matches!(
                field.def.field_type,
                TypeRef::TypedArray(_) | TypeRef::StructArray(_) | TypeRef::Struct(_)
            )
        });
    !row_fits
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;
    use tytx_core::TypeRegistry;

    fn dec(s: &str) -> Value {
        Value::Decimal(Decimal::from_str(s).unwrap())
    }

    fn data(json: serde_json::Value) -> Value {
        Value::from_json(json)
    }

    fn registry_with(code: &str, schema: serde_json::Value) -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register_struct(code, &schema).unwrap();
        registry
    }

    // === FieldMap ===

    mod field_map_tests {
        use super::*;

        #[test]
        fn test_hydrates_declared_fields_only() {
            let registry = registry_with("CUSTOMER", json!({"name": "T", "balance": "N"}));
            let codec = Codec::new(&registry);
            let out = codec
                .resolve_struct(data(json!({"name": "Acme", "balance": "100", "extra": "x"})), "CUSTOMER")
                .unwrap();
            assert_eq!(out.get("name"), Some(&Value::String("Acme".into())));
            assert_eq!(out.get("balance"), Some(&dec("100")));
            assert_eq!(out.get("extra"), Some(&Value::String("x".into())));
        }

        #[test]
        fn test_missing_keys_are_not_added() {
            let registry = registry_with("C", json!({"name": "T", "balance": "N"}));
            let codec = Codec::new(&registry);
            let out = codec.resolve_struct(data(json!({"name": "Acme"})), "C").unwrap();
            assert_eq!(out.as_object().unwrap().len(), 1);
        }

        #[test]
        fn test_applied_to_array_maps_elements() {
            let registry = registry_with("C", json!({"balance": "N"}));
            let codec = Codec::new(&registry);
            let out = codec
                .resolve_struct(data(json!([{"balance": "1"}, {"balance": "2"}])), "C")
                .unwrap();
            assert_eq!(out.as_array().unwrap()[1].get("balance"), Some(&dec("2")));
        }

        #[test]
        fn test_nested_struct_reference() {
            let mut registry = TypeRegistry::new();
            registry.register_struct("ADDR", &json!({"zip": "L"})).unwrap();
            registry
                .register_struct("PERSON", &json!({"name": "T", "home": "@ADDR"}))
                .unwrap();
            let codec = Codec::new(&registry);
            let out = codec
                .resolve_struct(data(json!({"name": "Ann", "home": {"zip": "12345"}})), "PERSON")
                .unwrap();
            assert_eq!(out.get("home").unwrap().get("zip"), Some(&Value::Int(12345)));
        }

        #[test]
        fn test_struct_array_field() {
            let mut registry = TypeRegistry::new();
            registry.register_struct("ROW", &json!({"v": "N"})).unwrap();
            registry
                .register_struct("TABLE", &json!({"title": "T", "rows": "#@ROW"}))
                .unwrap();
            let codec = Codec::new(&registry);
            let out = codec
                .resolve_struct(
                    data(json!({"title": "t", "rows": [{"v": "1"}, {"v": "2.5"}]})),
                    "TABLE",
                )
                .unwrap();
            let rows = out.get("rows").unwrap().as_array().unwrap();
            assert_eq!(rows[0].get("v"), Some(&dec("1")));
            assert_eq!(rows[1].get("v"), Some(&dec("2.5")));
        }

        #[test]
        fn test_unregistered_references_pass_through() {
            let registry = registry_with("C", json!({"one": "@NOPE", "many": "#@NOPE", "n": "L"}));
            let codec = Codec::new(&registry);
            let one = json!({"zip": "123", "tags": ["a", "b"]});
            let many = json!([{"zip": "1"}, ["x", 2]]);
            let out = codec
                .resolve_struct(
                    data(json!({"one": one.clone(), "many": many.clone(), "n": "7"})),
                    "C",
                )
                .unwrap();
            assert_eq!(out.get("one"), Some(&data(one)));
            assert_eq!(out.get("many"), Some(&data(many)));
            assert_eq!(out.get("n"), Some(&Value::Int(7)));
        }

        #[test]
        fn test_inline_nested_shape() {
            let registry = registry_with("ORDER", json!({"lines": [{"qty": "L", "price": "N"}]}));
            let codec = Codec::new(&registry);
            let out = codec
                .resolve_struct(
                    data(json!({"lines": [{"qty": "2", "price": "9.99"}, {"qty": 1, "price": "5"}]})),
                    "ORDER",
                )
                .unwrap();
            let lines = out.get("lines").unwrap().as_array().unwrap();
            assert_eq!(lines[0].get("qty"), Some(&Value::Int(2)));
            assert_eq!(lines[0].get("price"), Some(&dec("9.99")));
            assert_eq!(lines[1].get("qty"), Some(&Value::Int(1)));
        }

        #[test]
        fn test_self_typed_strings_win() {
            let registry = registry_with("C", json!({"balance": "N"}));
            let codec = Codec::new(&registry);
            let out = codec.resolve_struct(data(json!({"balance": "5::L"})), "C").unwrap();
            assert_eq!(out.get("balance"), Some(&Value::Int(5)));
        }
    }

    // === Positional and Homogeneous ===

    mod list_tests {
        use super::*;

        #[test]
        fn test_positional() {
            let registry = registry_with("ROW", json!(["T", "L", "N"]));
            let codec = Codec::new(&registry);
            let out = codec
                .resolve_struct(data(json!(["Product", 2, "100.50"])), "ROW")
                .unwrap();
            assert_eq!(
                out,
                Value::Array(vec![Value::String("Product".into()), Value::Int(2), dec("100.50")])
            );
        }

        #[test]
        fn test_positional_struct_array() {
            let mut registry = TypeRegistry::new();
            registry.register_struct("ITEM", &json!("qty:L,price:N")).unwrap();
            registry.register_struct("ORDER", &json!(["T", "#@ITEM"])).unwrap();
            let codec = Codec::new(&registry);
            let out = codec
                .resolve_struct(data(json!(["A-1", [["2", "9.99"], ["1", "5"]]])), "ORDER")
                .unwrap();
            let items = out.as_array().unwrap()[1].as_array().unwrap();
            assert_eq!(items.len(), 2);
            assert_eq!(items[0].get("qty"), Some(&Value::Int(2)));
            assert_eq!(items[1].get("price"), Some(&dec("5")));
        }

        #[test]
        fn test_positional_unregistered_reference() {
            let registry = registry_with("ROW", json!(["L", "@NOPE", "#@NOPE"]));
            let codec = Codec::new(&registry);
            let out = codec
                .resolve_struct(data(json!(["1", ["a", "b"], [{"k": "v"}]])), "ROW")
                .unwrap();
            assert_eq!(
                out,
                Value::Array(vec![
                    Value::Int(1),
                    data(json!(["a", "b"])),
                    data(json!([{"k": "v"}])),
                ])
            );
        }

        #[test]
        fn test_positional_length_mismatch() {
            let registry = registry_with("ROW", json!(["T", "L", "N"]));
            let codec = Codec::new(&registry);
            let err = codec.resolve_struct(data(json!(["a", 1])), "ROW").unwrap_err();
            assert!(matches!(err, Error::SchemaMismatch(_)));
        }

        #[test]
        fn test_homogeneous() {
            let registry = registry_with("PRICES", json!(["N"]));
            let codec = Codec::new(&registry);
            let out = codec.resolve_struct(data(json!([100, 200, 50])), "PRICES").unwrap();
            assert_eq!(out, Value::Array(vec![dec("100"), dec("200"), dec("50")]));
            assert_eq!(
                codec.resolve_struct(data(json!([])), "PRICES").unwrap(),
                Value::Array(vec![])
            );
        }

        #[test]
        fn test_homogeneous_nested() {
            let registry = registry_with("GRID", json!([["N"]]));
            let codec = Codec::new(&registry);
            let out = codec.resolve_struct(data(json!([[1, 2], [3]])), "GRID").unwrap();
            assert_eq!(
                out,
                Value::Array(vec![
                    Value::Array(vec![dec("1"), dec("2")]),
                    Value::Array(vec![dec("3")]),
                ])
            );
        }

        #[test]
        fn test_homogeneous_struct_elements() {
            let mut registry = TypeRegistry::new();
            registry.register_struct("ROW", &json!({"v": "N"})).unwrap();
            registry.register_struct("ROWS", &json!(["@ROW"])).unwrap();
            let codec = Codec::new(&registry);
            let out = codec
                .resolve_struct(data(json!([{"v": "1"}, {"v": "2"}])), "ROWS")
                .unwrap();
            assert_eq!(out.as_array().unwrap()[0].get("v"), Some(&dec("1")));
        }
    }

    // === OrderedFields ===

    mod ordered_tests {
        use super::*;

        #[test]
        fn test_named_row_becomes_map() {
            let registry = registry_with("POINT", json!("x:R,y:R"));
            let codec = Codec::new(&registry);
            let out = codec.resolve_struct(data(json!(["3.7", "7.3"])), "POINT").unwrap();
            assert_eq!(out.get("x"), Some(&Value::Float(3.7)));
            assert_eq!(out.get("y"), Some(&Value::Float(7.3)));
        }

        #[test]
        fn test_anonymous_row_stays_sequence() {
            let registry = registry_with("PAIR", json!("R,R"));
            let codec = Codec::new(&registry);
            let out = codec.resolve_struct(data(json!(["3.7", "7.3"])), "PAIR").unwrap();
            assert_eq!(out, Value::Array(vec![Value::Float(3.7), Value::Float(7.3)]));
        }

        #[test]
        fn test_batch_mode() {
            let registry = registry_with("POINT", json!("x:R,y:R"));
            let codec = Codec::new(&registry);
            let out = codec
                .resolve_struct(data(json!([["1", "2"], ["3", "4"]])), "POINT")
                .unwrap();
            let rows = out.as_array().unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[1].get("y"), Some(&Value::Float(4.0)));
        }

        #[test]
        fn test_empty_batch() {
            let registry = registry_with("POINT", json!("x:R,y:R"));
            let codec = Codec::new(&registry);
            assert_eq!(
                codec.resolve_struct(data(json!([])), "POINT").unwrap(),
                Value::Array(vec![])
            );
        }

        #[test]
        fn test_array_fields_read_as_one_row() {
            let registry = registry_with("S", json!("a:#N,b:#N"));
            let codec = Codec::new(&registry);
            let out = codec
                .resolve_struct(data(json!([["1", "2"], ["3", "4"]])), "S")
                .unwrap();
            assert_eq!(out.get("a"), Some(&Value::Array(vec![dec("1"), dec("2")])));
            assert_eq!(out.get("b"), Some(&Value::Array(vec![dec("3"), dec("4")])));

            // three rows cannot be one two-field row
            let out = codec
                .resolve_struct(data(json!([[["1"], ["2"]], [["3"], ["4"]], [[], []]])), "S")
                .unwrap();
            let rows = out.as_array().unwrap();
            assert_eq!(rows.len(), 3);
            assert_eq!(rows[1].get("b"), Some(&Value::Array(vec![dec("4")])));
        }

        #[test]
        fn test_struct_array_field_in_row() {
            let mut registry = TypeRegistry::new();
            registry.register_struct("ITEM", &json!({"sku": "T", "qty": "L"})).unwrap();
            registry.register_struct("ORDER", &json!("id:L,items:#@ITEM")).unwrap();
            let codec = Codec::new(&registry);
            let out = codec
                .resolve_struct(data(json!(["7", [{"sku": "A", "qty": "2"}]])), "ORDER")
                .unwrap();
            assert_eq!(out.get("id"), Some(&Value::Int(7)));
            let items = out.get("items").unwrap().as_array().unwrap();
            assert_eq!(items[0].get("qty"), Some(&Value::Int(2)));
        }

        #[test]
        fn test_object_maps_by_name() {
            let registry = registry_with("POINT", json!("x:R,y:R"));
            let codec = Codec::new(&registry);
            let out = codec
                .resolve_struct(data(json!({"y": "2.5", "x": "1"})), "POINT")
                .unwrap();
            assert_eq!(out.get("x"), Some(&Value::Float(1.0)));
            assert_eq!(out.get("y"), Some(&Value::Float(2.5)));
        }

        #[test]
        fn test_length_mismatch() {
            let registry = registry_with("POINT", json!("x:R,y:R"));
            let codec = Codec::new(&registry);
            let err = codec.resolve_struct(data(json!(["1"])), "POINT").unwrap_err();
            assert!(matches!(err, Error::SchemaMismatch(_)));
        }
    }

    // === Limits and fallbacks ===

    #[test]
    fn test_unknown_struct_leaves_data() {
        let registry = TypeRegistry::new();
        let codec = Codec::new(&registry);
        let value = data(json!({"a": "1"}));
        assert_eq!(codec.resolve_struct(value.clone(), "NOPE").unwrap(), value);
    }

    #[test]
    fn test_unparsable_leaf_kept() {
        let registry = registry_with("C", json!({"n": "L"}));
        let codec = Codec::new(&registry);
        let out = codec.resolve_struct(data(json!({"n": "abc"})), "C").unwrap();
        assert_eq!(out.get("n"), Some(&Value::String("abc".into())));
    }

    #[test]
    fn test_recursive_struct_depth_limit() {
        let registry = registry_with("NODE", json!({"next": "@NODE"}));
        let codec = Codec::new(&registry);

        let mut value = json!({"leaf": true});
        for _ in 0..(MAX_RESOLVE_DEPTH + 2) {
            value = json!({ "next": value });
        }
        let err = codec.resolve_struct(data(value), "NODE").unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch(_)));

        let shallow = data(json!({"next": {"next": null}}));
        assert!(codec.resolve_struct(shallow, "NODE").is_ok());
    }
}
