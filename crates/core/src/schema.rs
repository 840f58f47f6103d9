//! Struct schemas
//!
//! A struct schema describes how to type-annotate an otherwise untyped JSON
//! structure. Callers register schemas in one of several raw shapes; each is
//! normalized once, at registration time, into a [`StructSchema`]:
//!
//! | Raw shape | Normalized | Applies |
//! |-----------|------------|---------|
//! | `{"name": "T", "balance": "N"}` | `FieldMap` | by key |
//! | `["T", "L", "N"]` | `Positional` | by index, lengths must match |
//! | `["N"]`, `[["N"]]` | `Homogeneous` | to every element, per nesting level |
//! | `"x:R,y:R"` / `"R,R"` | `OrderedFields` | by position, into a map / sequence |
//!
//! Field types use the suffix grammar (`L`, `~MONEY`, `@ADDR`, `#N`, `#@ITEM`)
//! plus optional bracketed metadata. A field may also be the extended form
//! `{"type": "N[min:0]", "validate": {..}, "ui": {..}}`, or an inline nested
//! shape (object without `type`, or a list).

use crate::error::{Error, Result};
use crate::metadata::{format_metadata, parse_type_spec, split_top_level, FieldMetadata};
use crate::type_ref::TypeRef;
use indexmap::IndexMap;

/// A typed field: reference plus carried metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Declared type
    pub field_type: TypeRef,
    /// Validation / UI facets
    pub metadata: FieldMetadata,
}

impl FieldDef {
    /// Field with no metadata
    pub fn new(field_type: TypeRef) -> Self {
        Self {
            field_type,
            metadata: FieldMetadata::default(),
        }
    }

    /// Parse `CODE[facets]`.
    pub fn parse(spec: &str) -> std::result::Result<Self, String> {
        let (code, metadata) = parse_type_spec(spec).map_err(|e| e.to_string())?;
        let field_type =
            TypeRef::parse(code).ok_or_else(|| format!("'{}' is not a type reference", spec))?;
        Ok(Self {
            field_type,
            metadata,
        })
    }

    /// Type text with metadata, e.g. `N[min:0]`
    pub fn to_spec(&self) -> String {
        format!("{}{}", self.field_type, format_metadata(&self.metadata))
    }
}

/// One slot of a schema: a typed field or an inline nested shape.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaItem {
    /// Typed leaf
    Field(FieldDef),
    /// Inline nested shape
    Nested(Box<StructSchema>),
}

/// One segment of an ordered-fields string.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedField {
    /// Field name, `None` for anonymous segments
    pub name: Option<String>,
    /// Field type
    pub def: FieldDef,
}

/// Normalized struct schema.
#[derive(Debug, Clone, PartialEq)]
pub enum StructSchema {
    /// Field name to type
    FieldMap(IndexMap<String, SchemaItem>),
    /// Index-wise types, length > 1
    Positional(Vec<SchemaItem>),
    /// One type applied to every element
    Homogeneous(Box<SchemaItem>),
    /// `name:type,...` (named) or `type,...` (anonymous)
    OrderedFields(Vec<OrderedField>),
}

impl StructSchema {
    /// Normalize a raw JSON shape.
    pub fn from_json(code: &str, raw: &serde_json::Value) -> Result<Self> {
        Self::normalize(raw).map_err(|reason| Error::InvalidSchema {
            code: code.to_string(),
            reason,
        })
    }

    /// Normalize an ordered-fields string such as `x:R,y:R`.
    pub fn from_ordered(code: &str, text: &str) -> Result<Self> {
        Self::parse_ordered(text).map_err(|reason| Error::InvalidSchema {
            code: code.to_string(),
            reason,
        })
    }

    fn normalize(raw: &serde_json::Value) -> std::result::Result<Self, String> {
        match raw {
            serde_json::Value::Object(map) => {
                let mut fields = IndexMap::with_capacity(map.len());
                for (name, item) in map {
                    let item = normalize_item(item).map_err(|e| format!("field '{}': {}", name, e))?;
                    fields.insert(name.clone(), item);
                }
                Ok(StructSchema::FieldMap(fields))
            }
            serde_json::Value::Array(items) => match items.len() {
                0 => Err("empty list schema".to_string()),
                1 => Ok(StructSchema::Homogeneous(Box::new(normalize_item(&items[0])?))),
                _ => items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| normalize_item(item).map_err(|e| format!("index {}: {}", i, e)))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map(StructSchema::Positional),
            },
            serde_json::Value::String(text) => Self::parse_ordered(text),
            other => Err(format!("unsupported schema shape: {}", other)),
        }
    }

    fn parse_ordered(text: &str) -> std::result::Result<Self, String> {
        let mut fields = Vec::new();
        for segment in split_top_level(text, ',')? {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(format!("empty segment in '{}'", text));
            }
            // A name colon must come before any metadata bracket
            let bracket = segment.find('[').unwrap_or(segment.len());
            let (name, spec) = match segment[..bracket].find(':') {
                Some(idx) => (Some(segment[..idx].trim().to_string()), &segment[idx + 1..]),
                None => (None, segment),
            };
            if matches!(&name, Some(n) if n.is_empty()) {
                return Err(format!("empty field name in '{}'", segment));
            }
            fields.push(OrderedField {
                name,
                def: FieldDef::parse(spec)?,
            });
        }
        let named = fields.iter().filter(|f| f.name.is_some()).count();
        if named != 0 && named != fields.len() {
            return Err(format!("mixed named and anonymous fields in '{}'", text));
        }
        Ok(StructSchema::OrderedFields(fields))
    }

    /// Shape name, for diagnostics
    pub fn shape_name(&self) -> &'static str {
        match self {
            StructSchema::FieldMap(_) => "FieldMap",
            StructSchema::Positional(_) => "PositionalList",
            StructSchema::Homogeneous(_) => "HomogeneousList",
            StructSchema::OrderedFields(_) => "OrderedFieldsString",
        }
    }

    /// Render back into a raw JSON shape
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            StructSchema::FieldMap(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, item)| (k.clone(), item_to_json(item)))
                    .collect(),
            ),
            StructSchema::Positional(items) => {
                serde_json::Value::Array(items.iter().map(item_to_json).collect())
            }
            StructSchema::Homogeneous(item) => serde_json::Value::Array(vec![item_to_json(item)]),
            StructSchema::OrderedFields(fields) => serde_json::Value::String(
                fields
                    .iter()
                    .map(|f| match &f.name {
                        Some(name) => format!("{}:{}", name, f.def.to_spec()),
                        None => f.def.to_spec(),
                    })
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        }
    }

    /// Struct names this schema refers to, directly or through nesting
    pub fn referenced_structs(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_refs(&mut out);
        out
    }

    fn collect_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
        let visit = |item: &'a SchemaItem, out: &mut Vec<&'a str>| match item {
            SchemaItem::Field(def) if def.field_type.is_struct() => out.push(def.field_type.code()),
            SchemaItem::Field(_) => {}
            SchemaItem::Nested(inner) => inner.collect_refs(out),
        };
        match self {
            StructSchema::FieldMap(fields) => fields.values().for_each(|i| visit(i, out)),
            StructSchema::Positional(items) => items.iter().for_each(|i| visit(i, out)),
            StructSchema::Homogeneous(item) => visit(item, out),
            StructSchema::OrderedFields(fields) => out.extend(
                fields
                    .iter()
                    .filter(|f| f.def.field_type.is_struct())
                    .map(|f| f.def.field_type.code()),
            ),
        }
    }
}

fn normalize_item(raw: &serde_json::Value) -> std::result::Result<SchemaItem, String> {
    match raw {
        serde_json::Value::String(spec) => FieldDef::parse(spec).map(SchemaItem::Field),
        serde_json::Value::Object(map) => match map.get("type") {
            Some(serde_json::Value::String(spec)) => {
                let mut def = FieldDef::parse(spec)?;
                def.metadata.merge(extended_metadata(map)?);
                Ok(SchemaItem::Field(def))
            }
            Some(other) => Err(format!("'type' must be a string, got {}", other)),
            None => StructSchema::normalize(raw).map(|s| SchemaItem::Nested(Box::new(s))),
        },
        serde_json::Value::Array(_) => {
            StructSchema::normalize(raw).map(|s| SchemaItem::Nested(Box::new(s)))
        }
        other => Err(format!("unsupported field definition: {}", other)),
    }
}

fn extended_metadata(
    map: &serde_json::Map<String, serde_json::Value>,
) -> std::result::Result<FieldMetadata, String> {
    let group = |key: &str| -> std::result::Result<IndexMap<String, serde_json::Value>, String> {
        match map.get(key) {
            None => Ok(IndexMap::new()),
            Some(serde_json::Value::Object(obj)) => {
                Ok(obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            }
            Some(other) => Err(format!("'{}' must be an object, got {}", key, other)),
        }
    };
    Ok(FieldMetadata {
        validate: group("validate")?,
        ui: group("ui")?,
    })
}

fn item_to_json(item: &SchemaItem) -> serde_json::Value {
    match item {
        SchemaItem::Field(def) => serde_json::Value::String(def.to_spec()),
        SchemaItem::Nested(inner) => inner.to_json(),
    }
}
