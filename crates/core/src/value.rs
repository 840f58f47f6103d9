//! Value types for TYTX
//!
//! This module defines the native value model that the typed-text codec
//! encodes into and decodes from `value::CODE` strings.
//!
//! ## The Twelve Kinds
//!
//! 1. `Null` - JSON null / absence of value
//! 2. `Bool` - Boolean true or false (distinct from `Int(0)`/`Int(1)`)
//! 3. `Int` - 64-bit signed integer
//! 4. `Float` - 64-bit IEEE-754 floating point
//! 5. `Decimal` - exact decimal, never routed through a binary float
//! 6. `Date` - calendar date without time
//! 7. `DateTime` - instant, always normalized to UTC
//! 8. `Time` - wall-clock time of day
//! 9. `String` - UTF-8 text
//! 10. `Array` - ordered sequence of values
//! 11. `Object` - string-keyed map that keeps insertion order
//! 12. `Tagged` - an instance of a caller-registered custom class
//!
//! ## Equality Rules
//!
//! - Different kinds are NEVER equal (no type coercion)
//! - `Int(1)` != `Float(1.0)` != `Decimal(1)`
//! - `Decimal` compares by numeric value: `100.50 == 100.5`
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use indexmap::IndexMap;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Insertion-ordered map used for `Value::Object`.
pub type ValueMap = IndexMap<String, Value>;

/// Native value carried through the TYTX codec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// JSON null / absence of value
    Null,

    /// Boolean true or false
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit IEEE-754 floating point
    Float(f64),

    /// Exact decimal number
    Decimal(Decimal),

    /// Calendar date (`YYYY-MM-DD`)
    Date(NaiveDate),

    /// Instant in time, normalized to UTC
    DateTime(DateTime<Utc>),

    /// Time of day (`HH:MM:SS[.mmm]`)
    Time(NaiveTime),

    /// UTF-8 encoded string
    String(String),

    /// Ordered sequence of values
    Array(Vec<Value>),

    /// String-keyed map of values, insertion ordered
    Object(ValueMap),

    /// Instance of a custom class registered with a `~` code
    Tagged(TaggedValue),
}

/// Payload of a custom-class instance.
///
/// `tag` is the native type tag the class was registered with; the registry
/// matches it to find the class when encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedValue {
    /// Native type tag of the custom class
    pub tag: String,
    /// Class-specific payload
    pub data: Box<Value>,
}

impl TaggedValue {
    /// Create a tagged value
    pub fn new(tag: impl Into<String>, data: Value) -> Self {
        Self {
            tag: tag.into(),
            data: Box::new(data),
        }
    }
}

/// Native-type tag of a [`Value`], used to match type definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// `Value::Null`
    Null,
    /// `Value::Bool`
    Bool,
    /// `Value::Int`
    Int,
    /// `Value::Float`
    Float,
    /// `Value::Decimal`
    Decimal,
    /// `Value::Date`
    Date,
    /// `Value::DateTime`
    DateTime,
    /// `Value::Time`
    Time,
    /// `Value::String`
    String,
    /// `Value::Array`
    Array,
    /// `Value::Object`
    Object,
    /// `Value::Tagged`
    Tagged,
}

impl ValueKind {
    /// Human-readable name (for error messages)
    pub const fn name(&self) -> &'static str {
        match self {
            ValueKind::Null => "Null",
            ValueKind::Bool => "Bool",
            ValueKind::Int => "Int",
            ValueKind::Float => "Float",
            ValueKind::Decimal => "Decimal",
            ValueKind::Date => "Date",
            ValueKind::DateTime => "DateTime",
            ValueKind::Time => "Time",
            ValueKind::String => "String",
            ValueKind::Array => "Array",
            ValueKind::Object => "Object",
            ValueKind::Tagged => "Tagged",
        }
    }
}

impl Value {
    /// Returns the native-type tag of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Decimal(_) => ValueKind::Decimal,
            Value::Date(_) => ValueKind::Date,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Time(_) => ValueKind::Time,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
            Value::Tagged(_) => ValueKind::Tagged,
        }
    }

    /// Returns the type name as a string (for error messages)
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is an array or an object
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get as decimal
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as array slice
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Try to get as object reference
    pub fn as_object(&self) -> Option<&ValueMap> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Look up a key when this value is an object
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(key))
    }

    /// Convert a parsed JSON document into a `Value` without hydration.
    ///
    /// Strings stay strings, even when they carry a `::CODE` suffix.
    pub fn from_json(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    // u64 above i64::MAX and every non-integer land here
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(obj) => Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Standard, untyped JSON conversion.
    ///
    /// This is the intentionally lossy path: decimals become floats, temporal
    /// values become ISO strings, tagged values collapse to their payload and
    /// non-finite floats become `null`.
    pub fn to_plain_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => float_to_json(*f),
            Value::Decimal(d) => float_to_json(d.to_f64().unwrap_or(f64::NAN)),
            Value::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
            Value::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            Value::Time(t) => serde_json::Value::String(t.to_string()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(Value::to_plain_json).collect())
            }
            Value::Object(obj) => serde_json::Value::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), v.to_plain_json()))
                    .collect(),
            ),
            Value::Tagged(t) => t.data.to_plain_json(),
        }
    }
}

fn float_to_json(f: f64) -> serde_json::Value {
    serde_json::Number::from_f64(f)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

// ============================================================================
// Custom PartialEq Implementation (no type coercion)
// ============================================================================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // IEEE-754 equality: NaN != NaN, but -0.0 == 0.0
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Tagged(a), Value::Tagged(b)) => a == b,

            // Different kinds: NEVER equal
            _ => false,
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

/// A timezone-naive datetime is reinterpreted as UTC.
impl From<NaiveDateTime> for Value {
    fn from(naive: NaiveDateTime) -> Self {
        tracing::debug!(%naive, "timezone-naive datetime treated as UTC");
        Value::DateTime(naive.and_utc())
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

impl From<ValueMap> for Value {
    fn from(obj: ValueMap) -> Self {
        Value::Object(obj)
    }
}

impl From<TaggedValue> for Value {
    fn from(t: TaggedValue) -> Self {
        Value::Tagged(t)
    }
}

// ============================================================================
// Tests
// ============================================================================
