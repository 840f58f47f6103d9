//! Built-in type definitions
//!
//! Registration order is the `get_for_value` priority order:
//! `B, L, R, N, D, DHZ, H, T, JS`. Booleans come before integers so a
//! boolean never falls through to `L`.
//!
//! | Code | Native | JSON native | Aliases |
//! |------|--------|-------------|---------|
//! | `B` | bool | yes | `BOOL`, `BOOLEAN` |
//! | `L` | i64 | yes | `I`, `INT`, `INTEGER`, `LONG` |
//! | `R` | f64 | yes | `F`, `FLOAT`, `REAL` |
//! | `N` | decimal | no | `DECIMAL`, `NUMERIC` |
//! | `D` | date | no | `DATE` |
//! | `DHZ` | datetime (UTC) | no | `DH` (legacy, decode only), `DT`, `DATETIME` |
//! | `H` | time | no | `TIME` |
//! | `T` | string | yes, never suffixed | `S`, `STR`, `TEXT` |
//! | `JS` | array / object | no | `JSON` |

use super::definition::{Align, NativeTag, TypeDefinition};
use crate::error::{Error, Result};
use crate::value::{Value, ValueKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

/// Canonical built-in codes
pub mod codes {
    /// Boolean
    pub const BOOL: &str = "B";
    /// 64-bit integer
    pub const INT: &str = "L";
    /// 64-bit float
    pub const FLOAT: &str = "R";
    /// Exact decimal
    pub const DECIMAL: &str = "N";
    /// Date
    pub const DATE: &str = "D";
    /// Datetime with zone (canonical)
    pub const DATETIME: &str = "DHZ";
    /// Naive datetime, decode-only alias of `DHZ`
    pub const DATETIME_LEGACY: &str = "DH";
    /// Time of day
    pub const TIME: &str = "H";
    /// Text
    pub const TEXT: &str = "T";
    /// Embedded JSON
    pub const JSON: &str = "JS";
}

/// Build the built-in definitions in priority order.
pub fn builtin_types() -> Vec<TypeDefinition> {
    vec![
        TypeDefinition::new(codes::BOOL, NativeTag::kind(ValueKind::Bool), parse_bool, |v| {
            expect(v, codes::BOOL, |v| v.as_bool().map(|b| b.to_string()))
        })
        .with_name("boolean")
        .with_aliases(["BOOL", "BOOLEAN"])
        .json_native(true)
        .with_display(Align::Center, "false"),
        TypeDefinition::new(codes::INT, NativeTag::kind(ValueKind::Int), parse_int, |v| {
            expect(v, codes::INT, |v| v.as_int().map(|i| i.to_string()))
        })
        .with_name("integer")
        .with_aliases(["I", "INT", "INTEGER", "LONG"])
        .json_native(true)
        .with_display(Align::Right, "0"),
        TypeDefinition::new(codes::FLOAT, NativeTag::kind(ValueKind::Float), parse_float, |v| {
            expect(v, codes::FLOAT, |v| v.as_float().map(format_float))
        })
        .with_name("float")
        .with_aliases(["F", "FLOAT", "REAL"])
        .json_native(true)
        .with_display(Align::Right, "0.0"),
        TypeDefinition::new(codes::DECIMAL, NativeTag::kind(ValueKind::Decimal), parse_decimal, |v| {
            expect(v, codes::DECIMAL, |v| v.as_decimal().map(|d| d.to_string()))
        })
        .with_name("decimal")
        .with_aliases(["DECIMAL", "NUMERIC"])
        .with_display(Align::Right, "0"),
        TypeDefinition::new(codes::DATE, NativeTag::kind(ValueKind::Date), parse_date, |v| {
            expect(v, codes::DATE, |v| match v {
                Value::Date(d) => Some(format_date(d)),
                _ => None,
            })
        })
        .with_name("date")
        .with_aliases(["DATE"])
        .with_display(Align::Center, ""),
        TypeDefinition::new(
            codes::DATETIME,
            NativeTag::kind(ValueKind::DateTime),
            parse_datetime,
            |v| {
                expect(v, codes::DATETIME, |v| match v {
                    Value::DateTime(dt) => Some(format_datetime(dt)),
                    _ => None,
                })
            },
        )
        .with_name("datetime")
        .with_aliases([codes::DATETIME_LEGACY, "DT", "DATETIME"])
        .with_display(Align::Center, ""),
        TypeDefinition::new(codes::TIME, NativeTag::kind(ValueKind::Time), parse_time, |v| {
            expect(v, codes::TIME, |v| match v {
                Value::Time(t) => Some(format_time(t)),
                _ => None,
            })
        })
        .with_name("time")
        .with_aliases(["TIME"])
        .with_display(Align::Center, ""),
        TypeDefinition::new(
            codes::TEXT,
            NativeTag::kind(ValueKind::String),
            |raw| Ok(Value::String(raw.to_string())),
            |v| expect(v, codes::TEXT, |v| v.as_str().map(str::to_string)),
        )
        .with_name("text")
        .with_aliases(["S", "STR", "TEXT"])
        .json_native(true),
        TypeDefinition::new(
            codes::JSON,
            NativeTag::Kinds(vec![ValueKind::Array, ValueKind::Object]),
            parse_json,
            |v| Ok(serde_json::to_string(&v.to_plain_json())?),
        )
        .with_name("json")
        .with_aliases(["JSON"]),
    ]
}

fn expect(value: &Value, code: &str, f: impl Fn(&Value) -> Option<String>) -> Result<String> {
    f(value).ok_or_else(|| Error::invalid_value(code, value.type_name(), "value kind does not match type"))
}

fn parse_bool(raw: &str) -> Result<Value> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" | "on" => Ok(Value::Bool(true)),
        "false" | "f" | "0" | "no" | "n" | "off" => Ok(Value::Bool(false)),
        _ => Err(Error::invalid_value(codes::BOOL, raw, "not a boolean literal")),
    }
}

fn parse_int(raw: &str) -> Result<Value> {
    raw.trim()
        .parse::<i64>()
        .map(Value::Int)
        .map_err(|e| Error::invalid_value(codes::INT, raw, e))
}

fn parse_float(raw: &str) -> Result<Value> {
    raw.trim()
        .parse::<f64>()
        .map(Value::Float)
        .map_err(|e| Error::invalid_value(codes::FLOAT, raw, e))
}

fn parse_decimal(raw: &str) -> Result<Value> {
    let raw_trim = raw.trim();
    Decimal::from_str(raw_trim)
        .or_else(|_| Decimal::from_scientific(raw_trim))
        .map(Value::Decimal)
        .map_err(|e| Error::invalid_value(codes::DECIMAL, raw, e))
}

fn parse_date(raw: &str) -> Result<Value> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(Value::Date)
        .map_err(|e| Error::invalid_value(codes::DATE, raw, e))
}

/// Parse a datetime. Naive input (no offset) is interpreted as UTC.
fn parse_datetime(raw: &str) -> Result<Value> {
    let raw_trim = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw_trim) {
        return Ok(Value::DateTime(dt.with_timezone(&Utc)));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw_trim, fmt) {
            debug!(raw = raw_trim, "timezone-naive datetime interpreted as UTC");
            return Ok(Value::DateTime(naive.and_utc()));
        }
    }
    Err(Error::invalid_value(codes::DATETIME, raw, "not an ISO-8601 datetime"))
}

fn parse_time(raw: &str) -> Result<Value> {
    let raw_trim = raw.trim();
    NaiveTime::parse_from_str(raw_trim, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(raw_trim, "%H:%M"))
        .map(Value::Time)
        .map_err(|e| Error::invalid_value(codes::TIME, raw, e))
}

fn parse_json(raw: &str) -> Result<Value> {
    let json: serde_json::Value = serde_json::from_str(raw)?;
    Ok(Value::from_json(json))
}

/// Format a float so it always reads back as a float (`1` -> `1.0`).
pub fn format_float(f: f64) -> String {
    let s = f.to_string();
    if !f.is_finite() || s.contains('.') || s.contains('e') || s.contains('E') {
        s
    } else {
        format!("{}.0", s)
    }
}

/// `YYYY-MM-DD`
pub fn format_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// ISO-8601 in UTC with a trailing `Z`; sub-second digits only when present.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.fZ").to_string()
}

/// `HH:MM:SS[.fff]`
pub fn format_time(t: &NaiveTime) -> String {
    t.format("%H:%M:%S%.f").to_string()
}
