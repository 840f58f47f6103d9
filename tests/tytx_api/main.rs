//! TYTX API Test Suite
//!
//! Exercises the `tytx` facade end to end: codec, struct resolution,
//! envelopes and the three wire formats.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all API tests
//! cargo test --test tytx_api
//!
//! # Run envelope tests only
//! cargo test --test tytx_api envelope::
//! ```

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use tytx::prelude::*;
use tytx::{XmlChild, XmlContent};

// Test modules
pub mod codec;
pub mod concurrency;
pub mod envelope;
pub mod formats;
pub mod properties;
pub mod structs;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Route `tracing` output through the test harness
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Fresh instance with the built-in types
pub fn create_tytx() -> Tytx {
    init_tracing();
    Tytx::new()
}

/// Decimal from its text form
pub fn dec(s: &str) -> Value {
    Value::Decimal(Decimal::from_str(s).unwrap())
}

/// Map value from key/value pairs
pub fn obj(entries: Vec<(&str, Value)>) -> Value {
    Value::Object(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

/// One value of every built-in type that needs a suffix
pub fn typed_values() -> Vec<(&'static str, Value)> {
    vec![
        ("N", dec("100.50")),
        ("D", Value::Date(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())),
        (
            "DHZ",
            Value::DateTime(Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap()),
        ),
        ("H", Value::Time(NaiveTime::from_hms_opt(10, 30, 0).unwrap())),
    ]
}
