//! # TYTX
//!
//! Typed-text interchange: native values (decimals, dates, datetimes, times)
//! that survive transport through JSON, XML and MessagePack.
//!
//! Values travel as `value::CODE` strings. The receiver looks the code up in
//! its type registry and rebuilds the native value; codes it does not know
//! pass through untouched.
//!
//! ## Quick Start
//!
//! ```
//! use tytx::prelude::*;
//! use std::str::FromStr;
//!
//! let tytx = Tytx::new();
//!
//! let mut order = ValueMap::new();
//! order.insert("id".into(), Value::Int(42));
//! order.insert("total".into(), Value::Decimal(rust_decimal::Decimal::from_str("199.99").unwrap()));
//!
//! let text = tytx.to_typed_json(&Value::Object(order.clone())).unwrap();
//! assert_eq!(text, r#"{"id":42,"total":"199.99::N"}::TYTX"#);
//! assert_eq!(tytx.from_json(&text).unwrap(), Value::Object(order));
//! ```
//!
//! ## Suffix forms
//!
//! | Form | Meaning |
//! |------|---------|
//! | `100.50::N` | scalar of a built-in type |
//! | `abc::~UUID` | custom class registered with `register_class` |
//! | `["1","2"]::@POINT` | struct, hydrated field by field |
//! | `[[..],[..]]::@ROW` | struct applied to every row |
//! | `[1,2,3]::#N` | every leaf of the array has type `N` |
//! | `[[..],[..]]::#@ROW` | every element is a `ROW` |
//!
//! ## Formats
//!
//! - JSON: [`Tytx::to_typed_json`] / [`Tytx::from_json`], including `XTYTX://` envelopes
//! - XML: [`Tytx::to_xml`] / [`Tytx::from_xml`]
//! - MessagePack: [`Tytx::to_msgpack`] / [`Tytx::from_msgpack`]

#![warn(missing_docs)]

mod error;
mod tytx;
mod types;

pub mod prelude;

// Re-export main entry points
pub use error::{Error, Result};
pub use tytx::{global, CodecOptions, Tytx, TytxBuilder};

// Re-export types
pub use types::*;
