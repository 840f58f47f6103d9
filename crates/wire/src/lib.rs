//! Wire adapters for TYTX
//!
//! Carries typed values through formats that only know strings and a few
//! native scalars.
//!
//! | Format | Typed leaves | Payload marker |
//! |--------|--------------|----------------|
//! | JSON | `"100.50::N"` strings | `::TYTX`, `::JS` or `TYTX://` when any leaf is typed |
//! | XML | attribute values and text, always suffixed | none |
//! | MessagePack | extension type 42 holding TYTX JSON text | the extension itself |
//!
//! `XTYTX://` envelopes bundle struct declarations with their data and are
//! handled by [`process_envelope`] / [`decode_message`].
//!
//! ## Examples
//!
//! ```
//! use tytx_codec::Codec;
//! use tytx_core::{TypeRegistry, Value};
//! use tytx_wire::{from_json, to_typed_json, PayloadMarker};
//!
//! let registry = TypeRegistry::new();
//! let codec = Codec::new(&registry);
//!
//! let value = Value::Array(vec![Value::Int(1), Value::Decimal(1.into())]);
//! let text = to_typed_json(&codec, &value, PayloadMarker::Tytx).unwrap();
//! assert_eq!(text, r#"[1,"1::N"]::TYTX"#);
//! assert_eq!(from_json(&codec, &text).unwrap(), value);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod envelope;
pub mod error;
pub mod json;
pub mod markers;
pub mod msgpack;
pub mod xml;

pub use envelope::{
    decode_message, encode_envelope, process_envelope, Declarations, Envelope, EnvelopeOutcome,
    Registered,
};
pub use error::{Result, WireError};
pub use json::{from_json, hydrate_json, parse_typed_json, to_json, to_typed_json};
pub use markers::{detect, Payload, PayloadMarker};
pub use msgpack::{from_msgpack, to_msgpack, TYTX_EXT_TYPE};
pub use xml::{from_xml, to_xml, to_xml_value, XmlChild, XmlContent, XmlDocument, XmlNode};
