//! Text codec for TYTX
//!
//! Turns typed strings (`"100.50::N"`, `"[1,2,3]::#L"`, `'{"x": "1"}::@POINT'`)
//! into native values and back, against a [`TypeRegistry`](tytx_core::TypeRegistry).
//!
//! - [`Codec`] - decode / encode single strings
//! - [`Decoded`] - resolved value or pass-through, for callers that care which
//! - [`LookupContext`] - envelope-local structs layered over a registry
//!
//! ## Example
//!
//! ```
//! use tytx_codec::Codec;
//! use tytx_core::{TypeRegistry, Value};
//!
//! let registry = TypeRegistry::new();
//! let codec = Codec::new(&registry);
//!
//! assert_eq!(codec.decode("42::L").unwrap(), Value::Int(42));
//! assert_eq!(codec.encode_typed(&Value::Int(42)).unwrap(), "42::L");
//! assert_eq!(codec.decode("x::NOPE").unwrap(), Value::String("x::NOPE".into()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod array;
pub mod codec;
pub mod context;
pub mod resolver;

pub use codec::{Codec, Decoded};
pub use context::LookupContext;
pub use resolver::MAX_RESOLVE_DEPTH;
