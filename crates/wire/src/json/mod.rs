//! JSON adapter
//!
//! Native JSON values (null, bool, int, float, string) travel as themselves.
//! Every other leaf becomes a typed string, and the payload gets a marker when
//! at least one such leaf was written. Decoding offers every string leaf to
//! the codec.
//!
//! ```text
//! {"price": Decimal(100.50), "qty": 2}  ->  {"price":"100.50::N","qty":2}::TYTX
//! ```

mod decode;
mod encode;

pub use decode::{from_json, hydrate_json, parse_typed_json};
pub use encode::{encode_string, to_json, to_typed_json, write_typed_json};
