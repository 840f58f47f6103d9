//! Type definitions and the built-in type set

mod builtins;
mod definition;

pub use builtins::{builtin_types, codes, format_date, format_datetime, format_float, format_time};
pub use definition::{Align, NativeTag, ParseFn, SerializeFn, TypeDefinition};
