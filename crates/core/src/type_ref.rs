//! Type references: the part after `::` in a typed string
//!
//! The same grammar names a field type inside a struct schema.
//!
//! | Text | Reference |
//! |------|-----------|
//! | `L` | built-in type (or alias) |
//! | `~MONEY` | custom class |
//! | `@ROW` | struct |
//! | `#L` | homogeneous array of a built-in type |
//! | `#@ROW` | array of structs |

use std::fmt;

/// Separator between a raw value and its type suffix
pub const SUFFIX_SEPARATOR: &str = "::";

/// Prefix of a custom-class code
pub const CUSTOM_PREFIX: char = '~';

/// Prefix of a struct code
pub const STRUCT_PREFIX: char = '@';

/// Prefix of a homogeneous-array code
pub const ARRAY_PREFIX: char = '#';

/// A parsed type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Built-in or registered type, by code or alias
    Scalar(String),
    /// Custom class (`~CODE`)
    Custom(String),
    /// Struct (`@CODE`)
    Struct(String),
    /// Homogeneous array of a scalar type (`#CODE`)
    TypedArray(String),
    /// Homogeneous array of structs (`#@CODE`)
    StructArray(String),
}

impl TypeRef {
    /// Parse a reference. Returns `None` for empty text or a bare prefix.
    pub fn parse(text: &str) -> Option<TypeRef> {
        let text = text.trim();
        let (ctor, rest): (fn(String) -> TypeRef, &str) =
            if let Some(rest) = text.strip_prefix("#@") {
                (TypeRef::StructArray, rest)
            } else if let Some(rest) = text.strip_prefix(ARRAY_PREFIX) {
                (TypeRef::TypedArray, rest)
            } else if let Some(rest) = text.strip_prefix(STRUCT_PREFIX) {
                (TypeRef::Struct, rest)
            } else if let Some(rest) = text.strip_prefix(CUSTOM_PREFIX) {
                (TypeRef::Custom, rest)
            } else {
                (TypeRef::Scalar, text)
            };
        if rest.is_empty() || rest.contains(SUFFIX_SEPARATOR) || rest.contains(char::is_whitespace) {
            return None;
        }
        Some(ctor(rest.to_string()))
    }

    /// The code or name without its prefix
    pub fn code(&self) -> &str {
        match self {
            TypeRef::Scalar(c)
            | TypeRef::Custom(c)
            | TypeRef::Struct(c)
            | TypeRef::TypedArray(c)
            | TypeRef::StructArray(c) => c,
        }
    }

    /// True for references that name a struct
    pub fn is_struct(&self) -> bool {
        matches!(self, TypeRef::Struct(_) | TypeRef::StructArray(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Scalar(c) => write!(f, "{}", c),
            TypeRef::Custom(c) => write!(f, "~{}", c),
            TypeRef::Struct(c) => write!(f, "@{}", c),
            TypeRef::TypedArray(c) => write!(f, "#{}", c),
            TypeRef::StructArray(c) => write!(f, "#@{}", c),
        }
    }
}

/// Split a typed string at its last `::`.
///
/// Returns `(raw, suffix)` or `None` when the text has no separator.
pub fn split_suffix(text: &str) -> Option<(&str, &str)> {
    let idx = text.rfind(SUFFIX_SEPARATOR)?;
    Some((&text[..idx], &text[idx + SUFFIX_SEPARATOR.len()..]))
}
