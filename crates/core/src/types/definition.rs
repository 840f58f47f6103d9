//! Type definitions
//!
//! A `TypeDefinition` binds a code (and its aliases) to a native-type tag and
//! a pair of conversion functions. Built-in types and caller-supplied custom
//! classes share this shape; custom classes match on a `Tagged` value's tag.

use crate::error::Result;
use crate::type_ref::TypeRef;
use crate::value::{Value, ValueKind};
use std::fmt;
use std::sync::Arc;

/// Parses the raw text of a typed string into a native value
pub type ParseFn = Arc<dyn Fn(&str) -> Result<Value> + Send + Sync>;

/// Serializes a native value into the raw text of a typed string
pub type SerializeFn = Arc<dyn Fn(&Value) -> Result<String> + Send + Sync>;

/// Which native values a definition claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeTag {
    /// Values of any of these kinds
    Kinds(Vec<ValueKind>),
    /// `Value::Tagged` instances whose tag equals this string
    Class(String),
}

impl NativeTag {
    /// Tag for a single value kind
    pub fn kind(kind: ValueKind) -> Self {
        NativeTag::Kinds(vec![kind])
    }

    /// Check whether a value carries this native tag
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (NativeTag::Class(tag), Value::Tagged(t)) => *tag == t.tag,
            (NativeTag::Class(_), _) => false,
            (NativeTag::Kinds(kinds), v) => kinds.contains(&v.kind()),
        }
    }
}

/// Display alignment hint for tabular renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Left aligned (text)
    #[default]
    Left,
    /// Right aligned (numbers)
    Right,
    /// Centered (flags, dates)
    Center,
}

/// A registered type.
#[derive(Clone)]
pub struct TypeDefinition {
    /// Canonical code, unique within a registry
    pub code: String,
    /// Alternative codes accepted on decode
    pub aliases: Vec<String>,
    /// Human-readable name
    pub name: String,
    /// Native values this type claims when encoding
    pub native: NativeTag,
    /// True if JSON can carry the value without a suffix
    pub json_native: bool,
    /// Display alignment
    pub align: Align,
    /// Display text for an empty value
    pub empty: String,
    custom: bool,
    parse: ParseFn,
    serialize: SerializeFn,
}

impl TypeDefinition {
    /// Create a definition with default display metadata.
    pub fn new<P, S>(code: impl Into<String>, native: NativeTag, parse: P, serialize: S) -> Self
    where
        P: Fn(&str) -> Result<Value> + Send + Sync + 'static,
        S: Fn(&Value) -> Result<String> + Send + Sync + 'static,
    {
        let code = code.into();
        Self {
            name: code.clone(),
            code,
            aliases: Vec::new(),
            native,
            json_native: false,
            align: Align::Left,
            empty: String::new(),
            custom: false,
            parse: Arc::new(parse),
            serialize: Arc::new(serialize),
        }
    }

    /// Set the human-readable name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add aliases
    pub fn with_aliases<I, A>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Mark the type as representable in JSON without a suffix
    pub fn json_native(mut self, json_native: bool) -> Self {
        self.json_native = json_native;
        self
    }

    /// Set display alignment and empty-value text
    pub fn with_display(mut self, align: Align, empty: impl Into<String>) -> Self {
        self.align = align;
        self.empty = empty.into();
        self
    }

    /// Parse raw text into a value
    pub fn parse(&self, raw: &str) -> Result<Value> {
        (self.parse)(raw)
    }

    /// Serialize a value into raw text (no suffix)
    pub fn serialize(&self, value: &Value) -> Result<String> {
        (self.serialize)(value)
    }

    /// Check whether this definition claims a value
    pub fn matches(&self, value: &Value) -> bool {
        self.native.matches(value)
    }

    /// Mark as a custom class, referenced as `~CODE`
    pub(crate) fn into_custom(mut self) -> Self {
        self.custom = true;
        self
    }

    /// True for custom classes registered with `register_class`
    pub fn is_custom(&self) -> bool {
        self.custom
    }

    /// Reference used in the suffix when encoding with this definition
    pub fn type_ref(&self) -> TypeRef {
        if self.custom {
            TypeRef::Custom(self.code.clone())
        } else {
            TypeRef::Scalar(self.code.clone())
        }
    }
}

impl fmt::Debug for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDefinition")
            .field("code", &self.code)
            .field("aliases", &self.aliases)
            .field("native", &self.native)
            .field("json_native", &self.json_native)
            .field("custom", &self.custom)
            .finish_non_exhaustive()
    }
}
