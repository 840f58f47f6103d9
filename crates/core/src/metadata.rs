//! Field metadata parser
//!
//! Struct field types may carry bracketed facets:
//!
//! ```text
//! N[min:0, max:1000, label:'Unit price']
//! T[enum:draft|sent|paid, required]
//! T[pattern:"^[A-Z]{2}[0-9]+$", placeholder:'IT123']
//! ```
//!
//! `facet := key ':' value | key`. A bare key is the flag `true`.
//! Values are quoted strings (`'..'` or `".."`, backslash escapes), numbers,
//! `true`/`false`, `a|b|c` enumerations, or bare tokens.
//!
//! Facets are sorted into validation and UI groups. Nothing here enforces
//! them; they are carried for external validators and renderers.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A facet value
pub type MetaValue = serde_json::Value;

/// Facets recognized as validation metadata
pub const VALIDATION_KEYS: &[&str] = &[
    "min",
    "max",
    "length",
    "min_length",
    "max_length",
    "pattern",
    "enum",
    "required",
    "default",
];

/// Facets recognized as UI metadata
pub const UI_KEYS: &[&str] = &[
    "label",
    "placeholder",
    "hint",
    "readonly",
    "hidden",
    "width",
    "format",
    "align",
];

/// Parsed validation and UI facets of one field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Validation facets, in declaration order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub validate: IndexMap<String, MetaValue>,
    /// UI facets, in declaration order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub ui: IndexMap<String, MetaValue>,
}

impl FieldMetadata {
    /// True when no facet is present
    pub fn is_empty(&self) -> bool {
        self.validate.is_empty() && self.ui.is_empty()
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: FieldMetadata) {
        self.validate.extend(other.validate);
        self.ui.extend(other.ui);
    }

    fn insert(&mut self, key: &str, value: MetaValue, input: &str) -> Result<()> {
        let group = if VALIDATION_KEYS.contains(&key) {
            &mut self.validate
        } else if UI_KEYS.contains(&key) {
            &mut self.ui
        } else {
            return Err(invalid(input, format!("unknown facet '{}'", key)));
        };
        if group.insert(key.to_string(), value).is_some() {
            return Err(invalid(input, format!("duplicate facet '{}'", key)));
        }
        Ok(())
    }
}

/// Split `CODE[facets]` into the type text and the facet body.
pub fn split_type_spec(spec: &str) -> Result<(&str, Option<&str>)> {
    let spec = spec.trim();
    match spec.find('[') {
        None => Ok((spec, None)),
        Some(open) => {
            let body = spec[open + 1..]
                .strip_suffix(']')
                .ok_or_else(|| invalid(spec, "missing closing ']'"))?;
            Ok((spec[..open].trim(), Some(body)))
        }
    }
}

/// Parse the body of a bracketed facet list (without the brackets).
pub fn parse_metadata(body: &str) -> Result<FieldMetadata> {
    let mut meta = FieldMetadata::default();
    for facet in split_top_level(body, ',').map_err(|reason| invalid(body, reason))? {
        let facet = facet.trim();
        if facet.is_empty() {
            continue;
        }
        let (key, value) = match find_unquoted(facet, ':') {
            Some(idx) => (facet[..idx].trim(), Some(facet[idx + 1..].trim())),
            None => (facet, None),
        };
        if !is_identifier(key) {
            return Err(invalid(body, format!("bad facet key '{}'", key)));
        }
        let value = match value {
            None => MetaValue::Bool(true),
            Some("") => return Err(invalid(body, format!("facet '{}' has no value", key))),
            Some(text) => parse_value(text).map_err(|reason| invalid(body, reason))?,
        };
        meta.insert(key, value, body)?;
    }
    Ok(meta)
}

/// Parse `CODE[facets]` into the type text and its metadata.
pub fn parse_type_spec(spec: &str) -> Result<(&str, FieldMetadata)> {
    let (code, body) = split_type_spec(spec)?;
    let meta = match body {
        Some(body) => parse_metadata(body)?,
        None => FieldMetadata::default(),
    };
    Ok((code, meta))
}

/// Render metadata back into bracket grammar, e.g. `[min:0, label:'Price']`.
///
/// Returns an empty string for empty metadata.
pub fn format_metadata(meta: &FieldMetadata) -> String {
    if meta.is_empty() {
        return String::new();
    }
    let facets: Vec<String> = meta
        .validate
        .iter()
        .chain(meta.ui.iter())
        .map(|(k, v)| match v {
            MetaValue::Bool(true) => k.clone(),
            other => format!("{}:{}", k, format_value(other)),
        })
        .collect();
    format!("[{}]", facets.join(", "))
}

fn parse_value(text: &str) -> std::result::Result<MetaValue, String> {
    let first = text.chars().next().unwrap_or_default();
    if first == '\'' || first == '"' {
        return parse_quoted(text, first).map(MetaValue::String);
    }
    match text {
        "true" => return Ok(MetaValue::Bool(true)),
        "false" => return Ok(MetaValue::Bool(false)),
        _ => {}
    }
    if text.contains('|') {
        let items = text
            .split('|')
            .map(|item| {
                let item = item.trim();
                match item.chars().next() {
                    Some(q @ ('\'' | '"')) => parse_quoted(item, q).map(MetaValue::String),
                    _ => Ok(MetaValue::String(item.to_string())),
                }
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        return Ok(MetaValue::Array(items));
    }
    if let Ok(i) = text.parse::<i64>() {
        return Ok(MetaValue::from(i));
    }
    if let Ok(f) = text.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Ok(MetaValue::Number(n));
        }
    }
    Ok(MetaValue::String(text.to_string()))
}

fn parse_quoted(text: &str, quote: char) -> std::result::Result<String, String> {
    let mut out = String::new();
    let mut chars = text.chars().skip(1);
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => out.push(escaped),
                None => return Err("dangling escape".to_string()),
            },
            c if c == quote => {
                return if chars.next().is_none() {
                    Ok(out)
                } else {
                    Err(format!("trailing text after quoted value {}", text))
                };
            }
            c => out.push(c),
        }
    }
    Err(format!("unterminated quote in {}", text))
}

fn format_value(value: &MetaValue) -> String {
    match value {
        MetaValue::String(s) => quote_if_needed(s),
        MetaValue::Array(items) => items
            .iter()
            .map(|item| match item {
                MetaValue::String(s) => quote_if_needed(s),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("|"),
        other => other.to_string(),
    }
}

fn quote_if_needed(s: &str) -> String {
    let plain = !s.is_empty()
        && s.chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '/'))
        && s.parse::<f64>().is_err()
        && s != "true"
        && s != "false";
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn invalid(input: &str, reason: impl Into<String>) -> Error {
    Error::InvalidMetadata {
        input: input.to_string(),
        reason: reason.into(),
    }
}

/// Find the first `needle` outside quotes and brackets.
fn find_unquoted(text: &str, needle: char) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (idx, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (Some(_), '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (None, '\'' | '"') => quote = Some(c),
            (None, c) if c == needle => return Some(idx),
            _ => {}
        }
    }
    None
}

/// Split on `sep` at bracket depth zero, outside quotes.
pub(crate) fn split_top_level(text: &str, sep: char) -> std::result::Result<Vec<&str>, String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (Some(_), '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| format!("unbalanced ']' in {}", text))?;
            }
            (None, c) if c == sep && depth == 0 => {
                parts.push(&text[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    if quote.is_some() {
        return Err(format!("unterminated quote in {}", text));
    }
    if depth != 0 {
        return Err(format!("unbalanced '[' in {}", text));
    }
    parts.push(&text[start..]);
    Ok(parts)
}
