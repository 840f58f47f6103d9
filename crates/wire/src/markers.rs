//! Payload markers
//!
//! A whole payload can announce that it carries typed strings, either with a
//! trailing `::TYTX` (or `::JS`) or with a leading protocol prefix. `XTYTX://`
//! marks an extended envelope. Prefixes let a reader pick the decoder before
//! the rest of the payload arrives.

use serde::{Deserialize, Serialize};

/// Prefix of a typed payload
pub const TYTX_PROTOCOL: &str = "TYTX://";

/// Prefix of an extended envelope
pub const XTYTX_PROTOCOL: &str = "XTYTX://";

/// Trailing marker of a typed payload
pub const TYTX_SUFFIX: &str = "::TYTX";

/// Trailing marker of an embedded-JSON payload
pub const JS_SUFFIX: &str = "::JS";

/// How an encoder flags a payload that contains typed strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadMarker {
    /// No marker
    None,
    /// Trailing `::JS`
    Js,
    /// Trailing `::TYTX`
    #[default]
    Tytx,
    /// Leading `TYTX://`
    Protocol,
}

impl PayloadMarker {
    /// Wrap an encoded body with this marker
    pub fn apply(self, body: String) -> String {
        match self {
            PayloadMarker::None => body,
            PayloadMarker::Js => body + JS_SUFFIX,
            PayloadMarker::Tytx => body + TYTX_SUFFIX,
            PayloadMarker::Protocol => format!("{}{}", TYTX_PROTOCOL, body),
        }
    }
}

/// A payload classified by its marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    /// `XTYTX://` envelope; holds the JSON after the prefix
    Envelope(&'a str),
    /// Marked typed payload; holds the body without its marker
    Typed(&'a str),
    /// No marker
    Plain(&'a str),
}

impl<'a> Payload<'a> {
    /// Body text without any marker
    pub fn body(&self) -> &'a str {
        match self {
            Payload::Envelope(body) | Payload::Typed(body) | Payload::Plain(body) => body,
        }
    }
}

/// Classify a payload by its prefix or trailing marker.
pub fn detect(text: &str) -> Payload<'_> {
    let text = text.trim();
    if let Some(body) = text.strip_prefix(XTYTX_PROTOCOL) {
        return Payload::Envelope(body);
    }
    if let Some(body) = text.strip_prefix(TYTX_PROTOCOL) {
        return Payload::Typed(strip_suffix_marker(body).unwrap_or(body));
    }
    match strip_suffix_marker(text) {
        Some(body) => Payload::Typed(body),
        None => Payload::Plain(text),
    }
}

fn strip_suffix_marker(text: &str) -> Option<&str> {
    text.strip_suffix(TYTX_SUFFIX)
        .or_else(|| text.strip_suffix(JS_SUFFIX))
}
