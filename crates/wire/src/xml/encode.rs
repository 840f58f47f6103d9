//! XML encoding

use super::node::{document_from_value, XmlChild, XmlContent, XmlDocument, XmlNode};
use crate::error::{Result, WireError};
use tytx_codec::Codec;
use tytx_core::Value;

/// Write a document as XML text.
///
/// Without `root_tag` the document must hold exactly one element. With it,
/// all top-level entries are wrapped in `<root_tag>`.
pub fn to_xml(codec: &Codec<'_>, doc: &XmlDocument, root_tag: Option<&str>) -> Result<String> {
    let mut out = String::new();
    match root_tag {
        Some(root) => {
            check_tag(root)?;
            out.push('<');
            out.push_str(root);
            if doc.is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                write_children(codec, doc, &mut out)?;
                out.push_str("</");
                out.push_str(root);
                out.push('>');
            }
        }
        None => {
            let count: usize = doc.values().map(|child| child.nodes().len()).sum();
            if count != 1 {
                return Err(WireError::MultipleRoots { count });
            }
            write_children(codec, doc, &mut out)?;
        }
    }
    Ok(out)
}

/// Write a document given in generic form: tag to `{attrs, value}` node(s).
pub fn to_xml_value(codec: &Codec<'_>, doc: &Value, root_tag: Option<&str>) -> Result<String> {
    to_xml(codec, &document_from_value(doc)?, root_tag)
}

fn write_children(
    codec: &Codec<'_>,
    children: &indexmap::IndexMap<String, XmlChild>,
    out: &mut String,
) -> Result<()> {
    for (tag, child) in children {
        for node in child.nodes() {
            write_node(codec, tag, node, out)?;
        }
    }
    Ok(())
}

fn write_node(codec: &Codec<'_>, tag: &str, node: &XmlNode, out: &mut String) -> Result<()> {
    check_tag(tag)?;
    out.push('<');
    out.push_str(tag);
    for (name, value) in &node.attrs {
        check_tag(name)?;
        let text = leaf_text(codec, value)
            .map_err(|e| wrap_content_error(e, &format!("attribute '{}' of <{}>", name, tag)))?;
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape(&text));
        out.push('"');
    }

    match &node.value {
        XmlContent::Null => {
            out.push_str("/>");
            return Ok(());
        }
        XmlContent::Scalar(value) => {
            out.push('>');
            let text = leaf_text(codec, value)
                .map_err(|e| wrap_content_error(e, &format!("<{}>", tag)))?;
            out.push_str(&escape(&text));
        }
        XmlContent::Children(children) => {
            out.push('>');
            write_children(codec, children, out)?;
        }
        XmlContent::Mixed { text, children } => {
            out.push('>');
            let text = leaf_text(codec, text)
                .map_err(|e| wrap_content_error(e, &format!("<{}>", tag)))?;
            out.push_str(&escape(&text));
            write_children(codec, children, out)?;
        }
    }

    out.push_str("</");
    out.push_str(tag);
    out.push('>');
    Ok(())
}

/// Text of an attribute value or text node; everything but strings is suffixed.
fn leaf_text(codec: &Codec<'_>, value: &Value) -> Result<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(WireError::InvalidXmlContent(format!(
            "{} cannot be written as text",
            value.type_name()
        ))),
        leaf => Ok(codec.encode(leaf, true)?),
    }
}

fn wrap_content_error(e: WireError, context: &str) -> WireError {
    match e {
        WireError::InvalidXmlContent(msg) => {
            WireError::InvalidXmlContent(format!("{}: {}", context, msg))
        }
        other => other,
    }
}

/// Names are written without namespaces, so `:` is rejected.
fn check_tag(tag: &str) -> Result<()> {
    let valid = tag
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && tag
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(WireError::InvalidXmlContent(format!("'{}' is not a valid XML name", tag)))
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
