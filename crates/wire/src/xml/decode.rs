//! XML decoding

use super::node::{XmlChild, XmlContent, XmlDocument, XmlNode};
use crate::error::Result;
use indexmap::IndexMap;
use tytx_codec::Codec;

/// Parse XML text into a document with one top-level entry.
///
/// Attribute values and text content are hydrated through the codec. Text of
/// an element without child elements is kept verbatim; `<a></a>` is an empty
/// string and `<a/>` is null. Beside child elements, text is trimmed and
/// whitespace-only text is ignored. Names are read without namespace prefixes.
pub fn from_xml(codec: &Codec<'_>, text: &str) -> Result<XmlDocument> {
    let document = roxmltree::Document::parse(text)?;
    let root = document.root_element();
    let mut doc = XmlDocument::new();
    doc.insert(
        root.tag_name().name().to_string(),
        XmlChild::One(read_element(codec, root)?),
    );
    Ok(doc)
}

fn read_element(codec: &Codec<'_>, element: roxmltree::Node<'_, '_>) -> Result<XmlNode> {
    let mut attrs = IndexMap::new();
    for attr in element.attributes() {
        attrs.insert(attr.name().to_string(), codec.decode(attr.value())?);
    }

    let mut text = String::new();
    let mut has_text = false;
    let mut children: IndexMap<String, XmlChild> = IndexMap::new();
    for child in element.children() {
        if child.is_element() {
            let node = read_element(codec, child)?;
            let tag = child.tag_name().name();
            match children.get_mut(tag) {
                Some(existing) => existing.push(node),
                None => {
                    children.insert(tag.to_string(), XmlChild::One(node));
                }
            }
        } else if child.is_text() {
            has_text = true;
            text.push_str(child.text().unwrap_or_default());
        }
    }

    let value = if children.is_empty() {
        if has_text || !is_self_closing(element) {
            XmlContent::Scalar(codec.decode(&text)?)
        } else {
            XmlContent::Null
        }
    } else {
        match text.trim() {
            "" => XmlContent::Children(children),
            trimmed => XmlContent::Mixed {
                text: codec.decode(trimmed)?,
                children,
            },
        }
    };
    Ok(XmlNode { attrs, value })
}

fn is_self_closing(element: roxmltree::Node<'_, '_>) -> bool {
    element
        .document()
        .input_text()
        .get(element.range())
        .map_or(true, |source| source.ends_with("/>"))
}
