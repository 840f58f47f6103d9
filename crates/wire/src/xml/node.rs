//! XML node model

use crate::error::{Result, WireError};
use indexmap::IndexMap;
use tytx_core::{Value, ValueMap};

/// Reserved key for the text part of mixed content
pub const TEXT_KEY: &str = "#text";

/// Top-level entries of a document: tag to node(s)
pub type XmlDocument = IndexMap<String, XmlChild>;

/// One element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlNode {
    /// Hydrated attribute values
    pub attrs: IndexMap<String, Value>,
    /// Element content
    pub value: XmlContent,
}

/// Element content.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum XmlContent {
    /// Empty element, written self-closing
    #[default]
    Null,
    /// Text content
    Scalar(Value),
    /// Child elements by tag
    Children(IndexMap<String, XmlChild>),
    /// Text and child elements
    Mixed {
        /// Text part
        text: Value,
        /// Child elements by tag
        children: IndexMap<String, XmlChild>,
    },
}

/// One tag's worth of siblings.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlChild {
    /// Single element
    One(XmlNode),
    /// Repeated elements in document order
    Many(Vec<XmlNode>),
}

impl XmlNode {
    /// Node with no attributes
    pub fn new(value: XmlContent) -> Self {
        Self {
            attrs: IndexMap::new(),
            value,
        }
    }

    /// Node holding a single scalar
    pub fn scalar(value: impl Into<Value>) -> Self {
        Self::new(XmlContent::Scalar(value.into()))
    }

    /// Add an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Read a node from its generic `{attrs, value}` form.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            WireError::InvalidXmlContent(format!("expected {{attrs, value}}, got {}", value.type_name()))
        })?;
        if map.keys().any(|k| k != "attrs" && k != "value") || !map.contains_key("value") {
            return Err(WireError::InvalidXmlContent(format!(
                "node keys must be 'attrs' and 'value', got {:?}",
                map.keys().collect::<Vec<_>>()
            )));
        }

        let attrs = match map.get("attrs") {
            None | Some(Value::Null) => IndexMap::new(),
            Some(Value::Object(attrs)) => attrs.clone(),
            Some(other) => {
                return Err(WireError::InvalidXmlContent(format!(
                    "attrs must be a map, got {}",
                    other.type_name()
                )))
            }
        };

        let content = match map.get("value") {
            None | Some(Value::Null) => XmlContent::Null,
            Some(Value::Object(children)) => {
                let text = children.get(TEXT_KEY).cloned();
                let children = children_from_map(children)?;
                match text {
                    Some(text) => XmlContent::Mixed { text, children },
                    None => XmlContent::Children(children),
                }
            }
            Some(Value::Array(_)) => {
                return Err(WireError::InvalidXmlContent(
                    "a node value cannot be a bare sequence".to_string(),
                ))
            }
            Some(scalar) => XmlContent::Scalar(scalar.clone()),
        };

        Ok(Self {
            attrs,
            value: content,
        })
    }

    /// Generic `{attrs, value}` form
    pub fn to_value(&self) -> Value {
        let mut map = ValueMap::with_capacity(2);
        map.insert("attrs".to_string(), Value::Object(self.attrs.clone()));
        let value = match &self.value {
            XmlContent::Null => Value::Null,
            XmlContent::Scalar(v) => v.clone(),
            XmlContent::Children(children) => Value::Object(children_to_map(children)),
            XmlContent::Mixed { text, children } => {
                let mut out = ValueMap::with_capacity(children.len() + 1);
                out.insert(TEXT_KEY.to_string(), text.clone());
                out.extend(children_to_map(children));
                Value::Object(out)
            }
        };
        map.insert("value".to_string(), value);
        Value::Object(map)
    }
}

impl XmlChild {
    /// Nodes in document order
    pub fn nodes(&self) -> &[XmlNode] {
        match self {
            XmlChild::One(node) => std::slice::from_ref(node),
            XmlChild::Many(nodes) => nodes,
        }
    }

    /// Add a sibling, turning a single node into a sequence
    pub fn push(&mut self, node: XmlNode) {
        match self {
            XmlChild::One(first) => {
                let first = std::mem::take(first);
                *self = XmlChild::Many(vec![first, node]);
            }
            XmlChild::Many(nodes) => nodes.push(node),
        }
    }

    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(XmlNode::from_value)
                .collect::<Result<Vec<_>>>()
                .map(XmlChild::Many),
            other => XmlNode::from_value(other).map(XmlChild::One),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            XmlChild::One(node) => node.to_value(),
            XmlChild::Many(nodes) => Value::Array(nodes.iter().map(XmlNode::to_value).collect()),
        }
    }
}

/// Read a document from its generic form: tag to node or sequence of nodes.
pub(crate) fn document_from_value(value: &Value) -> Result<XmlDocument> {
    match value {
        Value::Object(map) => children_from_map(map),
        other => Err(WireError::InvalidXmlContent(format!(
            "a document must map tags to nodes, got {}",
            other.type_name()
        ))),
    }
}

fn children_from_map(map: &ValueMap) -> Result<IndexMap<String, XmlChild>> {
    map.iter()
        .filter(|(tag, _)| tag.as_str() != TEXT_KEY)
        .map(|(tag, child)| {
            XmlChild::from_value(child)
                .map(|child| (tag.clone(), child))
                .map_err(|e| match e {
                    WireError::InvalidXmlContent(msg) => {
                        WireError::InvalidXmlContent(format!("<{}>: {}", tag, msg))
                    }
                    other => other,
                })
        })
        .collect()
}

fn children_to_map(children: &IndexMap<String, XmlChild>) -> ValueMap {
    children
        .iter()
        .map(|(tag, child)| (tag.clone(), child.to_value()))
        .collect()
}
