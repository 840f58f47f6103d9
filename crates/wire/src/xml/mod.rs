//! XML adapter
//!
//! Every element is an `{attrs, value}` node. Attribute values and text
//! content are typed strings (`<order id="42::L">`), since XML has no native
//! types. Repeated sibling tags collapse into a sequence; text mixed with
//! child elements is kept under the reserved `#text` key.
//!
//! ```text
//! <order id="42::L"><total>199.99::N</total></order>
//!
//! order: { attrs: {id: 42}, value: { total: { attrs: {}, value: 199.99 } } }
//! ```

mod decode;
mod encode;
mod node;

pub use decode::from_xml;
pub use encode::{to_xml, to_xml_value};
pub use node::{XmlChild, XmlContent, XmlDocument, XmlNode, TEXT_KEY};
