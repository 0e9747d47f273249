//! In-memory XML tree and its pretty serializer.
//!
//! The encoder builds an [`Element`] tree first and writes it in one pass
//! through an indenting `quick_xml::Writer`. The
//! output layout follows libxml's formatted save so documents stay byte-for-byte
//! compatible with the PHP producers and consumers of this format:
//!
//! - an element whose children are all elements puts each child on its own
//!   line, indented one level deeper;
//! - an element with any text or CDATA child is written on a single line;
//! - an element without children is self-closed.

use std::borrow::Cow;
use std::fmt;
use std::io;

use memchr::{memchr2, memchr3, memmem};
use quick_xml::escape::partial_escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;

use crate::error::{Result, XmlConvertError};

/// A node of the output tree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum XmlNode {
    Element(Element),
    Text(String),
    Cdata(String),
}

/// An element with its attributes and children in document order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl XmlNode {
    /// Text node for `text`, or a CDATA section when it holds markup characters.
    pub fn text(text: String) -> Self {
        if needs_cdata(text.as_bytes()) {
            XmlNode::Cdata(text)
        } else {
            XmlNode::Text(text)
        }
    }
}

/// Whether text contains any of `'"<>&`.
#[inline]
pub(crate) fn needs_cdata(bytes: &[u8]) -> bool {
    memchr3(b'<', b'>', b'&', bytes).is_some() || memchr2(b'\'', b'"', bytes).is_some()
}

/// Serialize a complete document rooted at `root`.
pub(crate) fn write_document(root: &Element, indent: usize) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::with_capacity(256), b' ', indent);
    write_root(&mut writer, root).map_err(write_failed)?;

    let mut buffer = writer.into_inner();
    buffer.push(b'\n');
    String::from_utf8(buffer).map_err(write_failed)
}

fn write_root(writer: &mut Writer<Vec<u8>>, root: &Element) -> io::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(writer, root)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> io::Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (name, value) in &element.attributes {
        // Pre-escaped: libxml writes `&#10;` for newlines and leaves `'` alone.
        start.push_attribute(Attribute {
            key: QName(name.as_bytes()),
            value: Cow::Owned(escape_attribute(value).into_bytes()),
        });
    }

    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start));
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            XmlNode::Element(el) => write_element(writer, el)?,
            XmlNode::Text(text) => {
                writer.write_event(Event::Text(BytesText::from_escaped(escape_text(text))))?;
            }
            XmlNode::Cdata(text) => write_cdata(writer, text)?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))
}

/// Write a CDATA section, splitting it wherever the body contains `]]>`.
fn write_cdata(writer: &mut Writer<Vec<u8>>, text: &str) -> io::Result<()> {
    let mut start = 0;
    for pos in memmem::find_iter(text.as_bytes(), b"]]>") {
        // Close after "]]" and reopen before ">".
        writer.write_event(Event::CData(BytesCData::new(&text[start..pos + 2])))?;
        start = pos + 2;
    }
    writer.write_event(Event::CData(BytesCData::new(&text[start..])))
}

fn escape_text(text: &str) -> String {
    partial_escape(text).replace('\r', "&#13;")
}

fn escape_attribute(text: &str) -> String {
    let escaped = partial_escape(text);
    let mut out = String::with_capacity(escaped.len());
    for c in escaped.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
    out
}

#[cold]
fn write_failed(e: impl fmt::Display) -> XmlConvertError {
    XmlConvertError::invalid_xml("XML can not be written").with_detail(e.to_string())
}
