//! XML to node map decoder.
//!
//! Decoding happens in two passes. The first walks the parsed document and
//! records, per element, its text as `@value`, its attributes as `@attributes`
//! and every child element inside a sequence keyed by tag name. The second
//! pass shapes that raw tree for callers:
//!
//! 1. sequences holding a single element collapse to that element;
//! 2. with [`AttributeMode::Ignore`], `@attributes` is dropped and a map whose
//!    only entry is `@value` becomes that value.
//!
//! The order matters: whether a key holds a list or a single value depends on
//! how many siblings share the tag in that particular document.
//!
//! Adjacent text and CDATA sections inside one element are merged by the
//! parser, so `<a>foo <![CDATA[bar]]></a>` reads as `"foo bar"` rather than
//! keeping only the last section.
//!
//! # Tracing Support
//!
//! Enable the `tracing` feature to log parse failures with the parser's own
//! diagnostic before it is wrapped into [`XmlConvertError`].

use indexmap::IndexMap;
use roxmltree::{Document, Node, NodeType, ParsingOptions};

#[cfg(feature = "tracing")]
use tracing::{debug, instrument, trace, warn};

use crate::error::{Result, XmlConvertError};
use crate::types::{AttributeMode, NodeMap, XmlValue, ATTRIBUTES_KEY, ROOT_NODE_KEY, VALUE_KEY};

/// Maximum element nesting depth.
const MAX_DEPTH: usize = 512;

/// Characters stripped from text content, matching PHP's `trim`.
const TRIM_CHARS: [char; 6] = [' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Decoder configuration options.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Whether attributes are kept in the result.
    pub attributes: AttributeMode,
    /// Maximum element nesting depth.
    pub max_depth: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            attributes: AttributeMode::Ignore,
            max_depth: MAX_DEPTH,
        }
    }
}

impl DecoderConfig {
    /// Configuration keeping attributes.
    pub fn include_attributes() -> Self {
        Self {
            attributes: AttributeMode::Include,
            ..Self::default()
        }
    }
}

/// Converts XML documents into node maps.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

/// One entry of an element before shaping.
#[derive(Debug)]
enum RawEntry {
    Text(XmlValue),
    Elements(Vec<RawElement>),
    Attributes(NodeMap),
}

type RawElement = IndexMap<String, RawEntry>;

impl Decoder {
    /// Create a decoder with default configuration.
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    /// Create a decoder with custom configuration.
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Decode an XML document.
    ///
    /// The returned map always contains `@rootNode` with the root tag name.
    #[cfg_attr(feature = "tracing", instrument(skip(self, xml), fields(xml_len = xml.len())))]
    pub fn decode(&self, xml: &str) -> Result<NodeMap> {
        // Checked up front so an empty document never reaches the parser.
        if xml.is_empty() {
            return Err(XmlConvertError::invalid_xml(
                "XML can not be converted: empty string given",
            ));
        }

        let mut options = ParsingOptions::default();
        options.allow_dtd = true;

        let document = Document::parse_with_options(xml, options).map_err(|e| {
            #[cfg(feature = "tracing")]
            warn!(error = %e, "XML parse failed");
            XmlConvertError::invalid_xml("XML can not be converted: invalid or contains invalid tag")
                .with_detail(e.to_string())
        })?;

        let root = document.root_element();
        let raw = self.read_element(root, 0)?;

        let mut map = match shape(raw, self.config.attributes) {
            XmlValue::Map(map) => map,
            _ => NodeMap::new(),
        };
        let root_name = qualified_name(root);

        #[cfg(feature = "tracing")]
        debug!(root = %root_name, entries = map.len(), "Decoded XML document");

        map.insert(ROOT_NODE_KEY.to_owned(), XmlValue::String(root_name));
        Ok(map)
    }

    /// Decode an XML document given as bytes, which must be UTF-8.
    pub fn decode_bytes(&self, xml: &[u8]) -> Result<NodeMap> {
        let xml = std::str::from_utf8(xml).map_err(|e| {
            XmlConvertError::invalid_xml("XML can not be converted: invalid UTF-8")
                .with_detail(e.to_string())
        })?;
        self.decode(xml)
    }

    fn read_element(&self, node: Node<'_, '_>, depth: usize) -> Result<RawElement> {
        if depth > self.config.max_depth {
            #[cfg(feature = "tracing")]
            warn!(depth, max_depth = self.config.max_depth, "Max depth exceeded");
            return Err(XmlConvertError::invalid_xml(format!(
                "XML can not be converted: maximum nesting depth ({}) exceeded",
                self.config.max_depth
            )));
        }

        let mut raw = RawElement::new();
        let mut has_children = false;

        for child in node.children() {
            has_children = true;
            match child.node_type() {
                NodeType::Text => {
                    let text = child.text().unwrap_or_default().trim_matches(TRIM_CHARS);
                    if !text.is_empty() {
                        raw.insert(VALUE_KEY.to_owned(), RawEntry::Text(XmlValue::from_text(text)));
                    }
                }
                NodeType::Element => {
                    let element = self.read_element(child, depth + 1)?;
                    let entry = raw
                        .entry(qualified_name(child))
                        .or_insert_with(|| RawEntry::Elements(Vec::new()));
                    if let RawEntry::Elements(siblings) = entry {
                        siblings.push(element);
                    }
                }
                _ => {}
            }
        }

        // Self-closing or `<a></a>`: keep the element as empty text.
        if !has_children {
            raw.insert(VALUE_KEY.to_owned(), RawEntry::Text(XmlValue::String(String::new())));
        }

        let attributes: NodeMap = node
            .attributes()
            .map(|attr| {
                let name = match attr.namespace().and_then(|uri| node.lookup_prefix(uri)) {
                    Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, attr.name()),
                    _ => attr.name().to_owned(),
                };
                (name, XmlValue::from_text(attr.value()))
            })
            .collect();
        if !attributes.is_empty() {
            raw.insert(ATTRIBUTES_KEY.to_owned(), RawEntry::Attributes(attributes));
        }

        #[cfg(feature = "tracing")]
        trace!(tag = node.tag_name().name(), entries = raw.len(), depth, "Read element");

        Ok(raw)
    }
}

/// Decode an XML document, ignoring attributes.
///
/// # Example
///
/// ```rust
/// use xml_array_core::{xml_to_array, XmlValue};
///
/// let map = xml_to_array("<Message><customers/><active>TRUE</active></Message>").unwrap();
/// assert_eq!(map["customers"], XmlValue::String(String::new()));
/// assert_eq!(map["active"], XmlValue::Bool(true));
/// assert_eq!(map["@rootNode"], XmlValue::from("Message"));
/// ```
pub fn xml_to_array(xml: &str) -> Result<NodeMap> {
    Decoder::new().decode(xml)
}

/// Decode an XML document with custom configuration.
pub fn xml_to_array_with_config(xml: &str, config: DecoderConfig) -> Result<NodeMap> {
    Decoder::with_config(config).decode(xml)
}

/// Shape one element occurrence into its public value.
fn shape(mut raw: RawElement, mode: AttributeMode) -> XmlValue {
    if mode == AttributeMode::Ignore {
        raw.shift_remove(ATTRIBUTES_KEY);
        if raw.len() == 1 {
            if let Some(RawEntry::Text(value)) = raw.shift_remove(VALUE_KEY) {
                return value;
            }
        }
    }

    let map = raw
        .into_iter()
        .map(|(key, entry)| {
            let value = match entry {
                RawEntry::Text(value) => value,
                RawEntry::Attributes(attributes) => XmlValue::Map(attributes),
                RawEntry::Elements(siblings) => {
                    let mut values: Vec<XmlValue> =
                        siblings.into_iter().map(|el| shape(el, mode)).collect();
                    if values.len() == 1 {
                        values.swap_remove(0)
                    } else {
                        XmlValue::List(values)
                    }
                }
            };
            (key, value)
        })
        .collect();

    XmlValue::Map(map)
}

/// Tag name including its namespace prefix, if it has one.
fn qualified_name(node: Node<'_, '_>) -> String {
    let tag = node.tag_name();
    match tag.namespace().and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, tag.name()),
        _ => tag.name().to_owned(),
    }
}
