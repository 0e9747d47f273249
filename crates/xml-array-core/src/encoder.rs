//! Node map to XML encoder.
//!
//! Reserved keys are classified into [`Body`] before any element is built, so
//! the tree builder matches exhaustively instead of probing sentinel keys:
//!
//! | Key | Effect |
//! |-----|--------|
//! | `@attributes` | attributes of the enclosing element |
//! | `@value` | text content, children ignored |
//! | `@cdata` | CDATA content, children ignored |
//! | `@rootNode` | root element name, never written |
//!
//! # Tracing Support
//!
//! Enable the `tracing` feature to log each encode call.

#[cfg(feature = "tracing")]
use tracing::{debug, instrument, warn};

use crate::error::{Result, XmlConvertError};
use crate::node::{write_document, Element, XmlNode};
use crate::tag::is_valid_tag;
use crate::types::{NodeMap, XmlValue, ATTRIBUTES_KEY, CDATA_KEY, ROOT_NODE_KEY, VALUE_KEY};

/// Root element name used when neither the caller nor the data names one.
pub const DEFAULT_ROOT: &str = "data";

/// Encoder configuration options.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Root element name used when none is given.
    pub default_root: String,
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            default_root: DEFAULT_ROOT.to_owned(),
            indent: 2,
        }
    }
}

/// Converts node maps into XML documents.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: EncoderConfig,
}

/// What a map-valued element holds once its reserved keys are resolved.
enum Body<'a> {
    Text(&'a XmlValue),
    Cdata(&'a XmlValue),
    Children(Vec<(&'a str, &'a XmlValue)>),
}

/// A map-valued element split into attributes and body.
struct Classified<'a> {
    attributes: Option<Vec<(String, &'a XmlValue)>>,
    body: Body<'a>,
}

impl Encoder {
    /// Create an encoder with default configuration.
    pub fn new() -> Self {
        Self::with_config(EncoderConfig::default())
    }

    /// Create an encoder with custom configuration.
    pub fn with_config(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Encode `data` as an XML document.
    ///
    /// The root element is named by `root_node`, else by a string `@rootNode`
    /// entry of `data`, else by [`EncoderConfig::default_root`].
    #[cfg_attr(feature = "tracing", instrument(skip(self, data), fields(entries = data.len())))]
    pub fn encode(&self, data: &NodeMap, root_node: Option<&str>) -> Result<String> {
        let root_name = root_node
            .or_else(|| data.get(ROOT_NODE_KEY).and_then(XmlValue::as_str))
            .unwrap_or(self.config.default_root.as_str());

        if !is_valid_tag(root_name) {
            #[cfg(feature = "tracing")]
            warn!(root = root_name, "Invalid root node name");
            return Err(XmlConvertError::invalid_tag(format!(
                "RootNode {} is not a valid xml tag",
                root_name
            )));
        }

        let root = build_map_element(root_name, data)?;
        let document = write_document(&root, self.config.indent)?;

        #[cfg(feature = "tracing")]
        debug!(root = root_name, bytes = document.len(), "Encoded XML document");

        Ok(document)
    }
}

/// Encode `data` as an XML document with default configuration.
///
/// # Example
///
/// ```rust
/// use xml_array_core::{array_to_xml, NodeMap, XmlValue};
///
/// let mut data = NodeMap::new();
/// data.insert("disabled".into(), XmlValue::Bool(true));
///
/// let xml = array_to_xml(&data, Some("Message")).unwrap();
/// assert_eq!(
///     xml,
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Message>\n  <disabled>true</disabled>\n</Message>\n"
/// );
/// ```
pub fn array_to_xml(data: &NodeMap, root_node: Option<&str>) -> Result<String> {
    Encoder::new().encode(data, root_node)
}

/// Build the element `name` for any value.
fn build_element(name: &str, value: &XmlValue) -> Result<Element> {
    match value {
        XmlValue::Map(map) => build_map_element(name, map),
        XmlValue::List(items) => build_indexed_element(name, items),
        scalar => {
            let mut element = Element::new(name);
            element.children.push(XmlNode::text(scalar_text(name, scalar)?));
            Ok(element)
        }
    }
}

/// A list used as an element body behaves like a map keyed `0, 1, ...`,
/// none of which are valid names.
fn build_indexed_element(name: &str, items: &[XmlValue]) -> Result<Element> {
    if items.is_empty() {
        return Ok(Element::new(name));
    }
    Err(invalid_node_name("0", name))
}

fn build_map_element(name: &str, map: &NodeMap) -> Result<Element> {
    let classified = classify(map);
    let mut element = Element::new(name);

    if let Some(attributes) = classified.attributes {
        for (key, value) in attributes {
            if !is_valid_tag(&key) {
                return Err(XmlConvertError::invalid_tag(format!(
                    "Attribute name is invalid for \"{}\" in node \"{}\"",
                    key, name
                )));
            }
            let text = value.to_text().ok_or_else(|| {
                XmlConvertError::invalid_tag(format!(
                    "Attribute \"{}\" in node \"{}\" must be a scalar, {} given",
                    key,
                    name,
                    value.type_name()
                ))
            })?;
            element.attributes.push((key, text));
        }
    }

    match classified.body {
        Body::Text(value) => {
            element.children.push(XmlNode::text(scalar_text(name, value)?));
        }
        Body::Cdata(value) => {
            element.children.push(XmlNode::Cdata(scalar_text(name, value)?));
        }
        Body::Children(children) => {
            for (key, value) in children {
                if !is_valid_tag(key) {
                    return Err(invalid_node_name(key, name));
                }
                match value {
                    XmlValue::List(items) if !items.is_empty() => {
                        for item in items {
                            element.children.push(XmlNode::Element(build_element(key, item)?));
                        }
                    }
                    _ => element.children.push(XmlNode::Element(build_element(key, value)?)),
                }
            }
        }
    }

    Ok(element)
}

/// Resolve the reserved keys of a map.
///
/// `@attributes` is consumed only when it holds a map or list; `@value` and
/// `@cdata` only when non-null. Anything not consumed is treated as a child
/// and therefore fails tag validation.
fn classify(map: &NodeMap) -> Classified<'_> {
    let attributes = match map.get(ATTRIBUTES_KEY) {
        Some(XmlValue::Map(attrs)) => Some(attrs.iter().map(|(k, v)| (k.clone(), v)).collect()),
        Some(XmlValue::List(attrs)) => Some(
            attrs
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
        ),
        _ => None,
    };

    let body = match (map.get(VALUE_KEY), map.get(CDATA_KEY)) {
        (Some(value), _) if !value.is_null() => Body::Text(value),
        (_, Some(value)) if !value.is_null() => Body::Cdata(value),
        _ => {
            let skip_attributes = attributes.is_some();
            Body::Children(
                map.iter()
                    .filter(|(key, _)| {
                        key.as_str() != ROOT_NODE_KEY
                            && !(skip_attributes && key.as_str() == ATTRIBUTES_KEY)
                    })
                    .map(|(key, value)| (key.as_str(), value))
                    .collect(),
            )
        }
    };

    Classified { attributes, body }
}

fn scalar_text(name: &str, value: &XmlValue) -> Result<String> {
    value.to_text().ok_or_else(|| {
        XmlConvertError::invalid_tag(format!(
            "Value of node \"{}\" must be a scalar, {} given",
            name,
            value.type_name()
        ))
    })
}

#[cold]
fn invalid_node_name(key: &str, name: &str) -> XmlConvertError {
    XmlConvertError::invalid_tag(format!(
        "Node name is invalid for \"{}\" in node \"{}\"",
        key, name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn map<const N: usize>(entries: [(&str, XmlValue); N]) -> NodeMap {
        entries.into_iter().map(|(k, v)| (k.to_owned(), v)).collect()
    }

    fn value<const N: usize>(entries: [(&str, XmlValue); N]) -> XmlValue {
        XmlValue::Map(map(entries))
    }

    const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Message>
  <customers>
    <name>John Smith</name>
    <card>4242424242424242</card>
  </customers>
  <customers>
    <name>Jane Burns</name>
    <card>5353535353535353</card>
    <notes><![CDATA[Test note ><]]></notes>
  </customers>
  <customers>
    <name>Bob Martin</name>
    <card>4111111111111111</card>
    <disabled>true</disabled>
  </customers>
</Message>
"#;

    const ATTRIBUTE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Message action="1">
  <customers id="1234">
    <name>John Smith</name>
    <card>4242424242424242</card>
  </customers>
  <customers id="7890">
    <name version="2">Jane Burns</name>
    <card>5353535353535353</card>
    <notes><![CDATA[Test note ><]]></notes>
  </customers>
  <customers id="4353">
    <name>Bob Martin</name>
    <card>4111111111111111</card>
    <disabled>true</disabled>
  </customers>
</Message>
"#;

    fn customers() -> NodeMap {
        map([
            (
                "customers",
                XmlValue::list([
                    value([("name", "John Smith".into()), ("card", "4242424242424242".into())]),
                    value([
                        ("name", "Jane Burns".into()),
                        ("card", "5353535353535353".into()),
                        ("notes", "Test note ><".into()),
                    ]),
                    value([
                        ("name", "Bob Martin".into()),
                        ("card", "4111111111111111".into()),
                        ("disabled", true.into()),
                    ]),
                ]),
            ),
            ("@rootNode", "Message".into()),
        ])
    }

    fn attribute_customers() -> NodeMap {
        let text = |s: &str| value([("@value", s.into())]);
        let id = |s: &str| value([("id", s.into())]);
        map([
            (
                "customers",
                XmlValue::list([
                    value([
                        ("name", text("John Smith")),
                        ("card", text("4242424242424242")),
                        ("@attributes", id("1234")),
                    ]),
                    value([
                        (
                            "name",
                            value([
                                ("@value", "Jane Burns".into()),
                                ("@attributes", value([("version", "2".into())])),
                            ]),
                        ),
                        ("card", text("5353535353535353")),
                        ("notes", text("Test note ><")),
                        ("@attributes", id("7890")),
                    ]),
                    value([
                        ("name", text("Bob Martin")),
                        ("card", text("4111111111111111")),
                        ("disabled", value([("@value", true.into())])),
                        ("@attributes", id("4353")),
                    ]),
                ]),
            ),
            ("@attributes", value([("action", "1".into())])),
            ("@rootNode", "Message".into()),
        ])
    }

    #[test]
    fn test_encode_without_attributes() {
        assert_eq!(array_to_xml(&customers(), Some("Message")).unwrap(), XML);
    }

    #[test]
    fn test_encode_with_attributes() {
        assert_eq!(array_to_xml(&attribute_customers(), Some("Message")).unwrap(), ATTRIBUTE_XML);
    }

    #[test]
    fn test_root_node_from_data() {
        assert_eq!(array_to_xml(&customers(), None).unwrap(), XML);
    }

    #[test]
    fn test_explicit_root_overrides_data() {
        let xml = array_to_xml(&customers(), Some("Envelope")).unwrap();
        assert!(xml.contains("<Envelope>\n"));
        assert!(xml.ends_with("</Envelope>\n"));
        assert!(!xml.contains("rootNode"));
    }

    #[test]
    fn test_empty_map_uses_default_root() {
        assert_eq!(
            array_to_xml(&NodeMap::new(), None).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<data/>\n"
        );
    }

    #[test]
    fn test_configured_default_root() {
        let encoder = Encoder::with_config(EncoderConfig {
            default_root: "request".into(),
            ..Default::default()
        });
        let xml = encoder.encode(&map([("id", 7.into())]), None).unwrap();
        assert!(xml.contains("<request>\n  <id>7</id>\n</request>\n"));
    }

    #[test]
    fn test_boolean_rendering() {
        let xml = array_to_xml(&map([("disabled", true.into()), ("active", false.into())]), None)
            .unwrap();
        assert!(xml.contains("<disabled>true</disabled>"));
        assert!(xml.contains("<active>false</active>"));
    }

    #[test]
    fn test_scalar_forms() {
        let xml = array_to_xml(
            &map([("count", 3.into()), ("ratio", 0.5.into()), ("nothing", XmlValue::Null)]),
            None,
        )
        .unwrap();
        assert!(xml.contains("<count>3</count>"));
        assert!(xml.contains("<ratio>0.5</ratio>"));
        assert!(xml.contains("<nothing></nothing>"));
    }

    #[test]
    fn test_cdata_for_special_characters() {
        for (text, expected) in [
            ("a<b", "<v><![CDATA[a<b]]></v>"),
            ("a>b", "<v><![CDATA[a>b]]></v>"),
            ("a&b", "<v><![CDATA[a&b]]></v>"),
            ("it's", "<v><![CDATA[it's]]></v>"),
            ("\"q\"", "<v><![CDATA[\"q\"]]></v>"),
            ("plain", "<v>plain</v>"),
        ] {
            let xml = array_to_xml(&map([("v", text.into())]), None).unwrap();
            assert!(xml.contains(expected), "{text}: {xml}");
        }
    }

    #[test]
    fn test_explicit_cdata() {
        let xml = array_to_xml(&map([("v", value([("@cdata", "plain".into())]))]), None).unwrap();
        assert!(xml.contains("<v><![CDATA[plain]]></v>"));
    }

    #[test]
    fn test_value_wins_over_children() {
        let xml = array_to_xml(
            &map([(
                "v",
                value([("ignored", "x".into()), ("@value", "kept".into()), ("@bad", "y".into())]),
            )]),
            None,
        )
        .unwrap();
        assert!(xml.contains("<v>kept</v>"));
        assert!(!xml.contains("ignored"));
    }

    #[test]
    fn test_value_before_cdata() {
        let xml = array_to_xml(
            &map([("v", value([("@cdata", "c".into()), ("@value", "v".into())]))]),
            None,
        )
        .unwrap();
        assert!(xml.contains("<v>v</v>"));
    }

    #[test]
    fn test_attributes_with_value() {
        let xml = array_to_xml(
            &map([(
                "amount",
                value([
                    ("@attributes", value([("currency", "AUD".into()), ("exact", true.into())])),
                    ("@value", 100.into()),
                ]),
            )]),
            None,
        )
        .unwrap();
        assert!(xml.contains("<amount currency=\"AUD\" exact=\"true\">100</amount>"));
    }

    #[test]
    fn test_empty_children() {
        let xml = array_to_xml(
            &map([("empty", value([])), ("none", XmlValue::List(Vec::new()))]),
            None,
        )
        .unwrap();
        assert!(xml.contains("  <empty/>\n  <none/>\n"));
    }

    #[test]
    fn test_list_of_scalars() {
        let xml = array_to_xml(
            &map([("item", XmlValue::list(["a".into(), "b".into()]))]),
            Some("items"),
        )
        .unwrap();
        assert!(xml.contains("<items>\n  <item>a</item>\n  <item>b</item>\n</items>"));
    }

    #[test]
    fn test_invalid_tag() {
        let err = array_to_xml(&map([("customers", value([("@invalid", "".into())]))]), None)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTag);
        assert_eq!(err.message, "Node name is invalid for \"@invalid\" in node \"customers\"");

        let err = array_to_xml(&map([("@invalid", "".into())]), None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTag);
    }

    #[test]
    fn test_invalid_attribute() {
        let err = array_to_xml(
            &map([("customers", value([("@attributes", value([("@invalid", "".into())]))]))]),
            None,
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTag);
        assert_eq!(
            err.message,
            "Attribute name is invalid for \"@invalid\" in node \"customers\""
        );
    }

    #[test]
    fn test_invalid_root() {
        let err = array_to_xml(&NodeMap::new(), Some("1abc")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTag);
        assert_eq!(err.message, "RootNode 1abc is not a valid xml tag");
    }

    #[test]
    fn test_null_value_is_not_consumed() {
        let err = array_to_xml(&map([("v", value([("@value", XmlValue::Null)]))]), None)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTag);
    }

    #[test]
    fn test_scalar_attributes_key_is_a_child() {
        let err = array_to_xml(&map([("v", value([("@attributes", "x".into())]))]), None)
            .unwrap_err();
        assert!(err.message.contains("@attributes"));
    }

    #[test]
    fn test_nested_list_fails_on_index() {
        let err = array_to_xml(
            &map([("row", XmlValue::list([XmlValue::list(["x".into()])]))]),
            None,
        )
        .unwrap_err();
        assert_eq!(err.message, "Node name is invalid for \"0\" in node \"row\"");
    }

    #[test]
    fn test_non_scalar_value_rejected() {
        let err = array_to_xml(
            &map([("v", value([("@value", value([("x", "y".into())]))]))]),
            None,
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTag);
        assert!(err.message.contains("must be a scalar"));

        let err = array_to_xml(
            &map([("v", value([("@attributes", value([("a", XmlValue::List(Vec::new()))]))]))]),
            None,
        )
        .unwrap_err();
        assert!(err.message.contains("Attribute \"a\""));
    }

    #[test]
    fn test_nested_root_node_is_dropped() {
        let xml = array_to_xml(&map([("inner", value([("@rootNode", "x".into()), ("a", 1.into())]))]), None)
            .unwrap();
        assert!(xml.contains("<inner>\n    <a>1</a>\n  </inner>"));
    }
}
