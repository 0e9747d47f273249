//! Node map value types.

use std::fmt;

use indexmap::IndexMap;

/// Reserved key holding an element's attributes.
pub const ATTRIBUTES_KEY: &str = "@attributes";

/// Reserved key holding an element's text content.
pub const VALUE_KEY: &str = "@value";

/// Reserved key holding text that is always written as a CDATA section.
pub const CDATA_KEY: &str = "@cdata";

/// Reserved key naming the document's root element.
pub const ROOT_NODE_KEY: &str = "@rootNode";

/// An ordered map from element (or reserved) key to value.
///
/// Insertion order is document order, both when encoding and decoding.
pub type NodeMap = IndexMap<String, XmlValue>;

/// A value inside a node map.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum XmlValue {
    /// Null value, written as empty text.
    #[default]
    Null,

    /// Boolean value, written as `true`/`false`.
    Bool(bool),

    /// Integer value.
    Int(i64),

    /// Float value.
    Float(f64),

    /// String value.
    String(String),

    /// A single element's children, possibly with reserved keys.
    Map(NodeMap),

    /// Repeated sibling elements sharing one tag name.
    List(Vec<XmlValue>),
}

/// How decoding treats attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttributeMode {
    /// Drop `@attributes` and flatten `{"@value": x}` down to `x`.
    #[default]
    Ignore,
    /// Keep `@attributes` and `@value` wrappers as parsed.
    Include,
}

impl XmlValue {
    /// Build a map value from key/value pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, XmlValue)>,
    {
        XmlValue::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a list value.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = XmlValue>,
    {
        XmlValue::List(items.into_iter().collect())
    }

    /// Check if the value is null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, XmlValue::Null)
    }

    /// Check if the value is a scalar (anything but a map or list).
    #[inline]
    pub fn is_scalar(&self) -> bool {
        !matches!(self, XmlValue::Map(_) | XmlValue::List(_))
    }

    /// Check if the value is a map.
    #[inline]
    pub fn is_map(&self) -> bool {
        matches!(self, XmlValue::Map(_))
    }

    /// Check if the value is a list.
    #[inline]
    pub fn is_list(&self) -> bool {
        matches!(self, XmlValue::List(_))
    }

    /// Get the value as a boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            XmlValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as an integer.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            XmlValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a string slice.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            XmlValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a map.
    #[inline]
    pub fn as_map(&self) -> Option<&NodeMap> {
        match self {
            XmlValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Get the value as a list.
    #[inline]
    pub fn as_list(&self) -> Option<&[XmlValue]> {
        match self {
            XmlValue::List(l) => Some(l.as_slice()),
            _ => None,
        }
    }

    /// Consume the value, returning the map if it is one.
    pub fn into_map(self) -> Option<NodeMap> {
        match self {
            XmlValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Text form of a scalar as it appears in a document.
    ///
    /// Returns `None` for maps and lists, which have no text form.
    ///
    /// Floats use the shortest form that reads back to the same `f64`, not a
    /// fixed 14-digit precision: `0.1 + 0.2` is written `0.30000000000000004`
    /// and `1e20` is written out in full as `100000000000000000000`.
    /// Non-finite floats are written `INF`, `-INF` and `NAN`.
    pub fn to_text(&self) -> Option<String> {
        let text = match self {
            XmlValue::Null => String::new(),
            XmlValue::Bool(true) => "true".to_owned(),
            XmlValue::Bool(false) => "false".to_owned(),
            XmlValue::Int(i) => i.to_string(),
            XmlValue::Float(f) => format_float(*f),
            XmlValue::String(s) => s.clone(),
            XmlValue::Map(_) | XmlValue::List(_) => return None,
        };
        Some(text)
    }

    /// Read document text, turning `true`/`false` (any case) into booleans.
    pub fn from_text(text: &str) -> Self {
        if text.eq_ignore_ascii_case("true") {
            XmlValue::Bool(true)
        } else if text.eq_ignore_ascii_case("false") {
            XmlValue::Bool(false)
        } else {
            XmlValue::String(text.to_owned())
        }
    }

    /// Get a type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            XmlValue::Null => "null",
            XmlValue::Bool(_) => "boolean",
            XmlValue::Int(_) => "integer",
            XmlValue::Float(_) => "float",
            XmlValue::String(_) => "string",
            XmlValue::Map(_) => "map",
            XmlValue::List(_) => "list",
        }
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NAN".to_owned()
    } else if f.is_infinite() {
        if f.is_sign_positive() {
            "INF".to_owned()
        } else {
            "-INF".to_owned()
        }
    } else {
        f.to_string()
    }
}

impl From<bool> for XmlValue {
    fn from(b: bool) -> Self {
        XmlValue::Bool(b)
    }
}

impl From<i64> for XmlValue {
    fn from(i: i64) -> Self {
        XmlValue::Int(i)
    }
}

impl From<i32> for XmlValue {
    fn from(i: i32) -> Self {
        XmlValue::Int(i64::from(i))
    }
}

impl From<f64> for XmlValue {
    fn from(f: f64) -> Self {
        XmlValue::Float(f)
    }
}

impl From<&str> for XmlValue {
    fn from(s: &str) -> Self {
        XmlValue::String(s.to_owned())
    }
}

impl From<String> for XmlValue {
    fn from(s: String) -> Self {
        XmlValue::String(s)
    }
}

impl From<NodeMap> for XmlValue {
    fn from(m: NodeMap) -> Self {
        XmlValue::Map(m)
    }
}

impl From<Vec<XmlValue>> for XmlValue {
    fn from(l: Vec<XmlValue>) -> Self {
        XmlValue::List(l)
    }
}

impl fmt::Display for XmlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XmlValue::Null => write!(f, "null"),
            XmlValue::Bool(b) => write!(f, "{}", b),
            XmlValue::Int(i) => write!(f, "{}", i),
            XmlValue::Float(fl) => write!(f, "{}", format_float(*fl)),
            XmlValue::String(s) => write!(f, "\"{}\"", s),
            XmlValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", k, v)?;
                }
                write!(f, "}}")
            }
            XmlValue::List(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}
