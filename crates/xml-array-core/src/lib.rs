//! Convert nested ordered maps to XML documents and back.
//!
//! Node maps describe XML with a handful of reserved keys, the convention used by
//! PHP services exchanging XML as arrays:
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `@attributes` | attributes of the enclosing element |
//! | `@value` | text content of the element |
//! | `@cdata` | text content written as a CDATA section |
//! | `@rootNode` | name of the root element |
//!
//! A [`XmlValue::List`] under a key produces one sibling element per entry.
//!
//! # Quick Start
//!
//! ```rust
//! use xml_array_core::{array_to_xml, xml_to_array, NodeMap, XmlValue};
//!
//! let customer = |name: &str| XmlValue::map([("name", XmlValue::from(name))]);
//!
//! let mut data = NodeMap::new();
//! data.insert("customers".into(), XmlValue::list([customer("John"), customer("Jane")]));
//!
//! let xml = array_to_xml(&data, Some("Message")).unwrap();
//! assert_eq!(xml.matches("<customers>").count(), 2);
//!
//! let decoded = xml_to_array(&xml).unwrap();
//! assert_eq!(decoded["customers"], data["customers"]);
//! assert_eq!(decoded["@rootNode"], XmlValue::from("Message"));
//! ```
//!
//! # Attributes
//!
//! Decoding drops attributes unless asked otherwise:
//!
//! ```rust
//! use xml_array_core::{xml_to_array, xml_to_array_with_config, DecoderConfig, XmlValue};
//!
//! let xml = r#"<Message><amount currency="AUD">10</amount></Message>"#;
//!
//! assert_eq!(xml_to_array(xml).unwrap()["amount"], XmlValue::from("10"));
//!
//! let kept = xml_to_array_with_config(xml, DecoderConfig::include_attributes()).unwrap();
//! assert_eq!(
//!     kept["amount"],
//!     XmlValue::map([
//!         ("@value", XmlValue::from("10")),
//!         ("@attributes", XmlValue::map([("currency", XmlValue::from("AUD"))])),
//!     ])
//! );
//! ```
//!
//! # Features
//!
//! - `serde` - `Serialize`/`Deserialize` for [`XmlValue`] and the [`json`] module
//! - `tracing` - debug and warning events from the encoder and decoder

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::inline_always)]

pub mod decoder;
pub mod encoder;
pub mod error;
mod node;
pub mod tag;
pub mod types;

#[cfg(feature = "serde")]
pub mod json;

pub use decoder::{xml_to_array, xml_to_array_with_config, Decoder, DecoderConfig};
pub use encoder::{array_to_xml, Encoder, EncoderConfig, DEFAULT_ROOT};
pub use error::{ErrorKind, Result, XmlConvertError};
pub use tag::is_valid_tag;
pub use types::{
    AttributeMode, NodeMap, XmlValue, ATTRIBUTES_KEY, CDATA_KEY, ROOT_NODE_KEY, VALUE_KEY,
};

#[cfg(feature = "serde")]
pub use json::{from_json, to_json};
