//! Error types for XML conversion.
//!
//! Both directions fail with a single [`XmlConvertError`]; the [`ErrorKind`]
//! tells an encode failure (bad element or attribute name) apart from a decode
//! failure (empty or malformed document).

use std::fmt;
use thiserror::Error;

/// The main error type for XML conversion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct XmlConvertError {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Human readable description, naming the offending tag or input problem.
    pub message: String,
    /// Diagnostic from the underlying XML parser, if any.
    pub detail: Option<String>,
}

impl fmt::Display for XmlConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref detail) = self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

/// Specific kinds of conversion errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An element, attribute or root name does not match the tag grammar,
    /// or a reserved key holds a value that cannot be written.
    #[error("invalid xml tag")]
    InvalidTag,

    /// The input is empty or is not a well-formed XML document.
    #[error("invalid xml")]
    InvalidXml,
}

impl ErrorKind {
    /// Application error code shared by the XML error family.
    pub const ERROR_CODE: u32 = 1100;

    /// HTTP status reported for runtime errors.
    pub const STATUS_CODE: u16 = 500;

    /// Get the error code.
    #[inline]
    pub fn error_code(self) -> u32 {
        Self::ERROR_CODE
    }

    /// Get the error sub-code.
    #[inline]
    pub fn error_sub_code(self) -> u32 {
        0
    }

    /// Get the response status code.
    #[inline]
    pub fn status_code(self) -> u16 {
        Self::STATUS_CODE
    }
}

impl XmlConvertError {
    /// Create a new error with the given kind and message.
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    /// Create an [`ErrorKind::InvalidTag`] error.
    #[cold]
    pub fn invalid_tag(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidTag, message)
    }

    /// Create an [`ErrorKind::InvalidXml`] error.
    #[cold]
    pub fn invalid_xml(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidXml, message)
    }

    /// Attach a parser diagnostic to the error.
    #[inline]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Get the error code.
    #[inline]
    pub fn error_code(&self) -> u32 {
        self.kind.error_code()
    }

    /// Get the error sub-code.
    #[inline]
    pub fn error_sub_code(&self) -> u32 {
        self.kind.error_sub_code()
    }

    /// Get the response status code.
    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }
}

/// Result type alias for XML conversion.
pub type Result<T> = std::result::Result<T, XmlConvertError>;
