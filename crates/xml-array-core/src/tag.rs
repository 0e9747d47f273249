//! Tag-name grammar.
//!
//! Names accepted for elements and attributes are a strict ASCII subset of the
//! XML `Name` production: a letter or underscore, then letters, digits or any of
//! `:-._`, never ending in a colon.

/// Check whether `name` may be used as an element or attribute name.
///
/// ```rust
/// use xml_array_core::is_valid_tag;
///
/// assert!(is_valid_tag("user_id"));
/// assert!(is_valid_tag("ns:tag"));
/// assert!(!is_valid_tag("1abc"));
/// assert!(!is_valid_tag("bad:"));
/// ```
pub fn is_valid_tag(name: &str) -> bool {
    let bytes = name.as_bytes();

    let Some((&first, rest)) = bytes.split_first() else {
        return false;
    };

    if !(first.is_ascii_alphabetic() || first == b'_') {
        return false;
    }

    if bytes.last() == Some(&b':') {
        return false;
    }

    rest.iter().all(|&b| is_name_byte(b))
}

#[inline(always)]
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b':' | b'-' | b'.' | b'_')
}
