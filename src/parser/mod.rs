//! Decoders for the binary and formatted container encodings
//!
//! The reader locates each array with the header parsers and later hands
//! the raw payload bytes to [`decode_payload`].

mod array;
mod formatted;
mod header;
mod primitives;
mod string;
mod take;

pub use array::decode_binary;
pub use formatted::{count_values, decode_formatted, parse_double, parse_real};
pub use header::{RawHeader, parse_binary_header, parse_formatted_header};
pub(crate) use string::pad_field;

use crate::error::{EclError, Result};
use crate::types::{ArrayData, ArrayType, HEADER_MARKER, Layout};
use std::path::Path;

/// Guess the encoding from the first bytes of a container
///
/// `Some(false)` for binary, `Some(true)` for formatted, `None` when the
/// bytes match neither framing. An empty prefix also yields `None`.
pub fn detect_format(prefix: &[u8]) -> Option<bool> {
    if prefix.len() >= 4 && prefix[..4] == HEADER_MARKER.to_be_bytes() {
        return Some(false);
    }
    match prefix.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'\'') => Some(true),
        _ => None,
    }
}

/// Filename convention: an extension starting with `F` or `A` is formatted
///
/// `CASE.FUNRST`, `CASE.F0005` and `CASE.A0005` are formatted;
/// `CASE.UNRST`, `CASE.X0005` and `CASE.EGRID` are binary.
pub fn is_formatted_name(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.chars().next())
        .is_some_and(|c| matches!(c, 'F' | 'A'))
}

/// Decode one payload in either encoding
pub fn decode_payload(
    bytes: &[u8],
    base: u64,
    name: &str,
    array_type: ArrayType,
    count: usize,
    layout: &Layout,
    formatted: bool,
) -> Result<ArrayData> {
    if formatted {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| EclError::corrupt(name, base, "payload is not valid text"))?;
        decode_formatted(text, base, name, array_type, count)
    } else {
        decode_binary(bytes, base, name, array_type, count, layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_binary() {
        assert_eq!(detect_format(&[0, 0, 0, 16, b'I', b'N']), Some(false));
    }

    #[test]
    fn detects_formatted() {
        assert_eq!(detect_format(b" 'INTEHEAD'         411 'INTE'"), Some(true));
        assert_eq!(detect_format(b"\n\n 'SEQNUM  '"), Some(true));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(detect_format(b"hello world"), None);
        assert_eq!(detect_format(&[0, 0, 0, 17]), None);
        assert_eq!(detect_format(&[]), None);
    }

    #[test]
    fn formatted_names() {
        assert!(is_formatted_name(Path::new("CASE.FUNRST")));
        assert!(is_formatted_name(Path::new("dir/CASE.F0005")));
        assert!(is_formatted_name(Path::new("CASE.A0003")));
        assert!(!is_formatted_name(Path::new("CASE.UNRST")));
        assert!(!is_formatted_name(Path::new("CASE.X0005")));
        assert!(!is_formatted_name(Path::new("CASE")));
    }

    #[test]
    fn dispatch_formatted_payload() {
        let data = decode_payload(
            b"           1           2\n",
            0,
            "I",
            ArrayType::Inte,
            2,
            &Layout::default(),
            true,
        )
        .unwrap();
        assert_eq!(data, ArrayData::Inte(vec![1, 2]));
    }
}
