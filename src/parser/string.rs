//! Fixed-width string helpers

use crate::types::NAME_LEN;

/// Strip the space padding of a fixed 8-character field
///
/// Returns `None` if the bytes are not ASCII.
pub fn trim_field(bytes: &[u8]) -> Option<String> {
    if !bytes.is_ascii() {
        return None;
    }
    let end = bytes
        .iter()
        .rposition(|&b| b != b' ')
        .map_or(0, |p| p + 1);
    // ASCII checked above
    std::str::from_utf8(&bytes[..end]).ok().map(str::to_string)
}

/// Iterate the apostrophe-quoted fields of one formatted line
///
/// Yields `Err(())` once if a quote is left unterminated.
pub fn quoted_fields(line: &str) -> QuotedFields<'_> {
    QuotedFields { rest: line }
}

pub struct QuotedFields<'a> {
    rest: &'a str,
}

impl<'a> Iterator for QuotedFields<'a> {
    type Item = Result<&'a str, ()>;

    fn next(&mut self) -> Option<Self::Item> {
        let open = self.rest.find('\'')?;
        let after = &self.rest[open + 1..];
        match after.find('\'') {
            Some(close) => {
                self.rest = &after[close + 1..];
                Some(Ok(&after[..close]))
            }
            None => {
                self.rest = "";
                Some(Err(()))
            }
        }
    }
}

/// Pad `value` with spaces to the fixed field width
pub fn pad_field(value: &str) -> [u8; NAME_LEN] {
    let mut out = [b' '; NAME_LEN];
    let bytes = value.as_bytes();
    let n = bytes.len().min(NAME_LEN);
    out[..n].copy_from_slice(&bytes[..n]);
    out
}
