//! Array header parsing, binary and formatted

use super::primitives::i32_be;
use super::string::{quoted_fields, trim_field};
use super::take::ByteCursor;
use crate::error::{EclError, Result};
use crate::types::{ArrayType, HEADER_MARKER, HEADER_SIZE, NAME_LEN};

/// Name, type and count parsed from a header record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeader {
    pub name: String,
    pub array_type: ArrayType,
    pub count: usize,
}

/// Parse a 24-byte binary header starting at stream offset `position`
pub fn parse_binary_header(bytes: &[u8], position: u64) -> Result<RawHeader> {
    if bytes.len() < HEADER_SIZE {
        return Err(EclError::header(
            position,
            format!(
                "truncated header, {} of {} bytes available",
                bytes.len(),
                HEADER_SIZE
            ),
        ));
    }

    let mut cursor = ByteCursor::new(bytes, position);
    let truncated = || EclError::header(position, "truncated header");

    let head = i32_be(&mut cursor).ok_or_else(truncated)?;
    if head != HEADER_MARKER {
        return Err(EclError::header(
            position,
            format!("expected {HEADER_MARKER} bytes of header data, found {head}"),
        ));
    }

    let name_bytes = cursor.take(NAME_LEN).ok_or_else(truncated)?;
    let count = i32_be(&mut cursor).ok_or_else(truncated)?;
    let tag = cursor.take(4).ok_or_else(truncated)?;

    let tail = i32_be(&mut cursor).ok_or_else(truncated)?;
    if tail != HEADER_MARKER {
        return Err(EclError::header(
            position,
            format!("expected {HEADER_MARKER} bytes of header data, found {tail}"),
        ));
    }

    let name = trim_field(name_bytes)
        .ok_or_else(|| EclError::header(position, "array name is not ASCII"))?;
    let array_type = ArrayType::from_tag(tag).ok_or_else(|| {
        EclError::header(
            position,
            format!(
                "unknown array type '{}' for array '{name}'",
                String::from_utf8_lossy(tag)
            ),
        )
    })?;

    finish(name, array_type, i64::from(count), position)
}

/// Parse one formatted header line, e.g. ` 'ICON    '        1875 'INTE'`
pub fn parse_formatted_header(line: &str, position: u64) -> Result<RawHeader> {
    let mut fields = quoted_fields(line);
    let mut next_field = || match fields.next() {
        Some(Ok(field)) => Ok(field),
        _ => Err(EclError::header(
            position,
            "header name and type should be enclosed with '",
        )),
    };

    let raw_name = next_field()?;
    let raw_type = next_field()?;

    if raw_name.len() != NAME_LEN {
        return Err(EclError::header(
            position,
            format!("header name '{raw_name}' should be {NAME_LEN} characters"),
        ));
    }

    // The count sits between the closing quote of the name and the opening quote of the type
    let count_text = line
        .split('\'')
        .nth(2)
        .map(str::trim)
        .ok_or_else(|| EclError::header(position, "missing element count"))?;
    let count: i64 = count_text.parse().map_err(|_| {
        EclError::header(position, format!("invalid element count '{count_text}'"))
    })?;

    let name = trim_field(raw_name.as_bytes())
        .ok_or_else(|| EclError::header(position, "array name is not ASCII"))?;
    let array_type = ArrayType::from_tag(raw_type.as_bytes()).ok_or_else(|| {
        EclError::header(
            position,
            format!("unknown array type '{raw_type}' for array '{name}'"),
        )
    })?;

    finish(name, array_type, count, position)
}

fn finish(name: String, array_type: ArrayType, count: i64, position: u64) -> Result<RawHeader> {
    if count < 0 {
        return Err(EclError::header(
            position,
            format!("negative element count {count} for array '{name}'"),
        ));
    }
    if array_type == ArrayType::Mess && count > 0 {
        return Err(EclError::header(
            position,
            format!("MESS array '{name}' declares {count} elements"),
        ));
    }
    let count = usize::try_from(count)
        .map_err(|_| EclError::header(position, format!("element count {count} too large")))?;

    Ok(RawHeader {
        name,
        array_type,
        count,
    })
}
