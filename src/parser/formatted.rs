//! Formatted (text) payload decoding
//!
//! Values are whitespace separated tokens, independent of line breaks:
//! plain integers, Fortran style reals (`0.31000000E+01`, `0.27100000000000D+01`,
//! or `0.1-100` with the exponent letter dropped), `T`/`F` logicals, and
//! apostrophe-quoted 8-character strings.

use super::string::{quoted_fields, trim_field};
use crate::error::{EclError, Result};
use crate::types::{ArrayData, ArrayType, NAME_LEN};
use std::borrow::Cow;

/// Number of values on one payload line
pub fn count_values(line: &str, array_type: ArrayType, name: &str, position: u64) -> Result<usize> {
    match array_type {
        ArrayType::Char => {
            let mut n = 0;
            for field in quoted_fields(line) {
                field.map_err(|_| unterminated(name, position))?;
                n += 1;
            }
            Ok(n)
        }
        _ => Ok(line.split_ascii_whitespace().count()),
    }
}

/// Decode the formatted payload of one array
///
/// `text` holds exactly the payload lines; `base` is their stream offset.
pub fn decode_formatted(
    text: &str,
    base: u64,
    name: &str,
    array_type: ArrayType,
    count: usize,
) -> Result<ArrayData> {
    let data = match array_type {
        ArrayType::Inte => ArrayData::Inte(parse_tokens(text, base, name, |t| t.parse::<i32>().ok())?),
        ArrayType::Real => ArrayData::Real(parse_tokens(text, base, name, parse_real)?),
        ArrayType::Doub => ArrayData::Doub(parse_tokens(text, base, name, parse_double)?),
        ArrayType::Logi => ArrayData::Logi(parse_tokens(text, base, name, parse_logical)?),
        ArrayType::Char => ArrayData::Char(parse_strings(text, base, name)?),
        ArrayType::Mess => ArrayData::Mess,
    };

    if data.len() != count {
        return Err(EclError::corrupt(
            name,
            base,
            format!("expected {count} values, found {}", data.len()),
        ));
    }

    Ok(data)
}

fn parse_tokens<T>(
    text: &str,
    base: u64,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<T>> {
    text.split_ascii_whitespace()
        .map(|token| {
            parse(token).ok_or_else(|| {
                EclError::corrupt(name, base, format!("could not convert '{token}'"))
            })
        })
        .collect()
}

fn parse_strings(text: &str, base: u64, name: &str) -> Result<Vec<String>> {
    let mut values = Vec::new();
    for field in text.lines().flat_map(quoted_fields) {
        let field = field.map_err(|_| unterminated(name, base))?;
        if field.len() != NAME_LEN {
            return Err(EclError::corrupt(
                name,
                base,
                format!("string '{field}' should have {NAME_LEN} characters"),
            ));
        }
        let value = trim_field(field.as_bytes())
            .ok_or_else(|| EclError::corrupt(name, base, "string is not ASCII"))?;
        values.push(value);
    }
    Ok(values)
}

fn unterminated(name: &str, position: u64) -> EclError {
    EclError::corrupt(
        name,
        position,
        "all strings must be enclosed by apostrophes (')",
    )
}

fn parse_logical(token: &str) -> Option<bool> {
    match token {
        "T" => Some(true),
        "F" => Some(false),
        _ => None,
    }
}

/// Parse a REAL token
pub fn parse_real(token: &str) -> Option<f32> {
    normalize_exponent(token).parse().ok()
}

/// Parse a DOUB token
pub fn parse_double(token: &str) -> Option<f64> {
    normalize_exponent(token).parse().ok()
}

/// Rewrite Fortran exponent spellings into something `str::parse` accepts
fn normalize_exponent(token: &str) -> Cow<'_, str> {
    if token.contains(['D', 'd']) {
        return Cow::Owned(token.replace(['D', 'd'], "E"));
    }
    if token.contains(['E', 'e']) {
        return Cow::Borrowed(token);
    }
    // Three-digit exponents drop the letter: 0.1-100
    let tail = token.get(1..).unwrap_or("");
    match tail.find(['+', '-']) {
        Some(p) => {
            let split = p + 1;
            Cow::Owned(format!("{}E{}", &token[..split], &token[split..]))
        }
        None => Cow::Borrowed(token),
    }
}
