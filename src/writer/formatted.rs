//! Formatted (text) array serialization
//!
//! Values are written right-aligned in fixed-width columns. A newline ends
//! every full line and every block, so a block never shares a line with the
//! next one.

use crate::error::Result;
use crate::types::{BlockLayout, DataView, Layout};
use std::io::Write;

/// Write one array: the header line followed by its payload lines
pub fn write_formatted_array<W: Write>(
    out: &mut W,
    name: &str,
    count: i32,
    data: DataView<'_>,
    layout: &Layout,
) -> Result<()> {
    writeln!(out, " '{name:<8}'{count:>12} '{}'", data.array_type().tag())?;

    let Some(block) = layout.block(data.array_type()) else {
        return Ok(());
    };
    let width = block.column_width;

    match data {
        DataView::Inte(v) => write_lines(out, v, block, |out, x| write!(out, "{x:>width$}")),
        DataView::Real(v) => write_lines(out, v, block, |out, &x| {
            write!(out, "{:>width$}", real_token(x))
        }),
        DataView::Doub(v) => write_lines(out, v, block, |out, &x| {
            write!(out, "{:>width$}", double_token(x))
        }),
        DataView::Logi(v) => write_lines(out, v, block, |out, &x| {
            write!(out, "{:>width$}", if x { "T" } else { "F" })
        }),
        DataView::Char(v) => write_lines(out, v, block, |out, s| write!(out, " '{s:<8}'")),
        DataView::Mess => Ok(()),
    }
}

fn write_lines<W: Write, T>(
    out: &mut W,
    values: &[T],
    block: &BlockLayout,
    mut element: impl FnMut(&mut W, &T) -> std::io::Result<()>,
) -> Result<()> {
    for chunk in values.chunks(block.max_formatted_elements) {
        for line in chunk.chunks(block.columns) {
            for value in line {
                element(out, value)?;
            }
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// REAL token, `0.31000000E+01`
///
/// Eight significant digits, so values needing nine are rounded.
pub fn real_token(value: f32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        let sign = if value.is_sign_negative() { "-" } else { "" };
        return format!("{sign}0.00000000E+00");
    }
    let (negative, digits, exponent) = split_scientific(&format!("{value:.7E}"));
    format!(
        "{}0.{digits}E{:+03}",
        if negative { "-" } else { "" },
        exponent + 1
    )
}

/// DOUB token, `0.27100000000000D+01`
///
/// Fourteen significant digits. The exponent letter is dropped when the
/// exponent needs three digits.
pub fn double_token(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        let sign = if value.is_sign_negative() { "-" } else { "" };
        return format!("{sign}0.00000000000000D+00");
    }
    let (negative, digits, exponent) = split_scientific(&format!("{value:.13E}"));
    let exponent = exponent + 1;
    let letter = if exponent.abs() >= 100 { "" } else { "D" };
    format!(
        "{}0.{digits}{letter}{exponent:+03}",
        if negative { "-" } else { "" }
    )
}

/// Split Rust's `d.dddE±x` rendering into sign, mantissa digits and exponent
fn split_scientific(text: &str) -> (bool, String, i32) {
    let (negative, text) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (mantissa, exponent) = text.split_once('E').unwrap_or((text, "0"));
    let digits = mantissa.chars().filter(char::is_ascii_digit).collect();
    (negative, digits, exponent.parse().unwrap_or(0))
}
