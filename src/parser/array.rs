//! Binary payload decoding
//!
//! A payload is a sequence of blocks. Each block is a 4-byte length marker,
//! the element bytes, and a trailing marker equal to the leading one. Every
//! block but the last holds exactly the per-type maximum element count.

use super::primitives::{f32_be, f64_be, i32_be, u32_be};
use super::string::trim_field;
use super::take::ByteCursor;
use crate::error::{EclError, Result};
use crate::types::{ArrayData, ArrayType, BlockLayout, FALSE_VALUE, Layout, NAME_LEN, TRUE_VALUE};

/// Decode the binary payload of one array
///
/// `bytes` holds exactly the payload; `base` is its stream offset.
pub fn decode_binary(
    bytes: &[u8],
    base: u64,
    name: &str,
    array_type: ArrayType,
    count: usize,
    layout: &Layout,
) -> Result<ArrayData> {
    let mut cursor = ByteCursor::new(bytes, base);

    let data = match layout.block(array_type) {
        None => ArrayData::Mess,
        Some(block) => match array_type {
            ArrayType::Inte => {
                ArrayData::Inte(read_blocks(&mut cursor, name, block, count, i32_be)?)
            }
            ArrayType::Real => {
                ArrayData::Real(read_blocks(&mut cursor, name, block, count, f32_be)?)
            }
            ArrayType::Doub => {
                ArrayData::Doub(read_blocks(&mut cursor, name, block, count, f64_be)?)
            }
            ArrayType::Logi => {
                let words = read_blocks(&mut cursor, name, block, count, u32_be)?;
                ArrayData::Logi(decode_logicals(&words, name, base)?)
            }
            ArrayType::Char => {
                let fields = read_blocks(&mut cursor, name, block, count, |c| c.take(NAME_LEN))?;
                let strings = fields
                    .into_iter()
                    .map(|field| {
                        trim_field(field)
                            .ok_or_else(|| EclError::corrupt(name, base, "string is not ASCII"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                ArrayData::Char(strings)
            }
            ArrayType::Mess => ArrayData::Mess,
        },
    };

    if !cursor.is_empty() {
        return Err(EclError::corrupt(
            name,
            cursor.offset(),
            format!("{} unexpected trailing bytes", cursor.remaining()),
        ));
    }

    Ok(data)
}

fn read_blocks<'a, T>(
    cursor: &mut ByteCursor<'a>,
    name: &str,
    block: &BlockLayout,
    count: usize,
    mut element: impl FnMut(&mut ByteCursor<'a>) -> Option<T>,
) -> Result<Vec<T>> {
    let max_elements = block.max_block_elements();
    let mut values = Vec::with_capacity(count);
    let mut rest = count;

    while rest > 0 {
        let block_start = cursor.offset();
        let head = i32_be(cursor)
            .ok_or_else(|| EclError::corrupt(name, block_start, "truncated block marker"))?;

        let head_bytes = usize::try_from(head).map_err(|_| {
            EclError::corrupt(name, block_start, format!("negative block marker {head}"))
        })?;
        if head_bytes % block.element_size != 0 {
            return Err(EclError::corrupt(
                name,
                block_start,
                format!(
                    "block marker {head} is not a multiple of the element size {}",
                    block.element_size
                ),
            ));
        }

        let num = head_bytes / block.element_size;
        if num == 0 || num > max_elements || num > rest || (num < max_elements && num != rest) {
            return Err(EclError::corrupt(
                name,
                block_start,
                format!(
                    "inconsistent block of {num} elements, {rest} of {count} remaining, block limit {max_elements}"
                ),
            ));
        }

        for _ in 0..num {
            let value = element(cursor).ok_or_else(|| {
                EclError::corrupt(name, cursor.offset(), "truncated block data")
            })?;
            values.push(value);
        }
        rest -= num;

        let tail_start = cursor.offset();
        let tail = i32_be(cursor)
            .ok_or_else(|| EclError::corrupt(name, tail_start, "truncated block marker"))?;
        if tail != head {
            return Err(EclError::corrupt(
                name,
                tail_start,
                format!("tail marker {tail} not matching head marker {head}"),
            ));
        }
    }

    Ok(values)
}

fn decode_logicals(words: &[u32], name: &str, base: u64) -> Result<Vec<bool>> {
    words
        .iter()
        .map(|&word| match word {
            TRUE_VALUE => Ok(true),
            FALSE_VALUE => Ok(false),
            other => Err(EclError::corrupt(
                name,
                base,
                format!("invalid logical value 0x{other:08X}"),
            )),
        })
        .collect()
}
