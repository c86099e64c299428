//! Binary array serialization

use crate::error::{EclError, Result};
use crate::parser::pad_field;
use crate::types::{BlockLayout, DataView, FALSE_VALUE, HEADER_MARKER, Layout, TRUE_VALUE};
use std::io::{self, Write};

/// Write one array: the 24-byte header followed by its marker-bracketed blocks
pub fn write_binary_array<W: Write>(
    out: &mut W,
    name: &str,
    count: i32,
    data: DataView<'_>,
    layout: &Layout,
) -> Result<()> {
    out.write_all(&HEADER_MARKER.to_be_bytes())?;
    out.write_all(&pad_field(name))?;
    out.write_all(&count.to_be_bytes())?;
    out.write_all(data.array_type().tag().as_bytes())?;
    out.write_all(&HEADER_MARKER.to_be_bytes())?;

    let Some(block) = layout.block(data.array_type()) else {
        return Ok(());
    };

    match data {
        DataView::Inte(v) => write_blocks(out, v, block, |out, x| out.write_all(&x.to_be_bytes())),
        DataView::Real(v) => write_blocks(out, v, block, |out, x| out.write_all(&x.to_be_bytes())),
        DataView::Doub(v) => write_blocks(out, v, block, |out, x| out.write_all(&x.to_be_bytes())),
        DataView::Logi(v) => write_blocks(out, v, block, |out, &x| {
            let word = if x { TRUE_VALUE } else { FALSE_VALUE };
            out.write_all(&word.to_be_bytes())
        }),
        DataView::Char(v) => write_blocks(out, v, block, |out, s| out.write_all(&pad_field(s))),
        DataView::Mess => Ok(()),
    }
}

fn write_blocks<W: Write, T>(
    out: &mut W,
    values: &[T],
    block: &BlockLayout,
    mut element: impl FnMut(&mut W, &T) -> io::Result<()>,
) -> Result<()> {
    for chunk in values.chunks(block.max_block_elements()) {
        let marker = i32::try_from(chunk.len() * block.element_size).map_err(|_| {
            EclError::InvalidInput(format!(
                "block of {} elements does not fit a length marker",
                chunk.len()
            ))
        })?;

        out.write_all(&marker.to_be_bytes())?;
        for value in chunk {
            element(out, value)?;
        }
        out.write_all(&marker.to_be_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{decode_binary, parse_binary_header};
    use crate::types::{ArrayData, ArrayType, HEADER_SIZE};

    fn encode(name: &str, data: DataView<'_>, layout: &Layout) -> Vec<u8> {
        let mut buf = Vec::new();
        write_binary_array(&mut buf, name, data.len() as i32, data, layout).unwrap();
        buf
    }

    #[test]
    fn header_layout() {
        let buf = encode("ICON", DataView::Inte(&[1, 2]), &Layout::default());
        assert_eq!(&buf[..4], &[0, 0, 0, 16]);
        assert_eq!(&buf[4..12], b"ICON    ");
        assert_eq!(&buf[12..16], &2i32.to_be_bytes());
        assert_eq!(&buf[16..20], b"INTE");
        assert_eq!(&buf[20..24], &[0, 0, 0, 16]);
        assert_eq!(buf.len(), HEADER_SIZE + 8 + 8);
    }

    #[test]
    fn message_is_header_only() {
        let buf = encode("ENDSOL", DataView::Mess, &Layout::default());
        assert_eq!(buf.len(), HEADER_SIZE);
        assert_eq!(&buf[16..20], b"MESS");
    }

    #[test]
    fn empty_array_has_no_blocks() {
        let buf = encode("EMPTY", DataView::Doub(&[]), &Layout::default());
        assert_eq!(buf.len(), HEADER_SIZE);
    }

    #[test]
    fn splits_into_blocks() {
        let values: Vec<i32> = (0..2500).collect();
        let layout = Layout::default();
        let buf = encode("BIG", DataView::Inte(&values), &layout);

        assert_eq!(buf.len() as u64, HEADER_SIZE as u64 + layout.binary_size(ArrayType::Inte, 2500));
        // First block holds the full 1000 elements
        assert_eq!(&buf[24..28], &4000i32.to_be_bytes());

        let header = parse_binary_header(&buf, 0).unwrap();
        let data =
            decode_binary(&buf[HEADER_SIZE..], 24, &header.name, header.array_type, header.count, &layout)
                .unwrap();
        assert_eq!(data, ArrayData::Inte(values));
    }

    #[test]
    fn strings_are_padded() {
        let names = vec!["W1".to_string(), "PROD".to_string()];
        let buf = encode("ZWEL", DataView::Char(&names), &Layout::default());
        assert_eq!(&buf[28..44], b"W1      PROD    ");
    }

    #[test]
    fn logicals_use_all_ones() {
        let buf = encode("LOGIHEAD", DataView::Logi(&[true, false]), &Layout::default());
        assert_eq!(&buf[28..32], &[0xFF; 4]);
        assert_eq!(&buf[32..36], &[0; 4]);
    }
}
