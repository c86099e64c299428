//! Block and column layout tables
//!
//! Binary payloads are split into blocks of at most `max_block_bytes`, each
//! bracketed by a pair of length markers. Formatted payloads are split into
//! blocks of at most `max_formatted_elements` values, written `columns` per
//! line with a fixed `column_width`.

use super::ArrayType;
use crate::error::{EclError, Result};

/// Layout for a single array type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    /// Bytes per element in the binary encoding
    pub element_size: usize,
    /// Maximum payload bytes between two binary block markers
    pub max_block_bytes: usize,
    /// Maximum elements per formatted block
    pub max_formatted_elements: usize,
    /// Values per formatted line
    pub columns: usize,
    /// Characters per formatted value
    pub column_width: usize,
}

impl BlockLayout {
    /// Maximum elements per binary block
    pub fn max_block_elements(&self) -> usize {
        self.max_block_bytes / self.element_size
    }

    /// Bytes occupied by `count` elements in the binary encoding, markers included
    pub fn binary_size(&self, count: usize) -> u64 {
        if count == 0 {
            return 0;
        }
        let blocks = count.div_ceil(self.max_block_elements());
        (count * self.element_size + blocks * 2 * MARKER_SIZE) as u64
    }
}

const MARKER_SIZE: usize = 4;

/// Format description shared by readers and writers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub inte: BlockLayout,
    pub real: BlockLayout,
    pub doub: BlockLayout,
    pub logi: BlockLayout,
    pub char: BlockLayout,
}

impl Layout {
    /// The historical table every ECLIPSE-compatible tool uses
    pub const ECLIPSE: Layout = Layout {
        inte: BlockLayout {
            element_size: 4,
            max_block_bytes: 4000,
            max_formatted_elements: 1000,
            columns: 6,
            column_width: 12,
        },
        real: BlockLayout {
            element_size: 4,
            max_block_bytes: 4000,
            max_formatted_elements: 1000,
            columns: 4,
            column_width: 17,
        },
        doub: BlockLayout {
            element_size: 8,
            max_block_bytes: 8000,
            max_formatted_elements: 1000,
            columns: 3,
            column_width: 23,
        },
        logi: BlockLayout {
            element_size: 4,
            max_block_bytes: 4000,
            max_formatted_elements: 1000,
            columns: 25,
            column_width: 3,
        },
        char: BlockLayout {
            element_size: 8,
            max_block_bytes: 840,
            max_formatted_elements: 105,
            columns: 7,
            column_width: 11,
        },
    };

    /// Layout for `ty`; `None` for presence-only arrays, which have no payload
    pub fn block(&self, ty: ArrayType) -> Option<&BlockLayout> {
        match ty {
            ArrayType::Inte => Some(&self.inte),
            ArrayType::Real => Some(&self.real),
            ArrayType::Doub => Some(&self.doub),
            ArrayType::Logi => Some(&self.logi),
            ArrayType::Char => Some(&self.char),
            ArrayType::Mess => None,
        }
    }

    /// Check that every block holds at least one element and every line at
    /// least one value
    ///
    /// Element sizes are fixed by the encoding: 4 bytes for INTE, REAL and
    /// LOGI, 8 for DOUB and CHAR.
    pub fn validate(&self) -> Result<()> {
        let types = [
            (ArrayType::Inte, 4),
            (ArrayType::Real, 4),
            (ArrayType::Doub, 8),
            (ArrayType::Logi, 4),
            (ArrayType::Char, 8),
        ];
        for (ty, size) in types {
            let Some(block) = self.block(ty) else { continue };
            let problem = if block.element_size != size {
                format!("element size {} (the encoding uses {size})", block.element_size)
            } else if block.max_block_bytes < block.element_size {
                format!("binary block of {} bytes holds no element", block.max_block_bytes)
            } else if block.max_formatted_elements == 0 {
                "formatted block holds no element".to_string()
            } else if block.columns == 0 {
                "formatted line holds no value".to_string()
            } else {
                continue;
            };
            return Err(EclError::InvalidInput(format!("{ty} layout: {problem}")));
        }
        Ok(())
    }

    /// Bytes occupied by a binary payload of `count` elements of type `ty`
    pub fn binary_size(&self, ty: ArrayType, count: usize) -> u64 {
        self.block(ty).map_or(0, |b| b.binary_size(count))
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout::ECLIPSE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_element_limits() {
        let layout = Layout::default();
        assert_eq!(layout.inte.max_block_elements(), 1000);
        assert_eq!(layout.doub.max_block_elements(), 1000);
        assert_eq!(layout.char.max_block_elements(), 105);
        assert!(layout.block(ArrayType::Mess).is_none());
    }

    #[test]
    fn binary_sizes() {
        let layout = Layout::default();
        assert_eq!(layout.binary_size(ArrayType::Inte, 0), 0);
        assert_eq!(layout.binary_size(ArrayType::Inte, 1), 4 + 8);
        assert_eq!(layout.binary_size(ArrayType::Inte, 1000), 4000 + 8);
        assert_eq!(layout.binary_size(ArrayType::Inte, 1001), 4004 + 16);
        assert_eq!(layout.binary_size(ArrayType::Char, 106), 848 + 16);
        assert_eq!(layout.binary_size(ArrayType::Mess, 0), 0);
    }

    #[test]
    fn synthetic_layout() {
        let mut layout = Layout::default();
        layout.inte.max_block_bytes = 8;
        assert_eq!(layout.binary_size(ArrayType::Inte, 5), 20 + 3 * 8);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn empty_blocks_rejected() {
        assert!(Layout::ECLIPSE.validate().is_ok());

        let mut layout = Layout::default();
        layout.doub.max_block_bytes = 4;
        let err = layout.validate().unwrap_err();
        assert!(err.to_string().contains("DOUB"));

        let mut layout = Layout::default();
        layout.real.element_size = 0;
        assert!(layout.validate().is_err());

        let mut layout = Layout::default();
        layout.char.columns = 0;
        assert!(layout.validate().is_err());

        let mut layout = Layout::default();
        layout.logi.max_formatted_elements = 0;
        assert!(layout.validate().is_err());
    }
}
