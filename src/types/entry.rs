//! Catalogue entries

use super::{ArrayData, ArrayType};
use std::cell::OnceCell;

/// Name, type and element count of one array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayInfo {
    pub name: String,
    pub array_type: ArrayType,
    pub count: usize,
}

impl ArrayInfo {
    pub fn new(name: impl Into<String>, array_type: ArrayType, count: usize) -> Self {
        Self {
            name: name.into(),
            array_type,
            count,
        }
    }
}

/// One array in a container's catalogue
///
/// Name, type, count and stream positions are fixed when the header is
/// parsed. The payload cell starts empty and is filled at most once, the
/// first time the array is decoded.
#[derive(Debug)]
pub struct Entry {
    name: String,
    array_type: ArrayType,
    count: usize,
    header_offset: u64,
    data_offset: u64,
    data_len: u64,
    data: OnceCell<ArrayData>,
}

impl Entry {
    pub(crate) fn new(
        name: String,
        array_type: ArrayType,
        count: usize,
        header_offset: u64,
        data_offset: u64,
        data_len: u64,
    ) -> Self {
        Self {
            name,
            array_type,
            count,
            header_offset,
            data_offset,
            data_len,
            data: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn array_type(&self) -> ArrayType {
        self.array_type
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Stream offset of the array header
    pub fn header_offset(&self) -> u64 {
        self.header_offset
    }

    /// Stream offset of the first payload byte
    pub fn data_offset(&self) -> u64 {
        self.data_offset
    }

    /// Payload length in bytes
    pub fn data_len(&self) -> u64 {
        self.data_len
    }

    pub fn is_loaded(&self) -> bool {
        self.data.get().is_some()
    }

    pub fn info(&self) -> ArrayInfo {
        ArrayInfo::new(self.name.clone(), self.array_type, self.count)
    }

    pub(crate) fn loaded(&self) -> Option<&ArrayData> {
        self.data.get()
    }

    pub(crate) fn store(&self, data: ArrayData) -> &ArrayData {
        self.data.get_or_init(|| data)
    }
}
