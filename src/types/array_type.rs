//! Array element types

use std::fmt;

/// Declared type of an array, as written in its header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayType {
    /// 32-bit signed integers
    Inte,
    /// 32-bit IEEE reals
    Real,
    /// 64-bit IEEE reals
    Doub,
    /// Logicals, stored as 32-bit all-ones / all-zeros words
    Logi,
    /// Fixed 8-character strings
    Char,
    /// Presence-only marker: a name with no elements and no payload
    Mess,
}

impl ArrayType {
    pub const ALL: [ArrayType; 6] = [
        ArrayType::Inte,
        ArrayType::Real,
        ArrayType::Doub,
        ArrayType::Logi,
        ArrayType::Char,
        ArrayType::Mess,
    ];

    /// Four-character tag used in headers
    pub fn tag(self) -> &'static str {
        match self {
            ArrayType::Inte => "INTE",
            ArrayType::Real => "REAL",
            ArrayType::Doub => "DOUB",
            ArrayType::Logi => "LOGI",
            ArrayType::Char => "CHAR",
            ArrayType::Mess => "MESS",
        }
    }

    /// Parse a four-character header tag
    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"INTE" => Some(ArrayType::Inte),
            b"REAL" => Some(ArrayType::Real),
            b"DOUB" => Some(ArrayType::Doub),
            b"LOGI" => Some(ArrayType::Logi),
            b"CHAR" => Some(ArrayType::Char),
            b"MESS" => Some(ArrayType::Mess),
            _ => None,
        }
    }
}

impl fmt::Display for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
