//! Big-endian primitive readers

use super::take::ByteCursor;

/// Read an i32 (big-endian)
pub fn i32_be(cursor: &mut ByteCursor<'_>) -> Option<i32> {
    cursor
        .take(4)
        .map(|bytes| i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read a u32 (big-endian)
pub fn u32_be(cursor: &mut ByteCursor<'_>) -> Option<u32> {
    cursor
        .take(4)
        .map(|bytes| u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read an f32 (big-endian)
pub fn f32_be(cursor: &mut ByteCursor<'_>) -> Option<f32> {
    u32_be(cursor).map(f32::from_bits)
}

/// Read an f64 (big-endian)
pub fn f64_be(cursor: &mut ByteCursor<'_>) -> Option<f64> {
    cursor.take(8).map(|bytes| {
        f64::from_be_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ])
    })
}
